//! Compute state and dispatch commands

use crate::buffer::CommandBuffer;
use crate::command::{Command, DispatchIndex};
use crate::types::{PipelineStateHandle, ResourceGroupHandle, RootSignatureHandle};

/// Bind the compute root signature.
#[derive(Debug, Clone, Copy)]
pub struct SetComputeRootSignature {
    /// Root signature to bind; null unbinds.
    pub root_signature: RootSignatureHandle,
}

impl SetComputeRootSignature {
    /// Record the bind.
    pub fn create(command_buffer: &mut CommandBuffer, root_signature: RootSignatureHandle) {
        command_buffer.add_command(Self { root_signature });
    }
}

impl Command for SetComputeRootSignature {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetComputeRootSignature;
}

/// Bind the compute pipeline state.
#[derive(Debug, Clone, Copy)]
pub struct SetComputePipelineState {
    /// Pipeline state to bind; null unbinds.
    pub compute_pipeline_state: PipelineStateHandle,
}

impl SetComputePipelineState {
    /// Record the bind.
    pub fn create(command_buffer: &mut CommandBuffer, compute_pipeline_state: PipelineStateHandle) {
        command_buffer.add_command(Self {
            compute_pipeline_state,
        });
    }
}

impl Command for SetComputePipelineState {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetComputePipelineState;
}

/// Bind a resource group to a compute root parameter slot.
#[derive(Debug, Clone, Copy)]
pub struct SetComputeResourceGroup {
    /// Index of the root parameter the group binds to.
    pub root_parameter_index: u32,
    /// Resource group to bind; null unbinds the slot.
    pub resource_group: ResourceGroupHandle,
}

impl SetComputeResourceGroup {
    /// Record the bind.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        root_parameter_index: u32,
        resource_group: ResourceGroupHandle,
    ) {
        command_buffer.add_command(Self {
            root_parameter_index,
            resource_group,
        });
    }
}

impl Command for SetComputeResourceGroup {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetComputeResourceGroup;
}

/// Launch compute workgroups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchCompute {
    /// Workgroups along X.
    pub group_count_x: u32,
    /// Workgroups along Y.
    pub group_count_y: u32,
    /// Workgroups along Z.
    pub group_count_z: u32,
}

impl DispatchCompute {
    /// Record the dispatch.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) {
        command_buffer.add_command(Self {
            group_count_x,
            group_count_y,
            group_count_z,
        });
    }
}

impl Command for DispatchCompute {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::DispatchCompute;
}
