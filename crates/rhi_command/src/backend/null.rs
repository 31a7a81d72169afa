//! Null backend
//!
//! Replays every catalog command as structured log output and otherwise does
//! nothing. Useful headless (tooling, servers, tests) and as the reference
//! for wiring a real backend: one [`CommandDispatch`] implementation per
//! command kind, collected once into a process-wide dispatch table.

use std::sync::OnceLock;

use crate::buffer::CommandBuffer;
use crate::command::compute::{
    DispatchCompute, SetComputePipelineState, SetComputeResourceGroup, SetComputeRootSignature,
};
use crate::command::debug::{BeginDebugEvent, EndDebugEvent, SetDebugMarker};
use crate::command::graphics::{
    ClearGraphics, DrawGraphics, DrawIndexedGraphics, DrawMeshTasks, SetGraphicsPipelineState,
    SetGraphicsRenderTarget, SetGraphicsResourceGroup, SetGraphicsRootSignature,
    SetGraphicsScissorRectangles, SetGraphicsVertexArray, SetGraphicsViewports,
};
use crate::command::query::{BeginQuery, EndQuery, ResetQueryPool, WriteTimestampQuery};
use crate::command::resource::{CopyResource, GenerateMipmaps};
use crate::command::ExecuteCommandBuffer;
use crate::dispatch::{CommandDispatch, DispatchTable};
use crate::rhi::Rhi;

/// Backend that logs commands instead of driving a GPU.
#[derive(Debug, Default)]
pub struct NullRhi {
    submitted_command_buffers: u64,
}

impl NullRhi {
    /// Create a null backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of command buffers submitted so far, nested executions included.
    #[must_use]
    pub const fn submitted_command_buffers(&self) -> u64 {
        self.submitted_command_buffers
    }
}

impl Rhi for NullRhi {
    fn name(&self) -> &'static str {
        "Null"
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) {
        self.submitted_command_buffers += 1;
        dispatch_table().dispatch(command_buffer, self);
    }
}

/// The null backend's dispatch table, built on first use.
pub(crate) fn dispatch_table() -> &'static DispatchTable<NullRhi> {
    static DISPATCH_TABLE: OnceLock<DispatchTable<NullRhi>> = OnceLock::new();
    DISPATCH_TABLE.get_or_init(|| {
        DispatchTable::builder()
            .register::<ExecuteCommandBuffer>()
            .register::<SetGraphicsRootSignature>()
            .register::<SetGraphicsPipelineState>()
            .register::<SetGraphicsResourceGroup>()
            .register::<SetGraphicsVertexArray>()
            .register::<SetGraphicsViewports>()
            .register::<SetGraphicsScissorRectangles>()
            .register::<SetGraphicsRenderTarget>()
            .register::<ClearGraphics>()
            .register::<DrawGraphics>()
            .register::<DrawIndexedGraphics>()
            .register::<DrawMeshTasks>()
            .register::<SetComputeRootSignature>()
            .register::<SetComputePipelineState>()
            .register::<SetComputeResourceGroup>()
            .register::<DispatchCompute>()
            .register::<CopyResource>()
            .register::<GenerateMipmaps>()
            .register::<ResetQueryPool>()
            .register::<BeginQuery>()
            .register::<EndQuery>()
            .register::<WriteTimestampQuery>()
            .register::<SetDebugMarker>()
            .register::<BeginDebugEvent>()
            .register::<EndDebugEvent>()
            .build()
            .expect("null backend registers every command kind")
    })
}

impl CommandDispatch<NullRhi> for ExecuteCommandBuffer {
    fn execute(&self, rhi: &mut NullRhi) {
        // SAFETY: the recording caller guarantees the referenced buffer
        // outlives replay (documented non-owning pointer).
        let command_buffer_to_execute = unsafe { &*self.command_buffer_to_execute };
        log::debug!(
            "null rhi: execute sub command buffer ({} bytes)",
            command_buffer_to_execute.used_bytes()
        );
        rhi.submit_command_buffer(command_buffer_to_execute);
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsRootSignature {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: set graphics root signature {:?}", self.root_signature);
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsPipelineState {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: set graphics pipeline state {:?}", self.graphics_pipeline_state);
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsResourceGroup {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: set graphics resource group {:?} at root parameter {}",
            self.resource_group,
            self.root_parameter_index
        );
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsVertexArray {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: set graphics vertex array {:?}", self.vertex_array);
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsViewports {
    fn execute(&self, _rhi: &mut NullRhi) {
        // SAFETY: `self` is a payload inside the buffer being dispatched.
        let first_viewport = unsafe { *self.viewports() };
        log::debug!(
            "null rhi: set {} viewport(s), first {:?}",
            self.number_of_viewports,
            first_viewport
        );
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsScissorRectangles {
    fn execute(&self, _rhi: &mut NullRhi) {
        // SAFETY: `self` is a payload inside the buffer being dispatched.
        let first_scissor_rectangle = unsafe { *self.scissor_rectangles() };
        log::debug!(
            "null rhi: set {} scissor rectangle(s), first {:?}",
            self.number_of_scissor_rectangles,
            first_scissor_rectangle
        );
    }
}

impl CommandDispatch<NullRhi> for SetGraphicsRenderTarget {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: set render target {:?}", self.render_target);
    }
}

impl CommandDispatch<NullRhi> for ClearGraphics {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: clear {:?} color={:?} z={} stencil={}",
            self.clear_flags,
            self.color,
            self.z,
            self.stencil
        );
    }
}

impl CommandDispatch<NullRhi> for DrawGraphics {
    fn execute(&self, _rhi: &mut NullRhi) {
        if self.is_inline() {
            // SAFETY: inline draws carry their arguments as auxiliary bytes.
            let arguments = unsafe { self.inline_arguments() };
            log::debug!("null rhi: draw {arguments:?}");
        } else {
            log::debug!(
                "null rhi: draw {}x indirect from {:?} at offset {}",
                self.number_of_draws,
                self.indirect_buffer,
                self.indirect_buffer_offset
            );
        }
    }
}

impl CommandDispatch<NullRhi> for DrawIndexedGraphics {
    fn execute(&self, _rhi: &mut NullRhi) {
        if self.is_inline() {
            // SAFETY: inline draws carry their arguments as auxiliary bytes.
            let arguments = unsafe { self.inline_arguments() };
            log::debug!("null rhi: draw indexed {arguments:?}");
        } else {
            log::debug!(
                "null rhi: draw indexed {}x indirect from {:?} at offset {}",
                self.number_of_draws,
                self.indirect_buffer,
                self.indirect_buffer_offset
            );
        }
    }
}

impl CommandDispatch<NullRhi> for DrawMeshTasks {
    fn execute(&self, _rhi: &mut NullRhi) {
        if self.is_inline() {
            // SAFETY: inline draws carry their arguments as auxiliary bytes.
            let arguments = unsafe { self.inline_arguments() };
            log::debug!("null rhi: draw mesh tasks {arguments:?}");
        } else {
            log::debug!(
                "null rhi: draw mesh tasks {}x indirect from {:?} at offset {}",
                self.number_of_draws,
                self.indirect_buffer,
                self.indirect_buffer_offset
            );
        }
    }
}

impl CommandDispatch<NullRhi> for SetComputeRootSignature {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: set compute root signature {:?}", self.root_signature);
    }
}

impl CommandDispatch<NullRhi> for SetComputePipelineState {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: set compute pipeline state {:?}", self.compute_pipeline_state);
    }
}

impl CommandDispatch<NullRhi> for SetComputeResourceGroup {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: set compute resource group {:?} at root parameter {}",
            self.resource_group,
            self.root_parameter_index
        );
    }
}

impl CommandDispatch<NullRhi> for DispatchCompute {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: dispatch compute {}x{}x{}",
            self.group_count_x,
            self.group_count_y,
            self.group_count_z
        );
    }
}

impl CommandDispatch<NullRhi> for CopyResource {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: copy resource {:?} -> {:?}",
            self.source_resource,
            self.destination_resource
        );
    }
}

impl CommandDispatch<NullRhi> for GenerateMipmaps {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: generate mipmaps for {:?}", self.resource);
    }
}

impl CommandDispatch<NullRhi> for ResetQueryPool {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: reset {} query(ies) of {:?} from index {}",
            self.number_of_queries,
            self.query_pool,
            self.first_query_index
        );
    }
}

impl CommandDispatch<NullRhi> for BeginQuery {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: begin query {} of {:?} ({:?})",
            self.query_index,
            self.query_pool,
            self.query_control_flags
        );
    }
}

impl CommandDispatch<NullRhi> for EndQuery {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!("null rhi: end query {} of {:?}", self.query_index, self.query_pool);
    }
}

impl CommandDispatch<NullRhi> for WriteTimestampQuery {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::debug!(
            "null rhi: write timestamp query {} of {:?}",
            self.query_index,
            self.query_pool
        );
    }
}

impl CommandDispatch<NullRhi> for SetDebugMarker {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::trace!("null rhi: debug marker '{}'", self.name());
    }
}

impl CommandDispatch<NullRhi> for BeginDebugEvent {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::trace!("null rhi: begin debug event '{}'", self.name());
    }
}

impl CommandDispatch<NullRhi> for EndDebugEvent {
    fn execute(&self, _rhi: &mut NullRhi) {
        log::trace!("null rhi: end debug event");
    }
}
