//! # Command Catalog
//!
//! One POD struct per command kind, each with a compile-time dispatch index
//! and a `create` helper that records it into a [`CommandBuffer`]. The
//! catalog is the only supported way to append commands; direct arena
//! manipulation is not exposed.
//!
//! Commands with list-valued arguments support two call conventions:
//! an external pointer (zero auxiliary bytes, the caller keeps the data alive
//! until the last replay) or inline scalar values (`create_single` /
//! `create_inline`, copied into the packet's auxiliary bytes, no external
//! lifetime obligation).

use crate::buffer::CommandBuffer;

pub mod compute;
pub mod debug;
pub mod graphics;
pub mod query;
pub mod resource;

/// A recordable command payload.
///
/// Implementors are plain-old-data: `Copy` (and therefore without `Drop`)
/// because recording, arena growth and splicing all move payloads around as
/// raw bytes.
pub trait Command: Copy {
    /// Stable index identifying both this payload type and its handler slot
    /// in every backend's dispatch table.
    const DISPATCH_INDEX: DispatchIndex;
}

/// Stable enumeration of all command kinds.
///
/// Used solely as an array index into a backend's [`DispatchTable`]
/// (`crate::dispatch::DispatchTable`); the discriminants are sequential and
/// must never be reordered once a recording exists.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchIndex {
    /// [`ExecuteCommandBuffer`]
    ExecuteCommandBuffer = 0,
    /// [`graphics::SetGraphicsRootSignature`]
    SetGraphicsRootSignature,
    /// [`graphics::SetGraphicsPipelineState`]
    SetGraphicsPipelineState,
    /// [`graphics::SetGraphicsResourceGroup`]
    SetGraphicsResourceGroup,
    /// [`graphics::SetGraphicsVertexArray`]
    SetGraphicsVertexArray,
    /// [`graphics::SetGraphicsViewports`]
    SetGraphicsViewports,
    /// [`graphics::SetGraphicsScissorRectangles`]
    SetGraphicsScissorRectangles,
    /// [`graphics::SetGraphicsRenderTarget`]
    SetGraphicsRenderTarget,
    /// [`graphics::ClearGraphics`]
    ClearGraphics,
    /// [`graphics::DrawGraphics`]
    DrawGraphics,
    /// [`graphics::DrawIndexedGraphics`]
    DrawIndexedGraphics,
    /// [`graphics::DrawMeshTasks`]
    DrawMeshTasks,
    /// [`compute::SetComputeRootSignature`]
    SetComputeRootSignature,
    /// [`compute::SetComputePipelineState`]
    SetComputePipelineState,
    /// [`compute::SetComputeResourceGroup`]
    SetComputeResourceGroup,
    /// [`compute::DispatchCompute`]
    DispatchCompute,
    /// [`resource::CopyResource`]
    CopyResource,
    /// [`resource::GenerateMipmaps`]
    GenerateMipmaps,
    /// [`query::ResetQueryPool`]
    ResetQueryPool,
    /// [`query::BeginQuery`]
    BeginQuery,
    /// [`query::EndQuery`]
    EndQuery,
    /// [`query::WriteTimestampQuery`]
    WriteTimestampQuery,
    /// [`debug::SetDebugMarker`]
    SetDebugMarker,
    /// [`debug::BeginDebugEvent`]
    BeginDebugEvent,
    /// [`debug::EndDebugEvent`]
    EndDebugEvent,
}

impl DispatchIndex {
    /// Number of command kinds, and therefore the dispatch table size.
    pub const COUNT: usize = 25;

    /// All indices in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::ExecuteCommandBuffer,
        Self::SetGraphicsRootSignature,
        Self::SetGraphicsPipelineState,
        Self::SetGraphicsResourceGroup,
        Self::SetGraphicsVertexArray,
        Self::SetGraphicsViewports,
        Self::SetGraphicsScissorRectangles,
        Self::SetGraphicsRenderTarget,
        Self::ClearGraphics,
        Self::DrawGraphics,
        Self::DrawIndexedGraphics,
        Self::DrawMeshTasks,
        Self::SetComputeRootSignature,
        Self::SetComputePipelineState,
        Self::SetComputeResourceGroup,
        Self::DispatchCompute,
        Self::CopyResource,
        Self::GenerateMipmaps,
        Self::ResetQueryPool,
        Self::BeginQuery,
        Self::EndQuery,
        Self::WriteTimestampQuery,
        Self::SetDebugMarker,
        Self::BeginDebugEvent,
        Self::EndDebugEvent,
    ];

    /// Convert a raw packet header value back to an index.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Execute all commands of another, separately recorded command buffer.
///
/// The referenced buffer is borrowed, not owned: the caller must keep it
/// alive and unmodified until the last replay of this recording. Typically
/// used for pre-recorded static scene portions replayed inside a per-frame
/// buffer.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteCommandBuffer {
    /// Non-owning pointer to the buffer to execute; never null.
    pub command_buffer_to_execute: *const CommandBuffer,
}

impl ExecuteCommandBuffer {
    /// Record execution of `command_buffer_to_execute`.
    pub fn create(command_buffer: &mut CommandBuffer, command_buffer_to_execute: &CommandBuffer) {
        debug_assert!(
            !command_buffer_to_execute.is_empty(),
            "attempt to record execution of an empty command buffer"
        );
        command_buffer.add_command(Self {
            command_buffer_to_execute,
        });
    }
}

impl Command for ExecuteCommandBuffer {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::ExecuteCommandBuffer;
}
