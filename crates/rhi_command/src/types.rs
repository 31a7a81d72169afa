//! Argument structs, flag sets and resource handles used by the command catalog
//!
//! The argument structs are `#[repr(C)]` PODs (`bytemuck::Pod`) because they
//! are copied byte-for-byte into auxiliary packet memory and read back during
//! replay. Resource handles are generation-checked `slotmap` keys into
//! backend-owned resource tables: recording a handle never touches resource
//! lifetime, and a stale handle is detected by the backend's table lookup
//! instead of dereferencing a dangling pointer.

use bytemuck::{Pod, Zeroable};

slotmap::new_key_type! {
    /// Handle to a backend-owned root signature.
    pub struct RootSignatureHandle;

    /// Handle to a backend-owned graphics or compute pipeline state.
    pub struct PipelineStateHandle;

    /// Handle to a backend-owned resource group (descriptor set equivalent).
    pub struct ResourceGroupHandle;

    /// Handle to a backend-owned vertex array.
    pub struct VertexArrayHandle;

    /// Handle to a backend-owned render target.
    pub struct RenderTargetHandle;

    /// Handle to a backend-owned indirect argument buffer.
    ///
    /// The null handle marks a draw command whose arguments live inline in
    /// the packet's auxiliary bytes instead.
    pub struct IndirectBufferHandle;

    /// Handle to a backend-owned query pool.
    pub struct QueryPoolHandle;

    /// Handle to an arbitrary backend-owned resource (textures, buffers).
    pub struct ResourceHandle;
}

bitflags::bitflags! {
    /// Which aspects of the current render target a clear affects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Clear the color attachment(s).
        const COLOR = 1 << 0;
        /// Clear the depth attachment.
        const DEPTH = 1 << 1;
        /// Clear the stencil attachment.
        const STENCIL = 1 << 2;
        /// Clear color and depth in one go, the common case.
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }

    /// Behavior flags for occlusion queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QueryControlFlags: u32 {
        /// Request an exact sample count instead of a boolean result.
        const PRECISE = 1 << 0;
    }
}

/// One viewport rectangle with depth range.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Viewport {
    /// Left edge in pixels.
    pub top_left_x: f32,
    /// Top edge in pixels.
    pub top_left_y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Near depth range bound, usually 0.
    pub min_depth: f32,
    /// Far depth range bound, usually 1.
    pub max_depth: f32,
}

/// One scissor rectangle in pixels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ScissorRectangle {
    /// Left edge.
    pub top_left_x: i32,
    /// Top edge.
    pub top_left_y: i32,
    /// Right edge, exclusive.
    pub bottom_right_x: i32,
    /// Bottom edge, exclusive.
    pub bottom_right_y: i32,
}

/// Arguments of one non-indexed draw, matching the indirect buffer layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawArguments {
    /// Number of vertices per instance.
    pub vertex_count_per_instance: u32,
    /// Number of instances.
    pub instance_count: u32,
    /// First vertex to fetch.
    pub start_vertex_location: u32,
    /// First instance index.
    pub start_instance_location: u32,
}

/// Arguments of one indexed draw, matching the indirect buffer layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedArguments {
    /// Number of indices per instance.
    pub index_count_per_instance: u32,
    /// Number of instances.
    pub instance_count: u32,
    /// First index to fetch.
    pub start_index_location: u32,
    /// Value added to each index before fetching the vertex.
    pub base_vertex_location: i32,
    /// First instance index.
    pub start_instance_location: u32,
}

/// Arguments of one mesh-task draw, matching the indirect buffer layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawMeshTasksArguments {
    /// Number of task shader workgroups to launch.
    pub number_of_tasks: u32,
    /// First task index.
    pub first_task: u32,
}
