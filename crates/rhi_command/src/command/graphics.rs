//! Graphics state, clear and draw commands

use std::ptr;

use crate::buffer::CommandBuffer;
use crate::command::{Command, DispatchIndex};
use crate::packet;
use crate::types::{
    ClearFlags, DrawArguments, DrawIndexedArguments, DrawMeshTasksArguments, IndirectBufferHandle,
    PipelineStateHandle, RenderTargetHandle, ResourceGroupHandle, RootSignatureHandle,
    ScissorRectangle, VertexArrayHandle, Viewport,
};

/// Bind the graphics root signature.
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsRootSignature {
    /// Root signature to bind; null unbinds.
    pub root_signature: RootSignatureHandle,
}

impl SetGraphicsRootSignature {
    /// Record the bind.
    pub fn create(command_buffer: &mut CommandBuffer, root_signature: RootSignatureHandle) {
        command_buffer.add_command(Self { root_signature });
    }
}

impl Command for SetGraphicsRootSignature {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsRootSignature;
}

/// Bind the graphics pipeline state.
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsPipelineState {
    /// Pipeline state to bind; null unbinds.
    pub graphics_pipeline_state: PipelineStateHandle,
}

impl SetGraphicsPipelineState {
    /// Record the bind.
    pub fn create(command_buffer: &mut CommandBuffer, graphics_pipeline_state: PipelineStateHandle) {
        command_buffer.add_command(Self {
            graphics_pipeline_state,
        });
    }
}

impl Command for SetGraphicsPipelineState {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsPipelineState;
}

/// Bind a resource group to a graphics root parameter slot.
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsResourceGroup {
    /// Index of the root parameter the group binds to.
    pub root_parameter_index: u32,
    /// Resource group to bind; null unbinds the slot.
    pub resource_group: ResourceGroupHandle,
}

impl SetGraphicsResourceGroup {
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

impl Command for SetGraphicsResourceGroup {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsResourceGroup;
}

/// Bind the vertex array used by subsequent draws.
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsVertexArray {
    /// Vertex array to bind; null unbinds.
    pub vertex_array: VertexArrayHandle,
}

impl SetGraphicsVertexArray {
    /// Record the bind.
    pub fn create(command_buffer: &mut CommandBuffer, vertex_array: VertexArrayHandle) {
        command_buffer.add_command(Self { vertex_array });
    }
}

impl Command for SetGraphicsVertexArray {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsVertexArray;
}

/// Set the active viewports.
///
/// Two call conventions: [`create`](Self::create) references caller-owned
/// viewport data (kept alive by the caller until the last replay), while
/// [`create_single`](Self::create_single) copies one viewport into the
/// packet's auxiliary bytes with no lifetime obligation.
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsViewports {
    /// Number of viewports to set; at least one.
    pub number_of_viewports: u32,
    /// Caller-owned viewport array, or null when a single viewport lives in
    /// the packet's auxiliary bytes.
    pub viewports: *const Viewport,
}

impl SetGraphicsViewports {
    /// Record a viewport set referencing caller-owned data.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        number_of_viewports: u32,
        viewports: *const Viewport,
    ) {
        debug_assert!(number_of_viewports > 0, "at least one viewport is required");
        debug_assert!(!viewports.is_null(), "viewport array must not be null");
        command_buffer.add_command(Self {
            number_of_viewports,
            viewports,
        });
    }

    /// Record a single viewport by value, with the standard 0..1 depth range.
    pub fn create_single(
        command_buffer: &mut CommandBuffer,
        top_left_x: f32,
        top_left_y: f32,
        width: f32,
        height: f32,
    ) {
        let viewport = Viewport {
            top_left_x,
            top_left_y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        };
        command_buffer.add_command_with_auxiliary(
            Self {
                number_of_viewports: 1,
                viewports: ptr::null(),
            },
            bytemuck::bytes_of(&viewport),
        );
    }

    /// Resolve the viewport array, following the inline auxiliary convention
    /// when the external pointer is null.
    ///
    /// # Safety
    ///
    /// `self` must be a payload inside a live command buffer arena (i.e. the
    /// reference a dispatch handler receives), and for the external
    /// convention the caller-owned array must still be alive.
    #[must_use]
    pub unsafe fn viewports(&self) -> *const Viewport {
        if self.viewports.is_null() {
            packet::auxiliary_memory(self).cast()
        } else {
            self.viewports
        }
    }
}

impl Command for SetGraphicsViewports {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsViewports;
}

/// Set the active scissor rectangles.
///
/// Same two call conventions as [`SetGraphicsViewports`].
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsScissorRectangles {
    /// Number of scissor rectangles to set; at least one.
    pub number_of_scissor_rectangles: u32,
    /// Caller-owned rectangle array, or null when a single rectangle lives in
    /// the packet's auxiliary bytes.
    pub scissor_rectangles: *const ScissorRectangle,
}

impl SetGraphicsScissorRectangles {
    /// Record a scissor set referencing caller-owned data.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        number_of_scissor_rectangles: u32,
        scissor_rectangles: *const ScissorRectangle,
    ) {
        debug_assert!(
            number_of_scissor_rectangles > 0,
            "at least one scissor rectangle is required"
        );
        debug_assert!(!scissor_rectangles.is_null(), "scissor rectangle array must not be null");
        command_buffer.add_command(Self {
            number_of_scissor_rectangles,
            scissor_rectangles,
        });
    }

    /// Record a single scissor rectangle by value.
    pub fn create_single(
        command_buffer: &mut CommandBuffer,
        top_left_x: i32,
        top_left_y: i32,
        bottom_right_x: i32,
        bottom_right_y: i32,
    ) {
        let scissor_rectangle = ScissorRectangle {
            top_left_x,
            top_left_y,
            bottom_right_x,
            bottom_right_y,
        };
        command_buffer.add_command_with_auxiliary(
            Self {
                number_of_scissor_rectangles: 1,
                scissor_rectangles: ptr::null(),
            },
            bytemuck::bytes_of(&scissor_rectangle),
        );
    }

    /// Resolve the rectangle array, following the inline auxiliary convention
    /// when the external pointer is null.
    ///
    /// # Safety
    ///
    /// Same requirements as [`SetGraphicsViewports::viewports`].
    #[must_use]
    pub unsafe fn scissor_rectangles(&self) -> *const ScissorRectangle {
        if self.scissor_rectangles.is_null() {
            packet::auxiliary_memory(self).cast()
        } else {
            self.scissor_rectangles
        }
    }
}

impl Command for SetGraphicsScissorRectangles {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsScissorRectangles;
}

/// Set the render target subsequent draws go to.
#[derive(Debug, Clone, Copy)]
pub struct SetGraphicsRenderTarget {
    /// Render target to activate; null selects the backend's main output.
    pub render_target: RenderTargetHandle,
}

impl SetGraphicsRenderTarget {
    /// Record the render target switch.
    pub fn create(command_buffer: &mut CommandBuffer, render_target: RenderTargetHandle) {
        command_buffer.add_command(Self { render_target });
    }
}

impl Command for SetGraphicsRenderTarget {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetGraphicsRenderTarget;
}

/// Clear aspects of the active render target.
#[derive(Debug, Clone, Copy)]
pub struct ClearGraphics {
    /// Which aspects to clear.
    pub clear_flags: ClearFlags,
    /// RGBA clear color, applied when [`ClearFlags::COLOR`] is set.
    pub color: [f32; 4],
    /// Depth clear value in 0..=1, applied when [`ClearFlags::DEPTH`] is set.
    pub z: f32,
    /// Stencil clear value, applied when [`ClearFlags::STENCIL`] is set.
    pub stencil: u32,
}

impl ClearGraphics {
    /// Record the clear.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        clear_flags: ClearFlags,
        color: [f32; 4],
        z: f32,
        stencil: u32,
    ) {
        debug_assert!((0.0..=1.0).contains(&z), "depth clear value outside 0..=1");
        command_buffer.add_command(Self {
            clear_flags,
            color,
            z,
            stencil,
        });
    }
}

impl Command for ClearGraphics {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::ClearGraphics;
}

/// Non-indexed draw.
///
/// Arguments come either from a backend-owned indirect buffer
/// ([`create`](Self::create)) or from a single [`DrawArguments`] value copied
/// into the packet's auxiliary bytes ([`create_inline`](Self::create_inline),
/// marked by a null indirect buffer handle).
#[derive(Debug, Clone, Copy)]
pub struct DrawGraphics {
    /// Indirect argument buffer; null marks inline auxiliary arguments.
    pub indirect_buffer: IndirectBufferHandle,
    /// Byte offset of the first [`DrawArguments`] inside the indirect buffer.
    pub indirect_buffer_offset: u32,
    /// Number of consecutive draws to execute.
    pub number_of_draws: u32,
}

impl DrawGraphics {
    /// Record draws whose arguments live in an indirect buffer.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        indirect_buffer: IndirectBufferHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) {
        debug_assert!(
            !slotmap::Key::is_null(&indirect_buffer),
            "indirect draws require an indirect buffer"
        );
        debug_assert!(number_of_draws > 0, "at least one draw is required");
        command_buffer.add_command(Self {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        });
    }

    /// Record one draw with inline arguments, no indirect buffer involved.
    pub fn create_inline(
        command_buffer: &mut CommandBuffer,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex_location: u32,
        start_instance_location: u32,
    ) {
        let arguments = DrawArguments {
            vertex_count_per_instance,
            instance_count,
            start_vertex_location,
            start_instance_location,
        };
        command_buffer.add_command_with_auxiliary(
            Self {
                indirect_buffer: IndirectBufferHandle::default(),
                indirect_buffer_offset: 0,
                number_of_draws: 1,
            },
            bytemuck::bytes_of(&arguments),
        );
    }

    /// True when the draw arguments live in the packet's auxiliary bytes.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        slotmap::Key::is_null(&self.indirect_buffer)
    }

    /// Read the inline draw arguments from the auxiliary bytes.
    ///
    /// # Safety
    ///
    /// `self` must be a payload inside a live command buffer arena, recorded
    /// through [`create_inline`](Self::create_inline).
    #[must_use]
    pub unsafe fn inline_arguments(&self) -> DrawArguments {
        debug_assert!(self.is_inline(), "draw arguments live in the indirect buffer");
        read_auxiliary(self)
    }
}

impl Command for DrawGraphics {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::DrawGraphics;
}

/// Indexed draw; same two argument conventions as [`DrawGraphics`].
#[derive(Debug, Clone, Copy)]
pub struct DrawIndexedGraphics {
    /// Indirect argument buffer; null marks inline auxiliary arguments.
    pub indirect_buffer: IndirectBufferHandle,
    /// Byte offset of the first [`DrawIndexedArguments`] inside the indirect buffer.
    pub indirect_buffer_offset: u32,
    /// Number of consecutive draws to execute.
    pub number_of_draws: u32,
}

impl DrawIndexedGraphics {
    /// Record indexed draws whose arguments live in an indirect buffer.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        indirect_buffer: IndirectBufferHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) {
        debug_assert!(
            !slotmap::Key::is_null(&indirect_buffer),
            "indirect draws require an indirect buffer"
        );
        debug_assert!(number_of_draws > 0, "at least one draw is required");
        command_buffer.add_command(Self {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        });
    }

    /// Record one indexed draw with inline arguments.
    pub fn create_inline(
        command_buffer: &mut CommandBuffer,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index_location: u32,
        base_vertex_location: i32,
        start_instance_location: u32,
    ) {
        let arguments = DrawIndexedArguments {
            index_count_per_instance,
            instance_count,
            start_index_location,
            base_vertex_location,
            start_instance_location,
        };
        command_buffer.add_command_with_auxiliary(
            Self {
                indirect_buffer: IndirectBufferHandle::default(),
                indirect_buffer_offset: 0,
                number_of_draws: 1,
            },
            bytemuck::bytes_of(&arguments),
        );
    }

    /// True when the draw arguments live in the packet's auxiliary bytes.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        slotmap::Key::is_null(&self.indirect_buffer)
    }

    /// Read the inline draw arguments from the auxiliary bytes.
    ///
    /// # Safety
    ///
    /// Same requirements as [`DrawGraphics::inline_arguments`].
    #[must_use]
    pub unsafe fn inline_arguments(&self) -> DrawIndexedArguments {
        debug_assert!(self.is_inline(), "draw arguments live in the indirect buffer");
        read_auxiliary(self)
    }
}

impl Command for DrawIndexedGraphics {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::DrawIndexedGraphics;
}

/// Mesh-task draw; same two argument conventions as [`DrawGraphics`].
///
/// Only meaningful on backends with mesh shader support; backends without it
/// are expected to reject the pipeline state long before replay.
#[derive(Debug, Clone, Copy)]
pub struct DrawMeshTasks {
    /// Indirect argument buffer; null marks inline auxiliary arguments.
    pub indirect_buffer: IndirectBufferHandle,
    /// Byte offset of the first [`DrawMeshTasksArguments`] inside the indirect buffer.
    pub indirect_buffer_offset: u32,
    /// Number of consecutive draws to execute.
    pub number_of_draws: u32,
}

impl DrawMeshTasks {
    /// Record mesh-task draws whose arguments live in an indirect buffer.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        indirect_buffer: IndirectBufferHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) {
        debug_assert!(
            !slotmap::Key::is_null(&indirect_buffer),
            "indirect draws require an indirect buffer"
        );
        debug_assert!(number_of_draws > 0, "at least one draw is required");
        command_buffer.add_command(Self {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        });
    }

    /// Record one mesh-task draw with inline arguments.
    pub fn create_inline(command_buffer: &mut CommandBuffer, number_of_tasks: u32, first_task: u32) {
        let arguments = DrawMeshTasksArguments {
            number_of_tasks,
            first_task,
        };
        command_buffer.add_command_with_auxiliary(
            Self {
                indirect_buffer: IndirectBufferHandle::default(),
                indirect_buffer_offset: 0,
                number_of_draws: 1,
            },
            bytemuck::bytes_of(&arguments),
        );
    }

    /// True when the draw arguments live in the packet's auxiliary bytes.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        slotmap::Key::is_null(&self.indirect_buffer)
    }

    /// Read the inline draw arguments from the auxiliary bytes.
    ///
    /// # Safety
    ///
    /// Same requirements as [`DrawGraphics::inline_arguments`].
    #[must_use]
    pub unsafe fn inline_arguments(&self) -> DrawMeshTasksArguments {
        debug_assert!(self.is_inline(), "draw arguments live in the indirect buffer");
        read_auxiliary(self)
    }
}

impl Command for DrawMeshTasks {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::DrawMeshTasks;
}

/// Read one `A` from the auxiliary bytes behind `payload`.
///
/// Auxiliary data is only guaranteed 4-byte aligned (it starts at
/// `payload + size_of::<T>()`), so the read is unaligned by contract.
unsafe fn read_auxiliary<T, A: bytemuck::Pod>(payload: &T) -> A {
    let auxiliary = packet::auxiliary_memory(payload);
    bytemuck::pod_read_unaligned(std::slice::from_raw_parts(auxiliary, std::mem::size_of::<A>()))
}
