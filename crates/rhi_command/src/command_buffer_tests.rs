//! End-to-end recording and replay tests
//!
//! Exercises the public surface the way a renderer uses it: record through
//! the catalog's `create` helpers, replay through a backend's dispatch
//! table, and observe the calls with a stub backend that records every
//! handler invocation.

use std::sync::OnceLock;

use approx::assert_relative_eq;

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
use crate::command::{Command, DispatchIndex, ExecuteCommandBuffer};
use crate::dispatch::{CommandDispatch, DispatchTable};
use crate::rhi::Rhi;
use crate::types::{
    ClearFlags, DrawArguments, DrawIndexedArguments, IndirectBufferHandle, PipelineStateHandle,
    ScissorRectangle, Viewport,
};

/// One observed handler invocation.
#[derive(Debug, Clone, PartialEq)]
enum Event {
    Clear {
        flags: ClearFlags,
        color: [f32; 4],
        z: f32,
        stencil: u32,
    },
    Draw(DrawArguments),
    DrawIndirect {
        indirect_buffer: IndirectBufferHandle,
        offset: u32,
        draws: u32,
    },
    DrawIndexed(DrawIndexedArguments),
    Viewports(Vec<Viewport>),
    Scissors(Vec<ScissorRectangle>),
    PipelineState(PipelineStateHandle),
    Compute(DispatchCompute),
    Marker(String),
    BeginEvent(String),
    EndEvent,
    Other(DispatchIndex),
}

#[derive(Default)]
struct RecordingRhi {
    events: Vec<Event>,
}

fn recording_table() -> &'static DispatchTable<RecordingRhi> {
    static TABLE: OnceLock<DispatchTable<RecordingRhi>> = OnceLock::new();
    TABLE.get_or_init(|| {
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
            .expect("stub backend registers every command kind")
    })
}

impl Rhi for RecordingRhi {
    fn name(&self) -> &'static str {
        "Recording"
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) {
        recording_table().dispatch(command_buffer, self);
    }
}

impl CommandDispatch<RecordingRhi> for ExecuteCommandBuffer {
    fn execute(&self, rhi: &mut RecordingRhi) {
        let command_buffer_to_execute = unsafe { &*self.command_buffer_to_execute };
        rhi.submit_command_buffer(command_buffer_to_execute);
    }
}

impl CommandDispatch<RecordingRhi> for ClearGraphics {
    fn execute(&self, rhi: &mut RecordingRhi) {
        rhi.events.push(Event::Clear {
            flags: self.clear_flags,
            color: self.color,
            z: self.z,
            stencil: self.stencil,
        });
    }
}

impl CommandDispatch<RecordingRhi> for DrawGraphics {
    fn execute(&self, rhi: &mut RecordingRhi) {
        if self.is_inline() {
            rhi.events.push(Event::Draw(unsafe { self.inline_arguments() }));
        } else {
            rhi.events.push(Event::DrawIndirect {
                indirect_buffer: self.indirect_buffer,
                offset: self.indirect_buffer_offset,
                draws: self.number_of_draws,
            });
        }
    }
}

impl CommandDispatch<RecordingRhi> for DrawIndexedGraphics {
    fn execute(&self, rhi: &mut RecordingRhi) {
        assert!(self.is_inline(), "tests only record inline indexed draws");
        rhi.events.push(Event::DrawIndexed(unsafe { self.inline_arguments() }));
    }
}

impl CommandDispatch<RecordingRhi> for SetGraphicsViewports {
    fn execute(&self, rhi: &mut RecordingRhi) {
        let viewports = unsafe {
            std::slice::from_raw_parts(self.viewports(), self.number_of_viewports as usize)
        };
        rhi.events.push(Event::Viewports(viewports.to_vec()));
    }
}

impl CommandDispatch<RecordingRhi> for SetGraphicsScissorRectangles {
    fn execute(&self, rhi: &mut RecordingRhi) {
        let scissor_rectangles = unsafe {
            std::slice::from_raw_parts(
                self.scissor_rectangles(),
                self.number_of_scissor_rectangles as usize,
            )
        };
        rhi.events.push(Event::Scissors(scissor_rectangles.to_vec()));
    }
}

impl CommandDispatch<RecordingRhi> for SetGraphicsPipelineState {
    fn execute(&self, rhi: &mut RecordingRhi) {
        rhi.events.push(Event::PipelineState(self.graphics_pipeline_state));
    }
}

impl CommandDispatch<RecordingRhi> for DispatchCompute {
    fn execute(&self, rhi: &mut RecordingRhi) {
        rhi.events.push(Event::Compute(*self));
    }
}

impl CommandDispatch<RecordingRhi> for SetDebugMarker {
    fn execute(&self, rhi: &mut RecordingRhi) {
        rhi.events.push(Event::Marker(self.name().to_owned()));
    }
}

impl CommandDispatch<RecordingRhi> for BeginDebugEvent {
    fn execute(&self, rhi: &mut RecordingRhi) {
        rhi.events.push(Event::BeginEvent(self.name().to_owned()));
    }
}

impl CommandDispatch<RecordingRhi> for EndDebugEvent {
    fn execute(&self, rhi: &mut RecordingRhi) {
        rhi.events.push(Event::EndEvent);
    }
}

macro_rules! record_as_other {
    ($($command:ty),* $(,)?) => {
        $(
            impl CommandDispatch<RecordingRhi> for $command {
                fn execute(&self, rhi: &mut RecordingRhi) {
                    rhi.events.push(Event::Other(<$command as Command>::DISPATCH_INDEX));
                }
            }
        )*
    };
}

record_as_other!(
    SetGraphicsRootSignature,
    SetGraphicsResourceGroup,
    SetGraphicsVertexArray,
    SetGraphicsRenderTarget,
    DrawMeshTasks,
    SetComputeRootSignature,
    SetComputePipelineState,
    SetComputeResourceGroup,
    CopyResource,
    GenerateMipmaps,
    ResetQueryPool,
    BeginQuery,
    EndQuery,
    WriteTimestampQuery,
);

fn replay(command_buffer: &CommandBuffer) -> Vec<Event> {
    let mut rhi = RecordingRhi::default();
    command_buffer.submit_to_rhi(&mut rhi);
    rhi.events
}

#[test]
fn test_replay_preserves_insertion_order() {
    let mut command_buffer = CommandBuffer::new();
    ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR, [0.0; 4], 0.0, 0);
    SetGraphicsViewports::create_single(&mut command_buffer, 0.0, 0.0, 1280.0, 720.0);
    DrawGraphics::create_inline(&mut command_buffer, 6, 1, 0, 0);
    DispatchCompute::create(&mut command_buffer, 8, 8, 1);
    DrawGraphics::create_inline(&mut command_buffer, 3, 1, 0, 0);

    let events = replay(&command_buffer);
    assert_eq!(events.len(), 5);
    assert!(matches!(events[0], Event::Clear { .. }));
    assert!(matches!(events[1], Event::Viewports(_)));
    assert!(matches!(events[2], Event::Draw(_)));
    assert!(matches!(events[3], Event::Compute(_)));
    assert!(matches!(events[4], Event::Draw(_)));
}

#[test]
fn test_payload_bytes_round_trip_exactly() {
    let mut command_buffer = CommandBuffer::new();
    ClearGraphics::create(
        &mut command_buffer,
        ClearFlags::COLOR_DEPTH | ClearFlags::STENCIL,
        [0.25, 0.5, 0.75, 1.0],
        0.125,
        42,
    );
    DispatchCompute::create(&mut command_buffer, 123, 456, 789);

    let events = replay(&command_buffer);
    assert_eq!(
        events,
        vec![
            Event::Clear {
                flags: ClearFlags::COLOR_DEPTH | ClearFlags::STENCIL,
                color: [0.25, 0.5, 0.75, 1.0],
                z: 0.125,
                stencil: 42,
            },
            Event::Compute(DispatchCompute {
                group_count_x: 123,
                group_count_y: 456,
                group_count_z: 789,
            }),
        ]
    );
}

#[test]
fn test_viewport_auxiliary_round_trip() {
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsViewports::create_single(&mut command_buffer, 10.0, 20.0, 30.0, 40.0);

    let events = replay(&command_buffer);
    let Event::Viewports(viewports) = &events[0] else {
        panic!("expected a viewport event, got {:?}", events[0]);
    };
    assert_eq!(viewports.len(), 1);
    let viewport = viewports[0];
    assert_relative_eq!(viewport.top_left_x, 10.0);
    assert_relative_eq!(viewport.top_left_y, 20.0);
    assert_relative_eq!(viewport.width, 30.0);
    assert_relative_eq!(viewport.height, 40.0);
    assert_relative_eq!(viewport.min_depth, 0.0);
    assert_relative_eq!(viewport.max_depth, 1.0);
}

#[test]
fn test_scissor_auxiliary_round_trip() {
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsScissorRectangles::create_single(&mut command_buffer, 16, 32, 640, 480);

    let events = replay(&command_buffer);
    assert_eq!(
        events,
        vec![Event::Scissors(vec![ScissorRectangle {
            top_left_x: 16,
            top_left_y: 32,
            bottom_right_x: 640,
            bottom_right_y: 480,
        }])]
    );
}

#[test]
fn test_external_viewport_array_is_read_at_replay() {
    let viewports = [
        Viewport {
            top_left_x: 0.0,
            top_left_y: 0.0,
            width: 640.0,
            height: 720.0,
            min_depth: 0.0,
            max_depth: 1.0,
        },
        Viewport {
            top_left_x: 640.0,
            top_left_y: 0.0,
            width: 640.0,
            height: 720.0,
            min_depth: 0.0,
            max_depth: 0.5,
        },
    ];

    let mut command_buffer = CommandBuffer::new();
    SetGraphicsViewports::create(&mut command_buffer, viewports.len() as u32, viewports.as_ptr());

    // `viewports` stays alive across the replay, per the external convention.
    let events = replay(&command_buffer);
    assert_eq!(events, vec![Event::Viewports(viewports.to_vec())]);
}

#[test]
fn test_inline_and_indirect_draw_conventions() {
    let mut indirect_buffers = slotmap::SlotMap::<IndirectBufferHandle, ()>::with_key();
    let indirect_buffer = indirect_buffers.insert(());

    let mut command_buffer = CommandBuffer::new();
    DrawGraphics::create_inline(&mut command_buffer, 3, 1, 0, 0);
    DrawGraphics::create(&mut command_buffer, indirect_buffer, 64, 4);
    DrawIndexedGraphics::create_inline(&mut command_buffer, 36, 2, 0, -8, 1);

    let events = replay(&command_buffer);
    assert_eq!(
        events,
        vec![
            Event::Draw(DrawArguments {
                vertex_count_per_instance: 3,
                instance_count: 1,
                start_vertex_location: 0,
                start_instance_location: 0,
            }),
            Event::DrawIndirect {
                indirect_buffer,
                offset: 64,
                draws: 4,
            },
            Event::DrawIndexed(DrawIndexedArguments {
                index_count_per_instance: 36,
                instance_count: 2,
                start_index_location: 0,
                base_vertex_location: -8,
                start_instance_location: 1,
            }),
        ]
    );
}

#[test]
fn test_growth_across_chunks_preserves_every_command() {
    // Each DispatchCompute packet occupies 24 bytes; 600 of them cross the
    // 8192-byte growth chunk several times over.
    let mut command_buffer = CommandBuffer::new();
    for i in 0..600u32 {
        DispatchCompute::create(&mut command_buffer, i, i + 1, i + 2);
    }
    assert!(command_buffer.used_bytes() > crate::buffer::GROWTH_CHUNK_SIZE);

    let events = replay(&command_buffer);
    assert_eq!(events.len(), 600);
    for (i, event) in events.iter().enumerate() {
        let i = i as u32;
        assert_eq!(
            *event,
            Event::Compute(DispatchCompute {
                group_count_x: i,
                group_count_y: i + 1,
                group_count_z: i + 2,
            })
        );
    }
}

#[test]
fn test_splicing_appends_in_order() {
    let mut buffer_a = CommandBuffer::new();
    DrawGraphics::create_inline(&mut buffer_a, 10, 1, 0, 0);
    DrawGraphics::create_inline(&mut buffer_a, 20, 1, 0, 0);
    DrawGraphics::create_inline(&mut buffer_a, 30, 1, 0, 0);

    let mut buffer_b = CommandBuffer::new();
    ClearGraphics::create(&mut buffer_b, ClearFlags::COLOR, [0.0; 4], 0.0, 0);
    ClearGraphics::create(&mut buffer_b, ClearFlags::DEPTH, [0.0; 4], 1.0, 0);

    let a_bytes = buffer_a.used_bytes();
    buffer_a.submit_to_command_buffer(&mut buffer_b);

    // B replays its own two commands followed by A's three.
    let events = replay(&buffer_b);
    assert_eq!(events.len(), 5);
    assert!(matches!(events[0], Event::Clear { flags, .. } if flags == ClearFlags::COLOR));
    assert!(matches!(events[1], Event::Clear { flags, .. } if flags == ClearFlags::DEPTH));
    for (event, vertex_count) in events[2..].iter().zip([10, 20, 30]) {
        assert_eq!(
            *event,
            Event::Draw(DrawArguments {
                vertex_count_per_instance: vertex_count,
                instance_count: 1,
                start_vertex_location: 0,
                start_instance_location: 0,
            })
        );
    }

    // The non-clearing variant leaves A untouched and replayable.
    assert_eq!(buffer_a.used_bytes(), a_bytes);
    assert_eq!(replay(&buffer_a).len(), 3);
}

#[test]
fn test_splicing_and_clear_empties_the_source() {
    let mut buffer_a = CommandBuffer::new();
    DispatchCompute::create(&mut buffer_a, 1, 1, 1);
    let a_capacity = buffer_a.capacity();

    let mut buffer_b = CommandBuffer::new();
    DispatchCompute::create(&mut buffer_b, 2, 2, 2);

    buffer_a.submit_to_command_buffer_and_clear(&mut buffer_b);
    assert!(buffer_a.is_empty());
    assert_eq!(buffer_a.capacity(), a_capacity);
    assert_eq!(replay(&buffer_b).len(), 2);
}

#[test]
fn test_splicing_grows_the_destination() {
    let mut source = CommandBuffer::new();
    for i in 0..600u32 {
        DispatchCompute::create(&mut source, i, 0, 0);
    }

    // Destination starts with a deliberately small arena.
    let mut destination = CommandBuffer::with_capacity(64);
    DispatchCompute::create(&mut destination, u32::MAX, 0, 0);

    source.submit_to_command_buffer(&mut destination);
    let events = replay(&destination);
    assert_eq!(events.len(), 601);
    assert_eq!(
        events[0],
        Event::Compute(DispatchCompute {
            group_count_x: u32::MAX,
            group_count_y: 0,
            group_count_z: 0,
        })
    );
    assert_eq!(
        events[600],
        Event::Compute(DispatchCompute {
            group_count_x: 599,
            group_count_y: 0,
            group_count_z: 0,
        })
    );
}

#[test]
fn test_clear_then_draw_scenario() {
    let mut command_buffer = CommandBuffer::new();
    ClearGraphics::create(
        &mut command_buffer,
        ClearFlags::COLOR_DEPTH,
        [0.6, 0.8, 1.0, 1.0],
        0.0,
        0,
    );
    DrawGraphics::create_inline(&mut command_buffer, 3, 1, 0, 0);

    let events = replay(&command_buffer);
    assert_eq!(
        events,
        vec![
            Event::Clear {
                flags: ClearFlags::COLOR_DEPTH,
                color: [0.6, 0.8, 1.0, 1.0],
                z: 0.0,
                stencil: 0,
            },
            Event::Draw(DrawArguments {
                vertex_count_per_instance: 3,
                instance_count: 1,
                start_vertex_location: 0,
                start_instance_location: 0,
            }),
        ]
    );
}

#[test]
fn test_execute_sub_command_buffer_replays_inline() {
    let mut static_scene = CommandBuffer::new();
    DrawGraphics::create_inline(&mut static_scene, 100, 1, 0, 0);
    DrawGraphics::create_inline(&mut static_scene, 200, 1, 0, 0);

    let mut frame = CommandBuffer::new();
    ClearGraphics::create(&mut frame, ClearFlags::COLOR, [0.0; 4], 0.0, 0);
    ExecuteCommandBuffer::create(&mut frame, &static_scene);
    DispatchCompute::create(&mut frame, 1, 1, 1);

    let events = replay(&frame);
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], Event::Clear { .. }));
    assert!(matches!(events[1], Event::Draw(arguments) if arguments.vertex_count_per_instance == 100));
    assert!(matches!(events[2], Event::Draw(arguments) if arguments.vertex_count_per_instance == 200));
    assert!(matches!(events[3], Event::Compute(_)));
}

#[test]
fn test_submit_and_clear_resets_for_reuse() {
    let mut command_buffer = CommandBuffer::new();
    DispatchCompute::create(&mut command_buffer, 4, 4, 4);

    let mut rhi = RecordingRhi::default();
    command_buffer.submit_to_rhi_and_clear(&mut rhi);
    assert_eq!(rhi.events.len(), 1);
    assert!(command_buffer.is_empty());

    // Reuse after clear records from scratch.
    DispatchCompute::create(&mut command_buffer, 5, 5, 5);
    assert_eq!(
        replay(&command_buffer),
        vec![Event::Compute(DispatchCompute {
            group_count_x: 5,
            group_count_y: 5,
            group_count_z: 5,
        })]
    );
}

#[test]
fn test_catalog_wide_walk_covers_every_kind() {
    let mut query_pools = slotmap::SlotMap::<crate::types::QueryPoolHandle, ()>::with_key();
    let query_pool = query_pools.insert(());
    let mut resources = slotmap::SlotMap::<crate::types::ResourceHandle, ()>::with_key();
    let source = resources.insert(());
    let destination = resources.insert(());

    let mut command_buffer = CommandBuffer::new();
    SetGraphicsRootSignature::create(&mut command_buffer, Default::default());
    SetGraphicsResourceGroup::create(&mut command_buffer, 0, Default::default());
    SetGraphicsVertexArray::create(&mut command_buffer, Default::default());
    SetGraphicsRenderTarget::create(&mut command_buffer, Default::default());
    DrawMeshTasks::create_inline(&mut command_buffer, 8, 0);
    SetComputeRootSignature::create(&mut command_buffer, Default::default());
    SetComputePipelineState::create(&mut command_buffer, Default::default());
    SetComputeResourceGroup::create(&mut command_buffer, 1, Default::default());
    CopyResource::create(&mut command_buffer, destination, source);
    GenerateMipmaps::create(&mut command_buffer, destination);
    ResetQueryPool::create(&mut command_buffer, query_pool, 0, 2);
    BeginQuery::create(&mut command_buffer, query_pool, 0, crate::types::QueryControlFlags::PRECISE);
    EndQuery::create(&mut command_buffer, query_pool, 0);
    WriteTimestampQuery::create(&mut command_buffer, query_pool, 1);

    let events = replay(&command_buffer);
    let expected = [
        DispatchIndex::SetGraphicsRootSignature,
        DispatchIndex::SetGraphicsResourceGroup,
        DispatchIndex::SetGraphicsVertexArray,
        DispatchIndex::SetGraphicsRenderTarget,
        DispatchIndex::DrawMeshTasks,
        DispatchIndex::SetComputeRootSignature,
        DispatchIndex::SetComputePipelineState,
        DispatchIndex::SetComputeResourceGroup,
        DispatchIndex::CopyResource,
        DispatchIndex::GenerateMipmaps,
        DispatchIndex::ResetQueryPool,
        DispatchIndex::BeginQuery,
        DispatchIndex::EndQuery,
        DispatchIndex::WriteTimestampQuery,
    ];
    assert_eq!(events.len(), expected.len());
    for (event, index) in events.iter().zip(expected) {
        assert_eq!(*event, Event::Other(index));
    }
}

#[cfg(debug_assertions)]
#[test]
fn test_debug_events_round_trip() {
    let mut command_buffer = CommandBuffer::new();
    BeginDebugEvent::create(&mut command_buffer, "Frame");
    SetDebugMarker::create(&mut command_buffer, "Opaque pass");
    EndDebugEvent::create(&mut command_buffer);

    let events = replay(&command_buffer);
    assert_eq!(
        events,
        vec![
            Event::BeginEvent("Frame".to_owned()),
            Event::Marker("Opaque pass".to_owned()),
            Event::EndEvent,
        ]
    );
}
