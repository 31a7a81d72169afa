//! Command recording and replay demo
//!
//! Records a representative frame of RHI commands (state setup, clear,
//! inline and indirect draws, a pre-recorded static scene spliced in via
//! execute-sub-buffer, queries, debug events) and replays it against the
//! null backend. Run with `RUST_LOG=debug` to watch every dispatched
//! command.

mod config;

use rhi_command::command::compute::DispatchCompute;
use rhi_command::command::debug::{BeginDebugEvent, EndDebugEvent, SetDebugMarker};
use rhi_command::command::graphics::{
    ClearGraphics, DrawGraphics, SetGraphicsPipelineState, SetGraphicsRenderTarget,
    SetGraphicsRootSignature, SetGraphicsScissorRectangles, SetGraphicsVertexArray,
    SetGraphicsViewports,
};
use rhi_command::command::query::{BeginQuery, EndQuery, ResetQueryPool, WriteTimestampQuery};
use rhi_command::command::ExecuteCommandBuffer;
use rhi_command::{
    ClearFlags, CommandBuffer, NullRhi, PipelineStateHandle, QueryControlFlags, QueryPoolHandle,
    Rhi, RootSignatureHandle, VertexArrayHandle,
};
use slotmap::SlotMap;

use crate::config::ReplayConfig;

/// Demo stand-ins for backend-owned resource tables. A real renderer's
/// resource manager owns these; the command buffer only ever records the keys.
struct DemoResources {
    root_signature: RootSignatureHandle,
    pipeline_state: PipelineStateHandle,
    vertex_array: VertexArrayHandle,
    query_pool: QueryPoolHandle,
}

impl DemoResources {
    fn new() -> Self {
        let mut root_signatures = SlotMap::<RootSignatureHandle, ()>::with_key();
        let mut pipeline_states = SlotMap::<PipelineStateHandle, ()>::with_key();
        let mut vertex_arrays = SlotMap::<VertexArrayHandle, ()>::with_key();
        let mut query_pools = SlotMap::<QueryPoolHandle, ()>::with_key();
        Self {
            root_signature: root_signatures.insert(()),
            pipeline_state: pipeline_states.insert(()),
            vertex_array: vertex_arrays.insert(()),
            query_pool: query_pools.insert(()),
        }
    }
}

/// Record the static portion of the scene once; it is replayed every frame
/// through an execute-sub-buffer command.
fn record_static_scene(resources: &DemoResources) -> CommandBuffer {
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsVertexArray::create(&mut command_buffer, resources.vertex_array);
    DrawGraphics::create_inline(&mut command_buffer, 36, 1, 0, 0);
    command_buffer
}

fn record_frame(
    command_buffer: &mut CommandBuffer,
    static_scene: &CommandBuffer,
    resources: &DemoResources,
    config: &ReplayConfig,
) {
    if config.debug_events {
        BeginDebugEvent::create(command_buffer, "Frame");
    }

    ResetQueryPool::create(command_buffer, resources.query_pool, 0, 2);
    WriteTimestampQuery::create(command_buffer, resources.query_pool, 0);
    BeginQuery::create(command_buffer, resources.query_pool, 0, QueryControlFlags::empty());

    SetGraphicsRenderTarget::create(command_buffer, Default::default());
    SetGraphicsViewports::create_single(command_buffer, 0.0, 0.0, 1280.0, 720.0);
    SetGraphicsScissorRectangles::create_single(command_buffer, 0, 0, 1280, 720);
    ClearGraphics::create(command_buffer, ClearFlags::COLOR_DEPTH, [0.6, 0.8, 1.0, 1.0], 0.0, 0);

    SetGraphicsRootSignature::create(command_buffer, resources.root_signature);
    SetGraphicsPipelineState::create(command_buffer, resources.pipeline_state);

    if config.debug_events {
        SetDebugMarker::create(command_buffer, "Static scene");
    }
    ExecuteCommandBuffer::create(command_buffer, static_scene);

    for i in 0..config.draws_per_frame {
        DrawGraphics::create_inline(command_buffer, 3, 1, i * 3, 0);
    }

    // Post-process style compute pass.
    DispatchCompute::create(command_buffer, 1280 / 8, 720 / 8, 1);

    WriteTimestampQuery::create(command_buffer, resources.query_pool, 1);
    EndQuery::create(command_buffer, resources.query_pool, 0);

    if config.debug_events {
        EndDebugEvent::create(command_buffer);
    }
}

fn main() {
    env_logger::init();
    let config = ReplayConfig::load_or_default("replay.toml");
    log::info!("replay demo starting: {config:?}");

    let resources = DemoResources::new();
    let static_scene = record_static_scene(&resources);
    let mut rhi = NullRhi::new();
    log::info!("active backend: {}", rhi.name());

    let mut frame_buffer = CommandBuffer::new();
    for frame in 0..config.frames {
        record_frame(&mut frame_buffer, &static_scene, &resources, &config);
        log::info!(
            "frame {frame}: {} bytes recorded (arena capacity {})",
            frame_buffer.used_bytes(),
            frame_buffer.capacity()
        );
        frame_buffer.submit_to_rhi_and_clear(&mut rhi);
    }

    log::info!(
        "replayed {} command buffer submissions (nested executions included)",
        rhi.submitted_command_buffers()
    );
}
