//! # RHI Command Recording & Dispatch
//!
//! Backend-independent command recording for a multi-backend rendering
//! hardware interface (RHI). Renderer code records draw, state, resource,
//! query and debug commands once into a single contiguous byte arena; the
//! recording can then be replayed any number of times against whichever
//! backend is active, without per-command virtual calls.
//!
//! ## Architecture
//!
//! - **CommandBuffer**: growable byte arena holding a singly linked sequence
//!   of command packets ([`buffer`])
//! - **Command Catalog**: one POD struct per command kind with a `create`
//!   helper and a stable dispatch index ([`command`])
//! - **Dispatch Table**: per-backend array of erased handler functions,
//!   indexed by dispatch index while walking a buffer ([`dispatch`])
//! - **Backends**: anything implementing [`Rhi`]; a logging [`NullRhi`]
//!   ships as the reference implementation ([`backend`])
//!
//! ## Quick Start
//!
//! ```rust
//! use rhi_command::{ClearFlags, CommandBuffer, NullRhi};
//! use rhi_command::command::graphics::{ClearGraphics, DrawGraphics};
//!
//! let mut command_buffer = CommandBuffer::new();
//! ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR_DEPTH, [0.6, 0.8, 1.0, 1.0], 0.0, 0);
//! DrawGraphics::create_inline(&mut command_buffer, 3, 1, 0, 0);
//!
//! let mut rhi = NullRhi::new();
//! command_buffer.submit_to_rhi(&mut rhi);
//! command_buffer.submit_to_rhi(&mut rhi); // a recording replays any number of times
//! ```
//!
//! ## Threading
//!
//! A `CommandBuffer` is single-threaded by design. For multithreaded
//! recording, record into independent per-thread buffers in parallel and
//! splice them into one buffer in a fixed order before submission
//! ([`CommandBuffer::submit_to_command_buffer`]).

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]
#![allow(clippy::cast_possible_truncation)]

mod arena;

pub mod backend;
pub mod buffer;
pub mod command;
pub mod dispatch;
pub mod packet;
pub mod rhi;
pub mod types;

#[cfg(test)]
mod command_buffer_tests;

pub use backend::null::NullRhi;
pub use buffer::{CommandBuffer, GROWTH_CHUNK_SIZE, MAXIMUM_ARENA_BYTES};
pub use command::{Command, DispatchIndex, ExecuteCommandBuffer};
pub use dispatch::{CommandDispatch, CommandHandler, DispatchTable, DispatchTableBuilder, DispatchTableError};
pub use rhi::Rhi;
pub use types::{
    ClearFlags, DrawArguments, DrawIndexedArguments, DrawMeshTasksArguments, IndirectBufferHandle,
    PipelineStateHandle, QueryControlFlags, QueryPoolHandle, RenderTargetHandle, ResourceGroupHandle,
    ResourceHandle, RootSignatureHandle, ScissorRectangle, VertexArrayHandle, Viewport,
};
