//! Backend contract
//!
//! The call-level boundary between recorded command buffers and whichever
//! backend is active. A backend implements exactly one entry point,
//! [`Rhi::submit_command_buffer`], walking the packets through its own
//! [`DispatchTable`](crate::dispatch::DispatchTable) and never assuming more
//! about the arena layout than [`crate::packet`] specifies.

use crate::buffer::CommandBuffer;

/// A rendering backend capable of replaying recorded command buffers.
pub trait Rhi {
    /// Human-readable backend name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Replay every command of `command_buffer`, in recording order.
    ///
    /// Must not mutate the buffer; callers may submit the same recording any
    /// number of times.
    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer);
}
