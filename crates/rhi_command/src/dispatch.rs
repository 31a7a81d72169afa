//! # Dispatch Table
//!
//! Type erasure without virtual dispatch: every backend owns one fixed-size
//! array of function pointers, one slot per [`DispatchIndex`], and replaying
//! a command buffer is a single flat walk with an indexed call per packet —
//! no per-command trait objects, no `match` chains.
//!
//! Handlers are registered through the typed [`CommandDispatch`] trait:
//! [`DispatchTableBuilder::register`] derives the slot from the command
//! type's dispatch index and wraps the typed handler in a monomorphized
//! erasing thunk, so a handler can never end up in a slot whose payload type
//! it does not match. [`DispatchTableBuilder::build`] refuses tables with an
//! empty slot — the closed catalog demands exactly one handler per kind.

use thiserror::Error;

use crate::buffer::CommandBuffer;
use crate::command::{Command, DispatchIndex};
use crate::packet;

/// Erased handler signature stored in a dispatch table.
///
/// # Safety
///
/// `payload` points at the payload of a packet whose dispatch index selected
/// this slot; the handler may cast it to exactly the command type registered
/// for that index.
pub type CommandHandler<R> = unsafe fn(payload: *const u8, rhi: &mut R);

/// A backend's reaction to one command kind.
///
/// Backends implement this once per catalog command; the blanket erasing
/// thunk in [`DispatchTableBuilder::register`] turns each implementation
/// into a table entry.
pub trait CommandDispatch<R>: Command {
    /// Translate the recorded command for the backend.
    fn execute(&self, rhi: &mut R);
}

/// Error building a dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchTableError {
    /// A command kind was left without a handler; dispatching a buffer
    /// containing it would have no code to run.
    #[error("no handler registered for dispatch index {0:?}")]
    MissingHandler(DispatchIndex),
}

/// Fixed-size array of erased handlers, one per command kind, populated once
/// per backend.
pub struct DispatchTable<R> {
    handlers: [CommandHandler<R>; DispatchIndex::COUNT],
}

impl<R> DispatchTable<R> {
    /// Start registering handlers.
    #[must_use]
    pub fn builder() -> DispatchTableBuilder<R> {
        DispatchTableBuilder::new()
    }

    /// Replay `command_buffer` against `rhi`.
    ///
    /// Walks the packets from offset 0 following each next-offset until the
    /// sentinel, invoking the indexed handler per packet: single pass, O(N)
    /// in the number of commands, no allocation, no mutation of the buffer.
    /// An empty buffer dispatches nothing.
    pub fn dispatch(&self, command_buffer: &CommandBuffer, rhi: &mut R) {
        if command_buffer.is_empty() {
            return;
        }

        let base = command_buffer.arena_base();
        let mut offset = 0u32;
        loop {
            // SAFETY: offsets and dispatch indices were written by
            // `CommandBuffer::add_command` bookkeeping; the handler in a slot
            // matches the payload type recorded with that index because
            // registration is typed.
            unsafe {
                let header = base.add(offset as usize);
                let dispatch_index = packet::read_dispatch_index(header);
                debug_assert!(
                    DispatchIndex::from_u32(dispatch_index).is_some(),
                    "corrupt dispatch index {dispatch_index} at offset {offset}"
                );
                self.handlers[dispatch_index as usize](packet::payload_ptr(header), rhi);

                let next = packet::read_next_packet_byte_offset(header);
                if next == packet::INVALID_BYTE_OFFSET {
                    break;
                }
                offset = next;
            }
        }
    }
}

/// Incrementally populated [`DispatchTable`].
pub struct DispatchTableBuilder<R> {
    handlers: [Option<CommandHandler<R>>; DispatchIndex::COUNT],
}

impl<R> DispatchTableBuilder<R> {
    /// Create a builder with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: [None; DispatchIndex::COUNT],
        }
    }

    /// Register the handler for command type `T` in the slot its dispatch
    /// index names.
    #[must_use]
    pub fn register<T: CommandDispatch<R>>(mut self) -> Self {
        self.handlers[T::DISPATCH_INDEX as usize] = Some(dispatch_thunk::<R, T>);
        self
    }

    /// Finish the table, verifying that every command kind has a handler.
    pub fn build(self) -> Result<DispatchTable<R>, DispatchTableError> {
        let mut handlers = [unregistered_handler::<R> as CommandHandler<R>; DispatchIndex::COUNT];
        for index in DispatchIndex::ALL {
            match self.handlers[index as usize] {
                Some(handler) => handlers[index as usize] = handler,
                None => return Err(DispatchTableError::MissingHandler(index)),
            }
        }
        Ok(DispatchTable { handlers })
    }
}

impl<R> Default for DispatchTableBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Casts the erased payload back to the registered command type.
unsafe fn dispatch_thunk<R, T: CommandDispatch<R>>(payload: *const u8, rhi: &mut R) {
    T::execute(&*payload.cast::<T>(), rhi);
}

/// Placeholder used while building; `build` either overwrites every slot or
/// returns an error, so this can never be invoked.
unsafe fn unregistered_handler<R>(_payload: *const u8, _rhi: &mut R) {
    unreachable!("dispatch table slot without a handler survived validation");
}
