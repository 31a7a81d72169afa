//! Debug markers and events
//!
//! Debug-only surface: the structs and their dispatch indices exist in every
//! build so recordings stay layout-stable, but the `create` helpers compile
//! to no-ops in release builds. Names are bounded ASCII (127 visible
//! characters plus terminator) stored inline as a fixed 128-byte payload
//! field rather than as auxiliary bytes — debug strings are short and rare,
//! so the fixed field trades a little memory for simplicity.

use crate::buffer::CommandBuffer;
use crate::command::{Command, DispatchIndex};

/// Fixed byte size of an inline debug name, terminator included.
pub const MAXIMUM_DEBUG_NAME_LENGTH: usize = 128;

/// Copy a debug name into its fixed inline field, NUL-padded.
///
/// Over-long or non-ASCII names are a contract violation; release builds
/// truncate instead of reading out of bounds.
#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn pack_debug_name(name: &str) -> [u8; MAXIMUM_DEBUG_NAME_LENGTH] {
    debug_assert!(name.is_ascii(), "debug names must be ASCII");
    debug_assert!(
        name.len() < MAXIMUM_DEBUG_NAME_LENGTH,
        "debug names are limited to 127 characters"
    );
    let mut packed = [0u8; MAXIMUM_DEBUG_NAME_LENGTH];
    let length = name.len().min(MAXIMUM_DEBUG_NAME_LENGTH - 1);
    packed[..length].copy_from_slice(&name.as_bytes()[..length]);
    packed
}

fn unpack_debug_name(packed: &[u8; MAXIMUM_DEBUG_NAME_LENGTH]) -> &str {
    let length = packed.iter().position(|&byte| byte == 0).unwrap_or(packed.len());
    std::str::from_utf8(&packed[..length]).unwrap_or("")
}

/// Place a single named marker into the command stream.
#[derive(Clone, Copy)]
pub struct SetDebugMarker {
    /// NUL-terminated ASCII marker name.
    pub name: [u8; MAXIMUM_DEBUG_NAME_LENGTH],
}

impl SetDebugMarker {
    /// Record the marker; no-op in release builds.
    pub fn create(command_buffer: &mut CommandBuffer, name: &str) {
        #[cfg(debug_assertions)]
        command_buffer.add_command(Self {
            name: pack_debug_name(name),
        });
        #[cfg(not(debug_assertions))]
        let _ = (command_buffer, name);
    }

    /// The marker name as a string slice.
    #[must_use]
    pub fn name(&self) -> &str {
        unpack_debug_name(&self.name)
    }
}

impl Command for SetDebugMarker {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::SetDebugMarker;
}

impl std::fmt::Debug for SetDebugMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetDebugMarker").field("name", &self.name()).finish()
    }
}

/// Open a named, nestable debug event scope.
#[derive(Clone, Copy)]
pub struct BeginDebugEvent {
    /// NUL-terminated ASCII event name.
    pub name: [u8; MAXIMUM_DEBUG_NAME_LENGTH],
}

impl BeginDebugEvent {
    /// Record the event begin; no-op in release builds.
    pub fn create(command_buffer: &mut CommandBuffer, name: &str) {
        #[cfg(debug_assertions)]
        command_buffer.add_command(Self {
            name: pack_debug_name(name),
        });
        #[cfg(not(debug_assertions))]
        let _ = (command_buffer, name);
    }

    /// The event name as a string slice.
    #[must_use]
    pub fn name(&self) -> &str {
        unpack_debug_name(&self.name)
    }
}

impl Command for BeginDebugEvent {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::BeginDebugEvent;
}

impl std::fmt::Debug for BeginDebugEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeginDebugEvent").field("name", &self.name()).finish()
    }
}

/// Close the innermost debug event scope opened by [`BeginDebugEvent`].
#[derive(Debug, Clone, Copy)]
pub struct EndDebugEvent;

impl EndDebugEvent {
    /// Record the event end; no-op in release builds.
    pub fn create(command_buffer: &mut CommandBuffer) {
        #[cfg(debug_assertions)]
        command_buffer.add_command(Self);
        #[cfg(not(debug_assertions))]
        let _ = command_buffer;
    }
}

impl Command for EndDebugEvent {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::EndDebugEvent;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_name_round_trip() {
        let packed = pack_debug_name("Shadow map pass");
        assert_eq!(unpack_debug_name(&packed), "Shadow map pass");
    }

    #[test]
    fn test_debug_name_is_nul_padded() {
        let packed = pack_debug_name("a");
        assert_eq!(packed[0], b'a');
        assert!(packed[1..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_longest_legal_name_keeps_terminator() {
        let name = "x".repeat(MAXIMUM_DEBUG_NAME_LENGTH - 1);
        let packed = pack_debug_name(&name);
        assert_eq!(packed[MAXIMUM_DEBUG_NAME_LENGTH - 1], 0);
        assert_eq!(unpack_debug_name(&packed), name);
    }
}
