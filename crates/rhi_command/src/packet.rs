//! Command packet layout
//!
//! One packet is one self-contained record inside a command buffer's arena:
//!
//! ```text
//! byte 0      4               8                8 + size_of::<T>()
//! +-----------+---------------+----------------+------------------+
//! | next      | dispatch      | payload T      | auxiliary bytes  |
//! | offset    | index         | (POD struct)   | (0 or more)      |
//! +-----------+---------------+----------------+------------------+
//! ```
//!
//! `next offset` is the absolute arena offset of the following packet, or
//! [`INVALID_BYTE_OFFSET`] for the last packet, so a buffer can be walked
//! without any external index. Auxiliary bytes carry variable data (inline
//! draw arguments, single-item viewport or scissor values) directly behind
//! the fixed payload; their length is not persisted — the recording `create`
//! helper and the one handler that reads them agree on it out of band.
//!
//! Every packet footprint is rounded up to [`PACKET_ALIGNMENT`] so packets
//! always start at aligned offsets and payloads can be read through `&T`
//! references, even after arena growth or buffer splicing.

/// Sentinel offset meaning "no packet here".
///
/// Used both as the last packet's next-offset and as a command buffer's
/// "no previous packet" marker.
pub const INVALID_BYTE_OFFSET: u32 = u32::MAX;

/// Fixed size of the packet header (next-offset plus dispatch index).
pub const PACKET_HEADER_SIZE: u32 = 8;

/// Alignment of every packet start inside the arena.
///
/// Must not exceed [`crate::arena::ARENA_ALIGNMENT`]; payload types with a
/// stricter alignment requirement cannot be recorded.
pub const PACKET_ALIGNMENT: u32 = 8;

const DISPATCH_INDEX_OFFSET: usize = 4;

/// Round a raw packet footprint up to the packet alignment.
#[must_use]
pub const fn align_packet_size(number_of_bytes: u32) -> u32 {
    (number_of_bytes + (PACKET_ALIGNMENT - 1)) & !(PACKET_ALIGNMENT - 1)
}

/// Total aligned footprint of a packet with the given payload and auxiliary sizes.
///
/// Panics when the combined sizes exceed the `u32` offset range instead of
/// wrapping; the sum is accumulated in `u64` so the check itself cannot wrap.
#[must_use]
pub const fn packet_size(payload_size: u32, auxiliary_size: u32) -> u32 {
    let footprint = PACKET_HEADER_SIZE as u64 + payload_size as u64 + auxiliary_size as u64;
    assert!(
        footprint <= (u32::MAX - (PACKET_ALIGNMENT - 1)) as u64,
        "packet footprint exceeds the u32 offset range"
    );
    align_packet_size(footprint as u32)
}

/// Write a packet's next-offset field.
///
/// # Safety
///
/// `packet` must point at a packet header inside a live arena, aligned to
/// [`PACKET_ALIGNMENT`].
pub unsafe fn write_next_packet_byte_offset(packet: *mut u8, next_packet_byte_offset: u32) {
    packet.cast::<u32>().write(next_packet_byte_offset);
}

/// Read a packet's next-offset field.
///
/// # Safety
///
/// Same requirements as [`write_next_packet_byte_offset`].
pub unsafe fn read_next_packet_byte_offset(packet: *const u8) -> u32 {
    packet.cast::<u32>().read()
}

/// Write a packet's dispatch index field.
///
/// # Safety
///
/// Same requirements as [`write_next_packet_byte_offset`].
pub unsafe fn write_dispatch_index(packet: *mut u8, dispatch_index: u32) {
    packet.add(DISPATCH_INDEX_OFFSET).cast::<u32>().write(dispatch_index);
}

/// Read a packet's dispatch index field.
///
/// # Safety
///
/// Same requirements as [`write_next_packet_byte_offset`].
pub unsafe fn read_dispatch_index(packet: *const u8) -> u32 {
    packet.add(DISPATCH_INDEX_OFFSET).cast::<u32>().read()
}

/// Address of the payload stored directly behind a packet header.
///
/// # Safety
///
/// Same requirements as [`write_next_packet_byte_offset`].
pub unsafe fn payload_ptr(packet: *const u8) -> *const u8 {
    packet.add(PACKET_HEADER_SIZE as usize)
}

/// Address of the auxiliary bytes stored directly behind a payload of type `T`.
///
/// # Safety
///
/// `payload` must point at a `T` payload inside a live arena packet that was
/// recorded with auxiliary bytes.
pub unsafe fn auxiliary_memory<T>(payload: *const T) -> *const u8 {
    payload.cast::<u8>().add(std::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_packet_size_rounds_to_alignment() {
        assert_eq!(align_packet_size(0), 0);
        assert_eq!(align_packet_size(1), 8);
        assert_eq!(align_packet_size(8), 8);
        assert_eq!(align_packet_size(9), 16);
        assert_eq!(align_packet_size(24), 24);
    }

    #[test]
    fn test_packet_size_includes_header_payload_and_auxiliary() {
        // Header only (zero-sized payload, no auxiliary data).
        assert_eq!(packet_size(0, 0), 8);
        // 12-byte payload rounds 8 + 12 up to 24.
        assert_eq!(packet_size(12, 0), 24);
        // 16-byte payload plus 24 auxiliary bytes is already aligned.
        assert_eq!(packet_size(16, 24), 48);
    }

    #[test]
    fn test_packet_size_boundary_does_not_wrap() {
        // Largest footprint whose aligned size still fits in a u32 offset.
        let largest_auxiliary = u32::MAX - (PACKET_ALIGNMENT - 1) - PACKET_HEADER_SIZE;
        assert_eq!(packet_size(0, largest_auxiliary), u32::MAX - (PACKET_ALIGNMENT - 1));
    }

    #[test]
    #[should_panic(expected = "packet footprint exceeds the u32 offset range")]
    fn test_packet_size_rejects_footprints_past_the_offset_range() {
        let _ = packet_size(16, u32::MAX - 16);
    }
}
