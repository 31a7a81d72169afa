//! # Command Buffer
//!
//! A [`CommandBuffer`] records commands once, backend-independent, into a
//! single contiguous byte arena and replays them against whichever backend is
//! active. Packets form a singly linked list of arena offsets (never cached
//! addresses — growth may relocate the arena), so replay is one flat,
//! cache-friendly walk with an indexed function call per command.
//!
//! ## Lifecycle
//!
//! Created empty → [`CommandBuffer::add_command`] appends packets →
//! [`CommandBuffer::submit_to_rhi`] / [`CommandBuffer::submit_to_command_buffer`]
//! read without mutating → [`CommandBuffer::clear`] resets for reuse →
//! destruction frees the arena. The arena is append-only while recording and
//! its capacity never shrinks, so a cleared buffer re-records without
//! reallocating.
//!
//! ## Failure semantics
//!
//! This is a trusted internal primitive, not an untrusted-input boundary:
//! contract violations (submitting an empty buffer, oversized payload
//! alignment) are `debug_assert!`s, allocation failure aborts, and only the
//! near-4-GiB arena and packet footprint bounds are checked unconditionally
//! because exceeding them would corrupt offsets.

use crate::arena::Arena;
use crate::command::Command;
use crate::packet;
use crate::rhi::Rhi;

/// Fixed growth granularity of the arena.
///
/// Growth allocates this much on top of the currently requested packet size,
/// which keeps bursty large requests from reallocating repeatedly.
pub const GROWTH_CHUNK_SIZE: u32 = 8192;

/// Upper bound of the arena in bytes, kept below the
/// [`packet::INVALID_BYTE_OFFSET`] sentinel so every valid offset stays
/// representable.
pub const MAXIMUM_ARENA_BYTES: u32 = u32::MAX - packet::PACKET_ALIGNMENT;

/// Growable byte arena storing a singly linked sequence of command packets.
///
/// Not internally synchronized: one instance belongs to one recording thread.
/// The standard multithreaded pattern is per-thread buffers recorded in
/// parallel and spliced together in a fixed order on one thread (the type is
/// `Send`, and replay through `&self` is `Sync`-safe).
pub struct CommandBuffer {
    arena: Arena,
    /// Write cursor; always a multiple of [`packet::PACKET_ALIGNMENT`].
    write_offset: u32,
    /// Offset of the most recently written packet header, or the sentinel
    /// when nothing has been recorded. Also the `is_empty` tracker: a byte
    /// count alone could not tell "empty" from "one zero-length packet".
    previous_packet_offset: u32,
    #[cfg(debug_assertions)]
    command_count: u32,
}

impl CommandBuffer {
    /// Create an empty command buffer without any backing allocation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: Arena::empty(),
            write_offset: 0,
            previous_packet_offset: packet::INVALID_BYTE_OFFSET,
            #[cfg(debug_assertions)]
            command_count: 0,
        }
    }

    /// Create an empty command buffer with pre-allocated arena capacity.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        let mut command_buffer = Self::new();
        if capacity > 0 {
            command_buffer.arena.grow(capacity.min(MAXIMUM_ARENA_BYTES), 0);
        }
        command_buffer
    }

    /// True iff no command has been recorded since construction or the last
    /// [`clear`](Self::clear).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.previous_packet_offset == packet::INVALID_BYTE_OFFSET
    }

    /// Number of arena bytes currently holding packets.
    #[must_use]
    pub const fn used_bytes(&self) -> u32 {
        self.write_offset
    }

    /// Current arena capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.arena.capacity()
    }

    /// Number of recorded commands. Debug builds only; release builds do not
    /// pay for the counter.
    #[cfg(debug_assertions)]
    #[must_use]
    pub const fn command_count(&self) -> u32 {
        self.command_count
    }

    /// Append a command without auxiliary bytes.
    ///
    /// Prefer the catalog's `create` helpers; this is the underlying
    /// primitive they all funnel through. Returns a reference to the payload
    /// inside the arena so callers can patch it in place before the next
    /// `add_command` call (the reference is invalidated by any further
    /// recording, enforced by the borrow).
    pub fn add_command<T: Command>(&mut self, command: T) -> &mut T {
        self.add_command_with_auxiliary(command, &[])
    }

    /// Append a command followed by `auxiliary` bytes stored directly behind
    /// the payload.
    ///
    /// The auxiliary length is not persisted in the packet; the handler that
    /// consumes this command kind knows it out of band (see
    /// [`crate::packet`]).
    pub fn add_command_with_auxiliary<T: Command>(&mut self, command: T, auxiliary: &[u8]) -> &mut T {
        debug_assert!(
            std::mem::align_of::<T>() <= packet::PACKET_ALIGNMENT as usize,
            "command payload alignment exceeds packet alignment"
        );
        assert!(
            auxiliary.len() <= MAXIMUM_ARENA_BYTES as usize,
            "auxiliary data exceeds the arena addressing limit"
        );

        let payload_size = std::mem::size_of::<T>() as u32;
        let packet_size = packet::packet_size(payload_size, auxiliary.len() as u32);
        let packet_offset = self.write_offset;
        self.ensure_capacity(packet_size);

        // SAFETY: `ensure_capacity` guarantees `packet_offset + packet_size`
        // bytes of arena storage; `packet_offset` and the previous packet
        // offset are multiples of the packet alignment by construction.
        unsafe {
            let base = self.arena.as_mut_ptr();
            if self.previous_packet_offset != packet::INVALID_BYTE_OFFSET {
                packet::write_next_packet_byte_offset(
                    base.add(self.previous_packet_offset as usize),
                    packet_offset,
                );
            }

            let packet = base.add(packet_offset as usize);
            packet::write_next_packet_byte_offset(packet, packet::INVALID_BYTE_OFFSET);
            packet::write_dispatch_index(packet, T::DISPATCH_INDEX as u32);

            let payload = packet.add(packet::PACKET_HEADER_SIZE as usize).cast::<T>();
            payload.write(command);
            if !auxiliary.is_empty() {
                std::ptr::copy_nonoverlapping(
                    auxiliary.as_ptr(),
                    payload.cast::<u8>().add(payload_size as usize),
                    auxiliary.len(),
                );
            }

            self.previous_packet_offset = packet_offset;
            self.write_offset = packet_offset + packet_size;
            #[cfg(debug_assertions)]
            {
                self.command_count += 1;
            }

            &mut *payload
        }
    }

    /// Forget all recorded commands, keeping the allocated capacity for
    /// amortized reuse. Memory is not zeroed.
    pub fn clear(&mut self) {
        self.write_offset = 0;
        self.previous_packet_offset = packet::INVALID_BYTE_OFFSET;
        #[cfg(debug_assertions)]
        {
            self.command_count = 0;
        }
    }

    /// Hand the recording to a backend for replay.
    ///
    /// The buffer is not mutated; the same recording may be submitted any
    /// number of times. Submitting an empty buffer is a contract violation.
    pub fn submit_to_rhi<R: Rhi + ?Sized>(&self, rhi: &mut R) {
        debug_assert!(!self.is_empty(), "attempt to submit an empty command buffer");
        rhi.submit_command_buffer(self);
    }

    /// [`submit_to_rhi`](Self::submit_to_rhi), then [`clear`](Self::clear).
    pub fn submit_to_rhi_and_clear<R: Rhi + ?Sized>(&mut self, rhi: &mut R) {
        self.submit_to_rhi(rhi);
        self.clear();
    }

    /// Splice this buffer's packets onto the end of `destination`.
    ///
    /// Byte-copies the packets, shifts every copied next-offset by the
    /// destination's prior write cursor and links the destination's former
    /// last packet to the first copied one. Payload bytes, including embedded
    /// handles and pointers, are copied verbatim; no ownership transfers.
    ///
    /// Splicing a buffer into itself is unrepresentable: `&self` and
    /// `&mut destination` cannot alias. Splicing an empty buffer is a
    /// contract violation.
    pub fn submit_to_command_buffer(&self, destination: &mut CommandBuffer) {
        debug_assert!(!self.is_empty(), "attempt to splice an empty command buffer");

        let splice_base = destination.write_offset;
        destination.ensure_capacity(self.write_offset);

        // SAFETY: the destination now has room for all of our used bytes,
        // both arenas are live and distinct, and every offset touched below
        // was produced by `add_command` bookkeeping.
        unsafe {
            let destination_base = destination.arena.as_mut_ptr();
            std::ptr::copy_nonoverlapping(
                self.arena.as_ptr(),
                destination_base.add(splice_base as usize),
                self.write_offset as usize,
            );

            if destination.previous_packet_offset != packet::INVALID_BYTE_OFFSET {
                packet::write_next_packet_byte_offset(
                    destination_base.add(destination.previous_packet_offset as usize),
                    splice_base,
                );
            }

            // Shift the copied next-offsets into the destination's offset
            // space. The last copied packet keeps its sentinel and becomes
            // the destination's new tail.
            let mut offset = splice_base;
            loop {
                let header = destination_base.add(offset as usize);
                let next = packet::read_next_packet_byte_offset(header);
                if next == packet::INVALID_BYTE_OFFSET {
                    break;
                }
                let shifted = splice_base + next;
                packet::write_next_packet_byte_offset(header, shifted);
                offset = shifted;
            }
        }

        destination.previous_packet_offset = splice_base + self.previous_packet_offset;
        destination.write_offset = splice_base + self.write_offset;
        #[cfg(debug_assertions)]
        {
            destination.command_count += self.command_count;
        }

        log::trace!(
            "spliced {} bytes of command packets at destination offset {}",
            self.write_offset,
            splice_base
        );
    }

    /// [`submit_to_command_buffer`](Self::submit_to_command_buffer), then
    /// [`clear`](Self::clear).
    pub fn submit_to_command_buffer_and_clear(&mut self, destination: &mut CommandBuffer) {
        self.submit_to_command_buffer(destination);
        self.clear();
    }

    /// Base address of the arena for the replay walk.
    pub(crate) const fn arena_base(&self) -> *const u8 {
        self.arena.as_ptr()
    }

    /// Grow the arena if `additional_bytes` do not fit behind the cursor.
    fn ensure_capacity(&mut self, additional_bytes: u32) {
        let required = u64::from(self.write_offset) + u64::from(additional_bytes);
        assert!(
            required <= u64::from(MAXIMUM_ARENA_BYTES),
            "command buffer arena exceeds the u32 addressing limit"
        );
        if required > u64::from(self.arena.capacity()) {
            let new_capacity = (u64::from(self.arena.capacity())
                + u64::from(GROWTH_CHUNK_SIZE)
                + u64::from(additional_bytes))
            .min(u64::from(MAXIMUM_ARENA_BYTES)) as u32;
            log::trace!(
                "growing command buffer arena from {} to {} bytes",
                self.arena.capacity(),
                new_capacity
            );
            self.arena.grow(new_capacity, self.write_offset);
        }
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}
