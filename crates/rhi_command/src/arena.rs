//! Aligned, growable byte storage underneath a command buffer
//!
//! `Vec<u8>` only guarantees single-byte alignment, which is not enough for
//! packet headers and payloads that are read through typed pointers. This
//! arena allocates through `std::alloc` with an explicit layout so every
//! packet offset that is a multiple of [`ARENA_ALIGNMENT`] maps to a
//! correctly aligned address, before and after growth.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::ptr::NonNull;

/// Alignment of the arena's base address.
///
/// Large enough for every payload field the command catalog stores
/// (`u64`-sized pointers at most); [`crate::packet`] rounds packet footprints
/// to the same value so the alignment holds at every packet start.
pub const ARENA_ALIGNMENT: usize = 8;

/// Owned block of raw bytes whose capacity only ever grows.
pub struct Arena {
    data: NonNull<u8>,
    capacity: u32,
}

impl Arena {
    /// Create an arena without any backing allocation.
    pub const fn empty() -> Self {
        // A dangling-but-aligned pointer; never dereferenced at capacity 0.
        Self {
            data: NonNull::<u64>::dangling().cast(),
            capacity: 0,
        }
    }

    /// Current capacity in bytes.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Base address for reading previously written bytes.
    pub const fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Base address for writing.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// Grow to `new_capacity` bytes, preserving the first `used_bytes` bytes
    /// at their current relative offsets.
    ///
    /// Allocates the larger block, copies the used prefix over and frees the
    /// old block. Allocation failure aborts via [`handle_alloc_error`]; this
    /// is bookkeeping memory the process cannot run without.
    pub fn grow(&mut self, new_capacity: u32, used_bytes: u32) {
        debug_assert!(new_capacity > self.capacity, "arena capacity only grows");
        debug_assert!(used_bytes <= self.capacity, "used bytes exceed current capacity");

        let new_layout = layout(new_capacity);
        // SAFETY: `new_layout` has non-zero size (new_capacity > capacity >= 0)
        // and a valid power-of-two alignment.
        let new_data = unsafe { alloc(new_layout) };
        let Some(new_data) = NonNull::new(new_data) else {
            handle_alloc_error(new_layout);
        };

        if self.capacity > 0 {
            // SAFETY: both blocks are live, distinct allocations and
            // `used_bytes` fits in each of them.
            unsafe {
                std::ptr::copy_nonoverlapping(self.data.as_ptr(), new_data.as_ptr(), used_bytes as usize);
                dealloc(self.data.as_ptr(), layout(self.capacity));
            }
        }

        self.data = new_data;
        self.capacity = new_capacity;
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        if self.capacity > 0 {
            // SAFETY: the block was allocated with the identical layout.
            unsafe { dealloc(self.data.as_ptr(), layout(self.capacity)) };
        }
    }
}

// SAFETY: the arena exclusively owns its allocation and stores plain bytes;
// moving it to another thread or reading it from several threads is fine.
// This is what allows per-thread recording followed by single-thread splicing.
unsafe impl Send for Arena {}
// SAFETY: shared access is read-only (`as_ptr`); all writes go through `&mut`.
unsafe impl Sync for Arena {}

fn layout(capacity: u32) -> Layout {
    // Alignment is a power of two; the size check only trips on targets
    // where `isize::MAX` is below the u32 arena limit.
    Layout::from_size_align(capacity as usize, ARENA_ALIGNMENT)
        .expect("arena capacity exceeds isize::MAX")
}
