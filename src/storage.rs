//! Inline-vs-heap residency for a table's metadata/key/value regions.
//!
//! Small tables live entirely inside the `Table` value itself, avoiding a
//! heap allocation; larger ones migrate to a single heap allocation that
//! holds all three regions back to back. Neither variant caches a
//! pointer into the embedded buffer as a struct field — that would make
//! `Table` self-referential and unsound to move. Every access instead
//! recomputes the region's address from the current `&self`/`&mut self`
//! and the (pure, cheap) layout arithmetic in [`crate::layout`], the way
//! inline-capacity containers in the wider ecosystem handle the same
//! hazard.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Budget, in bytes, for the buffer embedded directly in every `Table`
/// value. A table's layout only uses the inline buffer while its total
/// region size fits this budget; anything larger is heap-allocated from
/// the start, and a table never moves back to inline storage once it
/// has migrated to heap.
pub(crate) const INLINE_BYTES: usize = 4096;

/// Largest K/V alignment the inline buffer can host. Anything stricter
/// falls back to a heap allocation even at the smallest capacity.
pub(crate) const INLINE_ALIGN: usize = 16;

#[repr(align(16))]
pub(crate) struct InlineBuffer(pub [u8; INLINE_BYTES]);

pub(crate) enum Storage {
    Inline,
    Heap { ptr: NonNull<u8>, layout: Layout },
}

impl Storage {
    /// Allocate zeroed heap storage per `layout`. Aborts the process on
    /// allocation failure, matching the global allocator's own contract.
    /// Zeroing covers the metadata region's EMPTY-is-all-zero encoding
    /// without a separate pass over just that sub-range.
    pub(crate) fn alloc_heap(layout: Layout) -> Storage {
        // SAFETY: `layout` always has a non-zero size (region computation
        // pads to at least one word) and a valid power-of-two alignment.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = match NonNull::new(raw) {
            Some(p) => p,
            None => alloc::handle_alloc_error(layout),
        };
        Storage::Heap { ptr, layout }
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if let Storage::Heap { ptr, layout } = self {
            // SAFETY: `ptr`/`layout` are exactly what `alloc_heap` produced
            // and this storage owns them exclusively.
            unsafe { alloc::dealloc(ptr.as_ptr(), *layout) };
        }
    }
}
