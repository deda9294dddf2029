//! Bit-scan-accelerated iteration over occupied slots.
//!
//! [`BitScan`] walks the metadata bitmap one word at a time, using
//! [`usize::trailing_zeros`] to jump straight to the next occupied slot
//! within a word rather than testing one slot at a time. The same scan
//! drives both the public iterators and the internal traversal used
//! when a table migrates to a new capacity.

use std::marker::PhantomData;

use crate::strategy::DeletionStrategy;
use crate::table::RawTable;

pub(crate) struct BitScan {
    meta: *const usize,
    word_idx: usize,
    word_count: usize,
    bits: u32,
    stride_mask: usize,
    current: usize,
}

impl BitScan {
    /// # Safety
    /// `meta` must point to at least `meta_words(capacity, bits)` valid
    /// `usize` words for the lifetime this scan is used.
    pub(crate) unsafe fn new(meta: *const usize, capacity: usize, bits: u32, stride_mask: usize) -> Self {
        let word_count = crate::layout::meta_words(capacity, bits);
        let current = if word_count > 0 { *meta & stride_mask } else { 0 };
        BitScan {
            meta,
            word_idx: 0,
            word_count,
            bits,
            stride_mask,
            current,
        }
    }
}

impl Iterator for BitScan {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit_pos = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                let slots_per_word = usize::BITS as usize / self.bits as usize;
                let slot = self.word_idx * slots_per_word + bit_pos / self.bits as usize;
                return Some(slot);
            }
            self.word_idx += 1;
            if self.word_idx >= self.word_count {
                return None;
            }
            // SAFETY: `word_idx < word_count`, guaranteed by the caller of `new`.
            self.current = unsafe { *self.meta.add(self.word_idx) } & self.stride_mask;
        }
    }
}

/// Forward iterator over `(&K, &V)` pairs. Iteration order is
/// implementation-defined and may change across insertions; the
/// iterator borrows the table and is invalidated by any mutation that
/// can grow or rehash it.
pub struct Iter<'a, K, V, D: DeletionStrategy> {
    pub(crate) scan: BitScan,
    pub(crate) raw: &'a RawTable<K, V, D>,
}

impl<'a, K, V, D: DeletionStrategy> Iterator for Iter<'a, K, V, D> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.scan.next()?;
        // SAFETY: `slot` came from `BitScan` over this table's own
        // metadata, so it names a live, constructed entry.
        unsafe { Some((&*self.raw.key_ptr(slot), &*self.raw.value_ptr(slot))) }
    }
}

/// Forward iterator over `(&K, &mut V)` pairs.
pub struct IterMut<'a, K, V, D: DeletionStrategy> {
    pub(crate) scan: BitScan,
    pub(crate) raw: *mut RawTable<K, V, D>,
    pub(crate) _marker: PhantomData<&'a mut RawTable<K, V, D>>,
}

impl<'a, K, V, D: DeletionStrategy> Iterator for IterMut<'a, K, V, D> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.scan.next()?;
        // SAFETY: `self.raw` is a live exclusive borrow of the table for
        // `'a`; `slot` names a live, constructed entry within it, and
        // each slot is yielded at most once by `BitScan`.
        unsafe {
            let raw = &mut *self.raw;
            Some((&*raw.key_ptr(slot), &mut *raw.value_mut_ptr(slot)))
        }
    }
}
