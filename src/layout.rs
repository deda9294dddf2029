//! Byte-offset arithmetic shared by the inline buffer and the heap path.
//!
//! A region is laid out as three contiguous sub-regions in a single
//! allocation: metadata bits, then keys, then values, each padded up to
//! the next sub-region's alignment requirement. The same arithmetic is
//! used whether the bytes come from the embedded inline buffer or from
//! the global allocator, so residency never changes the addressing.

use std::alloc::Layout as AllocLayout;
use std::mem;

/// Computed offsets (in bytes, from the start of the region) of each
/// sub-region for a given capacity, key/value type, and bits-per-slot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Regions {
    pub meta_bytes: usize,
    pub keys_offset: usize,
    pub values_offset: usize,
    pub total_bytes: usize,
    pub align: usize,
}

#[inline]
fn round_up(n: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (n + align - 1) & !(align - 1)
}

/// Round `n` up to the next power of two, with `0` and `1` both mapping
/// to `1` (a zero-slot table has no meaningful capacity and the fallible
/// constructor rejects it before this is ever called with zero).
pub(crate) fn round_up_pow2(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

/// Number of `usize` words needed to hold `capacity` slots of `bits` each.
pub(crate) fn meta_words(capacity: usize, bits: u32) -> usize {
    let word_bits = usize::BITS as usize;
    let total_bits = capacity * bits as usize;
    (total_bits + word_bits - 1) / word_bits
}

pub(crate) fn compute<K, V>(capacity: usize, bits: u32) -> Regions {
    let meta_bytes = meta_words(capacity, bits) * mem::size_of::<usize>();

    let key_align = mem::align_of::<K>();
    let value_align = mem::align_of::<V>();

    let keys_offset = round_up(meta_bytes, key_align.max(1));
    let keys_bytes = mem::size_of::<K>() * capacity;

    let values_offset = round_up(keys_offset + keys_bytes, value_align.max(1));
    let values_bytes = mem::size_of::<V>() * capacity;

    let total_bytes = values_offset + values_bytes;
    let align = mem::align_of::<usize>().max(key_align).max(value_align);

    Regions {
        meta_bytes,
        keys_offset,
        values_offset,
        total_bytes,
        align,
    }
}

impl Regions {
    /// The `std::alloc::Layout` this region needs from the global allocator.
    /// `total_bytes` is rounded up to a multiple of `align` first, since
    /// `Layout::from_size_align` requires it.
    pub(crate) fn alloc_layout(&self) -> AllocLayout {
        let size = round_up(self.total_bytes.max(1), self.align);
        AllocLayout::from_size_align(size, self.align)
            .expect("region layout is always valid: size and align are computed, not user input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_pow2_table() {
        assert_eq!(round_up_pow2(0), 1);
        assert_eq!(round_up_pow2(1), 1);
        assert_eq!(round_up_pow2(2), 2);
        assert_eq!(round_up_pow2(3), 4);
        assert_eq!(round_up_pow2(32), 32);
        assert_eq!(round_up_pow2(33), 64);
        assert_eq!(round_up_pow2(1023), 1024);
        assert_eq!(round_up_pow2(1024), 1024);
    }

    #[test]
    fn meta_words_packing() {
        // 1 bit/slot: 64 slots fit in one usize word on 64-bit targets.
        assert_eq!(meta_words(64, 1), 1.max(64 / usize::BITS as usize));
        // 2 bits/slot needs twice the words of 1 bit/slot for the same capacity.
        assert_eq!(meta_words(64, 2), meta_words(64, 1) * 2);
    }

    #[test]
    fn regions_are_aligned_and_non_overlapping() {
        let r = compute::<u64, [u8; 3]>(32, 2);
        assert_eq!(r.keys_offset % mem::align_of::<u64>(), 0);
        assert_eq!(r.values_offset % mem::align_of::<[u8; 3]>(), 0);
        assert!(r.keys_offset >= r.meta_bytes);
        assert!(r.values_offset >= r.keys_offset + mem::size_of::<u64>() * 32);
        assert!(r.total_bytes >= r.values_offset + mem::size_of::<[u8; 3]>() * 32);
    }
}
