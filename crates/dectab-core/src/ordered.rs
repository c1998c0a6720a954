//! Operations on vectors kept sorted under a caller-supplied comparator.
//!
//! Every registry and frontier set in the compiler is an always-sorted
//! `Vec` whose element ordering depends on context (symbols resolve
//! through an interner), so the comparator is passed per call rather
//! than carried by an `Ord` impl.

use std::cmp::Ordering;

/// Insert `item` at its sorted position unless an equal element is
/// already present. Returns `true` when the item was inserted.
pub fn insert_sorted<T>(
    vec: &mut Vec<T>,
    item: T,
    mut cmp: impl FnMut(&T, &T) -> Ordering,
) -> bool {
    match vec.binary_search_by(|e| cmp(e, &item)) {
        Ok(_) => false,
        Err(pos) => {
            vec.insert(pos, item);
            true
        }
    }
}

/// Binary-search membership test on a sorted slice.
pub fn contains_sorted<T>(slice: &[T], item: &T, mut cmp: impl FnMut(&T, &T) -> Ordering) -> bool {
    slice.binary_search_by(|e| cmp(e, item)).is_ok()
}

/// Lexicographic comparison of two sorted sequences, element count as
/// the final tiebreak.
pub fn seq_cmp<T>(a: &[T], b: &[T], mut cmp: impl FnMut(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let c = cmp(x, y);
        if c != Ordering::Equal {
            return c;
        }
    }
    a.len().cmp(&b.len())
}
