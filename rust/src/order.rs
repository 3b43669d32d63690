//! Key orders for CyclicSkipList.
//!
//! A list is driven by a linear comparator that is turned into the cyclic
//! predicates the rings need. Keys sit on a circle: walking upwards from any
//! key eventually passes the largest key and continues from the smallest.

use std::cmp::Ordering;
use std::fmt;

/// Linear order over keys together with the cyclic predicates derived from it.
///
/// Only [`compare`](KeyOrder::compare) is required. The cyclic predicates have
/// default implementations in terms of it and may be overridden by orders that
/// are cyclic by nature.
pub trait KeyOrder<K: ?Sized> {
    /// Linear comparison, used to sort keys and to locate the wrap point of a ring.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Key equality as seen by the list.
    fn are_equal(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// True if `b` lies strictly between `a` and `c` going upwards around the circle.
    fn cyclically_between(&self, a: &K, b: &K, c: &K) -> bool {
        let less = |x: &K, y: &K| self.compare(x, y) == Ordering::Less;
        (less(a, b) && less(b, c)) || (less(b, c) && less(c, a)) || (less(c, a) && less(a, b))
    }

    /// Inclusive cyclic order: starting at `a` and moving upwards, `b` is reached
    /// no later than `c`.
    ///
    /// `a == c` holds for rings of one or two nodes, where a node's left and
    /// right neighbours coincide, and is treated as the whole circle.
    fn in_order(&self, a: &K, b: &K, c: &K) -> bool {
        self.are_equal(a, b)
            || self.are_equal(b, c)
            || self.are_equal(a, c)
            || self.cyclically_between(a, b, c)
    }

    /// Half-open cyclic interval test: `key` lies in `[start, end)`.
    ///
    /// A gap contains its own boundary key but not the boundary key of the
    /// next gap. When `start == end` the interval is the whole circle.
    fn gap_contains(&self, start: &K, key: &K, end: &K) -> bool {
        self.are_equal(start, key)
            || self.are_equal(start, end)
            || self.cyclically_between(start, key, end)
    }
}

/// Order of a key type's `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> KeyOrder<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Order given by a comparison closure.
///
/// ```
/// use cyclic_skiplist::{CyclicSkipList, FnOrder};
///
/// // Case-insensitive keys
/// let order = FnOrder::new(|a: &String, b: &String| a.to_lowercase().cmp(&b.to_lowercase()));
/// let mut list = CyclicSkipList::with_order(2, order).unwrap();
/// list.insert("Beta".to_string());
/// assert!(list.contains(&"BETA".to_string()));
/// ```
#[derive(Clone, Copy)]
pub struct FnOrder<F> {
    compare: F,
}

impl<F> FnOrder<F> {
    pub fn new(compare: F) -> Self {
        Self { compare }
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOrder").finish_non_exhaustive()
    }
}

impl<K: ?Sized, F> KeyOrder<K> for FnOrder<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_for_increasing_triples() {
        let order = NaturalOrder;
        assert!(order.in_order(&1, &2, &3));
        assert!(!order.in_order(&1, &3, &2));
    }

    #[test]
    fn test_in_order_is_invariant_under_rotation() {
        let order = NaturalOrder;
        assert!(order.in_order(&2, &3, &1));
        assert!(order.in_order(&3, &1, &2));
        assert!(!order.in_order(&3, &2, &1));
        assert!(!order.in_order(&2, &1, &3));
    }

    #[test]
    fn test_in_order_boundaries_are_inclusive() {
        let order = NaturalOrder;
        assert!(order.in_order(&5, &5, &9));
        assert!(order.in_order(&5, &9, &9));
        assert!(order.in_order(&5, &7, &5));
        assert!(order.in_order(&4, &4, &4));
    }

    #[test]
    fn test_gap_contains_is_half_open() {
        let order = NaturalOrder;
        assert!(order.gap_contains(&10, &10, &20));
        assert!(order.gap_contains(&10, &15, &20));
        assert!(!order.gap_contains(&10, &20, &20));
        assert!(!order.gap_contains(&10, &25, &20));
    }

    #[test]
    fn test_gap_contains_wraps_past_maximum() {
        let order = NaturalOrder;
        // Gap starting at the largest key owns everything above it and below the smallest
        assert!(order.gap_contains(&90, &95, &10));
        assert!(order.gap_contains(&90, &5, &10));
        assert!(!order.gap_contains(&90, &10, &10));
        assert!(!order.gap_contains(&90, &50, &10));
    }

    #[test]
    fn test_gap_contains_whole_circle_for_single_boundary() {
        let order = NaturalOrder;
        assert!(order.gap_contains(&7, &1, &7));
        assert!(order.gap_contains(&7, &100, &7));
    }

    #[test]
    fn test_fn_order_reverses_direction() {
        let order = FnOrder::new(|a: &i32, b: &i32| b.cmp(a));
        assert!(order.in_order(&3, &2, &1));
        assert!(!order.in_order(&1, &2, &3));
        assert!(order.are_equal(&4, &4));
    }
}
