//! SEARCH operations for CyclicSkipList.
//!
//! This module contains the descent shared by lookup, insertion and removal.
//! At every level the descent walks right until it reaches the node whose gap
//! owns the key, hands that node to a [`DescentStrategy`], and continues one
//! level down. Lookups use a read-only strategy; insertion and removal use
//! strategies that rebalance the gap before entering it.

use crate::error::{SkipListError, SkipListResult};
use crate::macros::infallible;
use crate::order::KeyOrder;
use crate::types::{CyclicSkipList, NodeId};

// ============================================================================
// DESCENT SKELETON
// ============================================================================

/// Per-level behaviour of a descent.
pub(crate) trait DescentStrategy<K, O> {
    /// The list being descended.
    fn list(&self) -> &CyclicSkipList<K, O>;

    /// Called with the index node owning `key` before the descent enters its gap.
    ///
    /// Returns a node of the same ring from which the owner of `key` is found
    /// again; strategies that restructure the ring return the node whose gap
    /// now holds the key, or one to its left.
    fn before_descent(&mut self, node: NodeId, key: &K) -> SkipListResult<NodeId>;
}

/// Descend from the head to the bottom node owning `key`.
///
/// Returns `None` for an empty list.
pub(crate) fn descend<K, O, S>(strategy: &mut S, key: &K) -> SkipListResult<Option<NodeId>>
where
    O: KeyOrder<K>,
    S: DescentStrategy<K, O>,
{
    let Some(mut current) = strategy.list().head else {
        return Ok(None);
    };

    loop {
        current = strategy.list().seek_gap(current, key)?;
        if strategy.list().arena.down_of(current)?.is_none() {
            return Ok(Some(current));
        }

        let resume = strategy.before_descent(current, key)?;
        let owner = strategy.list().seek_gap(resume, key)?;
        tracing::trace!(node = owner, "descending into gap");
        current = strategy.list().arena.down_of(owner)?.ok_or_else(|| {
            SkipListError::corrupted(
                "Descent",
                &format!("gap owner {} lost its lower level", owner),
            )
        })?;
    }
}

/// Read-only strategy reporting each gap owner to an observer.
struct Probe<'a, K, O, F> {
    list: &'a CyclicSkipList<K, O>,
    observer: F,
}

impl<'a, K, O, F> DescentStrategy<K, O> for Probe<'a, K, O, F>
where
    F: FnMut(NodeId),
{
    fn list(&self) -> &CyclicSkipList<K, O> {
        self.list
    }

    fn before_descent(&mut self, node: NodeId, _key: &K) -> SkipListResult<NodeId> {
        (self.observer)(node);
        Ok(node)
    }
}

impl<K, O: KeyOrder<K>> CyclicSkipList<K, O> {
    // ============================================================================
    // PUBLIC SEARCH OPERATIONS
    // ============================================================================

    /// Check whether `key` is present, reporting malformed graphs as errors.
    pub fn try_find(&self, key: &K) -> SkipListResult<bool> {
        self.try_find_with(key, |_| {})
    }

    /// Check whether `key` is present, calling `observer` with the index node
    /// owning the key at each level, top to bottom, before descending.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_skiplist::CyclicSkipList;
    ///
    /// let list = CyclicSkipList::create_from(0..64);
    /// let mut path = Vec::new();
    /// assert!(list.try_find_with(&40, |node| path.push(node)).unwrap());
    /// assert_eq!(path.len(), list.height());
    /// ```
    pub fn try_find_with<F>(&self, key: &K, observer: F) -> SkipListResult<bool>
    where
        F: FnMut(NodeId),
    {
        let mut probe = Probe {
            list: self,
            observer,
        };
        match descend(&mut probe, key)? {
            Some(node) => Ok(self.order.are_equal(self.arena.key_of(node)?, key)),
            None => Ok(false),
        }
    }

    /// Check whether `key` is present, reporting each gap owner to `observer`.
    ///
    /// # Panics
    ///
    /// Panics if the node graph is malformed.
    pub fn find_with<F>(&self, key: &K, observer: F) -> bool
    where
        F: FnMut(NodeId),
    {
        match self.try_find_with(key, observer) {
            Ok(found) => found,
            Err(err) => panic!("find_with failed: {}", err),
        }
    }

    /// Alias for `try_find`.
    pub fn try_contains(&self, key: &K) -> SkipListResult<bool> {
        self.try_find(key)
    }

    infallible! {
        /// Check whether `key` is present.
        ///
        /// # Panics
        ///
        /// Panics if the node graph is malformed.
        pub fn find(&self, key: &K) -> bool
    }

    infallible! {
        /// Check whether `key` is present.
        ///
        /// # Examples
        ///
        /// ```
        /// use cyclic_skiplist::CyclicSkipList;
        ///
        /// let list = CyclicSkipList::create_from([3, 1, 2]);
        /// assert!(list.contains(&2));
        /// assert!(!list.contains(&4));
        /// ```
        pub fn contains(&self, key: &K) -> bool
    }

    // ============================================================================
    // LEVEL SCAN
    // ============================================================================

    /// Walk right from `start` to the node whose gap owns `key`.
    ///
    /// A node alone in its ring owns every key. The scan is bounded by the
    /// number of live nodes.
    pub(crate) fn seek_gap(&self, start: NodeId, key: &K) -> SkipListResult<NodeId> {
        let mut current = start;
        for _ in 0..=self.arena.len() {
            let right = self.arena.right_of(current)?;
            if right == current
                || self.order.gap_contains(
                    self.arena.key_of(current)?,
                    key,
                    self.arena.key_of(right)?,
                )
            {
                return Ok(current);
            }
            current = right;
        }

        Err(SkipListError::corrupted(
            "Ring",
            &format!("no gap of the ring through node {} owns the key", start),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeArena;
    use crate::order::NaturalOrder;

    #[test]
    fn test_find_on_empty_list() {
        let list = CyclicSkipList::<i32>::new(2).unwrap();
        assert!(!list.find(&1));
        assert_eq!(list.try_find(&1), Ok(false));
    }

    #[test]
    fn test_find_in_single_node_list() {
        let list = CyclicSkipList::create_from([5]);
        assert!(list.find(&5));
        assert!(!list.find(&4));
        assert!(!list.find(&6));
    }

    #[test]
    fn test_find_every_key_of_bulk_list() {
        let keys: Vec<i32> = (0..200).map(|i| i * 3).collect();
        let list = CyclicSkipList::create_from(keys.clone());
        for key in &keys {
            assert!(list.contains(key), "missing {}", key);
            assert!(!list.contains(&(key + 1)));
        }
        assert!(!list.contains(&-1));
        assert!(!list.contains(&1000));
    }

    #[test]
    fn test_observer_sees_one_owner_per_index_level() {
        let list = CyclicSkipList::create_from(0..100);
        let mut owners = Vec::new();
        assert!(list.try_find_with(&57, |node| owners.push(node)).unwrap());

        assert_eq!(owners.len(), list.height());
        for (level, &node) in owners.iter().enumerate() {
            assert_eq!(list.arena.height(node).unwrap(), list.height() - level);
            assert!(list.arena.down_of(node).unwrap().is_some());
        }
    }

    #[test]
    fn test_seek_gap_wraps_around_ring() {
        let list = CyclicSkipList::create_from([10, 20, 30]);
        let bottom = list.arena.bottom(list.head.unwrap()).unwrap();
        let last = list.arena.left_of(bottom).unwrap();

        // Keys above the largest and below the smallest belong to the last gap
        assert_eq!(list.seek_gap(bottom, &35).unwrap(), last);
        assert_eq!(list.seek_gap(bottom, &5).unwrap(), last);
        assert_eq!(list.seek_gap(bottom, &10).unwrap(), bottom);
    }

    #[test]
    fn test_find_reports_dangling_lower_level() {
        let mut arena = NodeArena::new();
        let bottom = arena.allocate_node(1);
        let apex = arena.allocate_node(1);
        arena.connect_down_to(Some(apex), Some(bottom)).unwrap();
        let mut list = CyclicSkipList::from_parts(arena, Some(apex), 2, NaturalOrder).unwrap();
        list.arena.deallocate(bottom);

        let result = list.try_find(&1);
        assert!(matches!(result, Err(SkipListError::DanglingNode(_))), "{:?}", result);
    }

    #[test]
    #[should_panic(expected = "find failed")]
    fn test_find_panics_on_corrupted_ring() {
        let mut arena = NodeArena::new();
        let a = arena.allocate_node(1);
        let b = arena.allocate_node(2);
        arena.connect_to(a, b).unwrap();
        arena.connect_to(b, a).unwrap();
        let mut list = CyclicSkipList::from_parts(arena, Some(a), 2, NaturalOrder).unwrap();
        // Point a's right link at a freed slot
        let stray = list.arena.allocate_node(3);
        list.arena.connect_to(a, stray).unwrap();
        list.arena.deallocate(stray);

        list.find(&2);
    }
}
