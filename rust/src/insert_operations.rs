//! INSERT operations for CyclicSkipList.
//!
//! This module contains key insertion, gap splitting on the way down, and
//! growth of the list by one apex level at a time.

use crate::error::{ModifyResult, SkipListError, SkipListResult};
use crate::macros::infallible;
use crate::order::KeyOrder;
use crate::search_operations::{descend, DescentStrategy};
use crate::types::{CyclicSkipList, NodeId};

/// Descent strategy splitting every full gap it is about to enter.
struct SplitFullGaps<'a, K, O> {
    list: &'a mut CyclicSkipList<K, O>,
}

impl<'a, K: Clone, O: KeyOrder<K>> DescentStrategy<K, O> for SplitFullGaps<'a, K, O> {
    fn list(&self) -> &CyclicSkipList<K, O> {
        self.list
    }

    fn before_descent(&mut self, node: NodeId, _key: &K) -> SkipListResult<NodeId> {
        if self.list.arena.size_of_gap(node)? >= self.list.max_gap {
            self.list.split_gap(node)?;
        }
        Ok(node)
    }
}

impl<K: Clone, O: KeyOrder<K>> CyclicSkipList<K, O> {
    /// Insert `key`, returning `false` if an equal key is already present.
    ///
    /// Full gaps met during the descent are split, so the bottom splice never
    /// overflows a gap.
    pub fn try_insert(&mut self, key: K) -> ModifyResult<bool> {
        let Some(head) = self.head else {
            let node = self.arena.allocate_node(key);
            self.head = Some(node);
            self.len = 1;
            return Ok(true);
        };

        if self.arena.ring_len(head)? >= self.max_gap {
            self.grow_apex()?;
        }

        let owner = descend(&mut SplitFullGaps { list: self }, &key)?
            .ok_or_else(|| SkipListError::corrupted("Insert", "descent found no bottom node"))?;

        let inserted = if self.order.are_equal(self.arena.key_of(owner)?, &key) {
            false
        } else {
            let right = self.arena.right_of(owner)?;
            let node = self.arena.allocate_node(key);
            self.arena.connect_to(node, right)?;
            self.arena.connect_to(owner, node)?;
            self.len += 1;
            true
        };

        // Splits may have lengthened the head ring even when nothing was inserted
        if let Some(head) = self.head {
            if self.needs_apex(self.arena.ring_len(head)?) {
                self.grow_apex()?;
            }
        }

        Ok(inserted)
    }

    infallible! {
        /// Insert `key`, returning `false` if an equal key is already present.
        ///
        /// # Panics
        ///
        /// Panics if the node graph is malformed.
        ///
        /// # Examples
        ///
        /// ```
        /// use cyclic_skiplist::CyclicSkipList;
        ///
        /// let mut list = CyclicSkipList::new(2).unwrap();
        /// assert!(list.insert(7));
        /// assert!(!list.insert(7));
        /// assert_eq!(list.len(), 1);
        /// ```
        pub fn insert(&mut self, key: K) -> bool
    }

    // ============================================================================
    // STRUCTURAL HELPERS
    // ============================================================================

    /// Split the gap of `node` at its midpoint.
    ///
    /// A new index node over the midpoint is spliced in right of `node`.
    fn split_gap(&mut self, node: NodeId) -> SkipListResult<()> {
        let gap = self.arena.size_of_gap(node)?;
        let start = self
            .arena
            .down_of(node)?
            .ok_or_else(|| SkipListError::corrupted("Split", "gap owner has no lower level"))?;
        let midpoint = self.arena.right_by(start, gap / 2)?;

        let key = self.arena.key_of(midpoint)?.clone();
        let sibling = self.arena.allocate_node(key);
        self.arena.connect_down_to(Some(sibling), Some(midpoint))?;

        let right = self.arena.right_of(node)?;
        self.arena.connect_to(sibling, right)?;
        self.arena.connect_to(node, sibling)?;

        tracing::debug!(node, sibling, gap, "split gap");
        Ok(())
    }

    /// Place a single self-looped node above the head ring and make it the head.
    pub(crate) fn grow_apex(&mut self) -> SkipListResult<NodeId> {
        let head = self
            .head
            .ok_or_else(|| SkipListError::corrupted("Apex", "cannot grow an empty list"))?;
        let key = self.arena.key_of(head)?.clone();
        let apex = self.arena.allocate_node(key);
        self.arena.connect_down_to(Some(apex), Some(head))?;
        self.head = Some(apex);

        tracing::debug!(apex, height = self.height(), "grew apex level");
        Ok(apex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeArena;
    use crate::order::NaturalOrder;

    #[test]
    fn test_insert_into_empty_list() {
        let mut list = CyclicSkipList::new(2).unwrap();
        assert!(list.insert(5));
        let head = list.head.unwrap();
        assert_eq!(list.arena.right_of(head).unwrap(), head);
        assert_eq!(list.arena.left_of(head).unwrap(), head);
        assert_eq!(list.len(), 1);
        assert_eq!(list.height(), 0);
    }

    #[test]
    fn test_second_insert_grows_apex() {
        let mut list = CyclicSkipList::new(2).unwrap();
        list.insert(5);
        list.insert(3);
        assert_eq!(list.level_lengths(), vec![1, 2]);
        assert!(list.check_invariants());
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut list = CyclicSkipList::create_from(0..10);
        assert!(!list.insert(4));
        assert_eq!(list.len(), 10);
        assert!(list.check_invariants());
    }

    #[test]
    fn test_insert_splits_full_gap() {
        // Bottom 9 under gaps [4, 2, 3]
        let mut list = CyclicSkipList::create_from(1..=9);
        assert_eq!(list.level_lengths(), vec![1, 3, 9]);

        list.insert(0);
        // 0 falls into the wrapping gap starting at 7, which had 3 nodes
        assert_eq!(list.level_lengths(), vec![1, 3, 10]);

        list.insert(3);
        assert!(!list.contains(&11));
        list.insert(11);
        assert_eq!(list.len(), 11);
        assert!(list.check_invariants());
    }

    #[test]
    fn test_duplicate_insert_still_splits_full_gap() {
        let mut list = CyclicSkipList::create_from(1..=9);
        let first = list.arena.down_of(list.head.unwrap()).unwrap().unwrap();
        assert_eq!(list.arena.size_of_gap(first).unwrap(), 4);

        assert!(!list.insert(2));
        // The gap [1, 5) was full, so the index level gained a node
        assert_eq!(list.level_lengths(), vec![1, 4, 9]);
        assert!(list.check_invariants());

        assert_eq!(list.try_insert(25), Ok(true));
        assert_eq!(list.len(), 10);
        assert!(list.check_invariants());
    }

    #[test]
    fn test_insert_grows_apex_over_full_flat_ring() {
        let mut arena = NodeArena::new();
        let ring: Vec<NodeId> = [10, 20, 30, 40].iter().map(|&k| arena.allocate_node(k)).collect();
        for i in 0..ring.len() {
            arena.connect_to(ring[i], ring[(i + 1) % ring.len()]).unwrap();
        }
        let mut list = CyclicSkipList::from_parts(arena, Some(ring[0]), 2, NaturalOrder).unwrap();
        assert_eq!(list.level_lengths(), vec![4]);

        // The head ring already holds max_gap nodes
        assert!(list.insert(25));
        assert_eq!(list.level_lengths(), vec![1, 2, 5]);
        assert_eq!(list.levels()[1], vec![10, 30]);
        assert_eq!(list.validate(), Ok(()));
        assert!(list.iter().copied().eq([10, 20, 25, 30, 40]));
    }

    #[test]
    fn test_ascending_inserts_keep_invariants() {
        for min_gap in 1..=4 {
            let mut list = CyclicSkipList::new(min_gap).unwrap();
            for key in 0..300 {
                assert!(list.insert(key));
                assert!(
                    list.check_invariants(),
                    "min_gap {} after {}: {:?}",
                    min_gap,
                    key,
                    list.check_invariants_detailed()
                );
            }
            assert_eq!(list.len(), 300);
        }
    }

    #[test]
    fn test_descending_inserts_keep_invariants() {
        let mut list = CyclicSkipList::new(2).unwrap();
        for key in (0..300).rev() {
            list.insert(key);
        }
        assert!(list.check_invariants());
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), (0..300).collect::<Vec<_>>());
    }
}
