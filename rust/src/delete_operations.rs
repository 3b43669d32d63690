//! DELETE operations for CyclicSkipList.
//!
//! This module contains key removal, gap repair on the way down (borrowing
//! from a neighbouring gap or merging with it), column relocation at the
//! bottom, and shrinking of redundant apex levels.

use crate::error::{ModifyResult, SkipListError, SkipListResult};
use crate::macros::infallible;
use crate::order::KeyOrder;
use crate::search_operations::{descend, DescentStrategy};
use crate::types::{CyclicSkipList, NodeId};

/// Descent strategy topping up every minimal gap it is about to enter.
struct RepairSparseGaps<'a, K, O> {
    list: &'a mut CyclicSkipList<K, O>,
}

impl<'a, K: Clone, O: KeyOrder<K>> DescentStrategy<K, O> for RepairSparseGaps<'a, K, O> {
    fn list(&self) -> &CyclicSkipList<K, O> {
        self.list
    }

    fn before_descent(&mut self, node: NodeId, _key: &K) -> SkipListResult<NodeId> {
        self.list.repair_gap(node)
    }
}

impl<K: Clone, O: KeyOrder<K>> CyclicSkipList<K, O> {
    /// Remove `key`, returning `false` if it was not present.
    pub fn try_remove(&mut self, key: &K) -> ModifyResult<bool> {
        if self.head.is_none() {
            return Ok(false);
        }

        let owner = descend(&mut RepairSparseGaps { list: self }, key)?
            .ok_or_else(|| SkipListError::corrupted("Remove", "descent found no bottom node"))?;

        let found = self.order.are_equal(self.arena.key_of(owner)?, key);
        if found {
            self.remove_leaf(owner)?;
        }

        self.drop_redundant_apexes()?;
        Ok(found)
    }

    infallible! {
        /// Remove `key`, returning `false` if it was not present.
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
        /// let mut list = CyclicSkipList::create_from(0..20);
        /// assert!(list.remove(&7));
        /// assert!(!list.remove(&7));
        /// assert!(!list.contains(&7));
        /// assert_eq!(list.len(), 19);
        /// ```
        pub fn remove(&mut self, key: &K) -> bool
    }

    // ============================================================================
    // GAP REPAIR
    // ============================================================================

    /// Make sure the gap of `node` can lose one node without dropping below
    /// `min_gap`. Returns the node now owning the repaired gap.
    fn repair_gap(&mut self, node: NodeId) -> SkipListResult<NodeId> {
        let right = self.arena.right_of(node)?;
        if right == node || self.arena.size_of_gap(node)? > self.min_gap {
            return Ok(node);
        }

        if self.arena.size_of_gap(right)? > self.min_gap {
            self.borrow_from_right(right)?;
            return Ok(node);
        }

        if self.arena.up_of(right)?.is_none() {
            self.merge_into_left(right)?;
            return Ok(node);
        }

        // The right neighbour starts the next gap of the level above, so the
        // repair has to happen against the left neighbour.
        if self.arena.up_of(node)?.is_some() {
            return Err(SkipListError::corrupted(
                "Gap",
                &format!("adjacent nodes {} and {} both carry columns", node, right),
            ));
        }

        let left = self.arena.left_of(node)?;
        if self.arena.size_of_gap(left)? > self.min_gap {
            self.borrow_from_left(node)?;
            Ok(node)
        } else {
            self.merge_into_left(node)?;
            Ok(left)
        }
    }

    /// Hand the first lower node of `donor`'s gap to the gap on its left.
    fn borrow_from_right(&mut self, donor: NodeId) -> SkipListResult<()> {
        let start = self.lower_of(donor)?;
        let new_start = self.arena.right_of(start)?;
        self.arena.connect_down_to(None, Some(start))?;
        self.arena.connect_down_to(Some(donor), Some(new_start))?;
        self.refresh_column(donor)?;

        tracing::debug!(donor, "borrowed from right gap");
        Ok(())
    }

    /// Extend the gap of `node` leftwards by the last lower node of its left neighbour.
    fn borrow_from_left(&mut self, node: NodeId) -> SkipListResult<()> {
        let start = self.lower_of(node)?;
        let new_start = self.arena.left_of(start)?;
        self.arena.connect_down_to(None, Some(start))?;
        self.arena.connect_down_to(Some(node), Some(new_start))?;
        self.refresh_column(node)?;

        tracing::debug!(node, "borrowed from left gap");
        Ok(())
    }

    /// Unlink the index node `absorbed`, joining its gap to the gap on its left.
    fn merge_into_left(&mut self, absorbed: NodeId) -> SkipListResult<()> {
        let lower = self.lower_of(absorbed)?;
        self.arena.connect_down_to(None, Some(lower))?;
        self.unlink(absorbed)?;

        tracing::debug!(absorbed, "merged gap into left neighbour");
        Ok(())
    }

    fn lower_of(&self, node: NodeId) -> SkipListResult<NodeId> {
        self.arena.down_of(node)?.ok_or_else(|| {
            SkipListError::corrupted("Gap", &format!("node {} has no lower level", node))
        })
    }

    // ============================================================================
    // BOTTOM AND APEX
    // ============================================================================

    /// Remove the bottom node `leaf`, moving its column onto its successor.
    fn remove_leaf(&mut self, leaf: NodeId) -> SkipListResult<()> {
        let right = self.arena.right_of(leaf)?;
        if right == leaf {
            self.clear();
            return Ok(());
        }

        if let Some(column) = self.arena.up_of(leaf)? {
            if self.arena.up_of(right)?.is_some() {
                return Err(SkipListError::corrupted(
                    "Column",
                    &format!("successor {} of removed node {} already carries a column", right, leaf),
                ));
            }
            self.arena.connect_down_to(Some(column), Some(right))?;
            self.refresh_column(column)?;
        }

        self.unlink(leaf)?;
        self.len -= 1;
        Ok(())
    }

    /// Drop apex nodes whose lower ring is too short to need one.
    fn drop_redundant_apexes(&mut self) -> SkipListResult<()> {
        while let Some(head) = self.head {
            let Some(lower) = self.arena.down_of(head)? else {
                break;
            };
            if self.arena.right_of(head)? != head || self.needs_apex(self.arena.ring_len(lower)?) {
                break;
            }

            self.arena.connect_down_to(None, Some(lower))?;
            self.arena.deallocate(head);
            self.head = Some(lower);
            tracing::debug!(apex = head, height = self.height(), "dropped apex level");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeArena;
    use crate::order::NaturalOrder;
    use crate::types::Node;

    /// Thread `keys` into a ring, placing each node above the node of `below`
    /// with the same key.
    fn ring(
        arena: &mut NodeArena<Node<i32>>,
        keys: &[i32],
        below: &[(i32, NodeId)],
    ) -> Vec<(i32, NodeId)> {
        let ids: Vec<(i32, NodeId)> = keys.iter().map(|&k| (k, arena.allocate_node(k))).collect();
        for i in 0..ids.len() {
            arena.connect_to(ids[i].1, ids[(i + 1) % ids.len()].1).unwrap();
        }
        for &(key, id) in &ids {
            if let Some(&(_, lower)) = below.iter().find(|(k, _)| *k == key) {
                arena.connect_down_to(Some(id), Some(lower)).unwrap();
            }
        }
        ids
    }

    /// Bottom ring under the `index` level, a second index level over the
    /// first and fourth index keys, and an apex.
    fn three_index_levels(bottom: &[i32], index: &[i32]) -> CyclicSkipList<i32> {
        let mut arena = NodeArena::new();
        let level0 = ring(&mut arena, bottom, &[]);
        let level1 = ring(&mut arena, index, &level0);
        let level2 = ring(&mut arena, &[1, index[3]], &level1);
        let apex = ring(&mut arena, &[1], &level2);
        CyclicSkipList::from_parts(arena, Some(apex[0].1), 2, NaturalOrder).unwrap()
    }

    #[test]
    fn test_remove_from_empty_list() {
        let mut list = CyclicSkipList::<i32>::new(2).unwrap();
        assert!(!list.remove(&1));
        assert_eq!(list.try_remove(&1), Ok(false));
    }

    #[test]
    fn test_remove_last_key_empties_list() {
        let mut list = CyclicSkipList::create_from([5]);
        assert!(list.remove(&5));
        assert!(list.head.is_none());
        assert!(list.is_empty());
        assert!(list.arena.is_empty());
    }

    #[test]
    fn test_remove_missing_key() {
        let mut list = CyclicSkipList::create_from(0..10);
        assert!(!list.remove(&42));
        assert_eq!(list.len(), 10);
        assert!(list.check_invariants());
    }

    #[test]
    fn test_remove_column_node_moves_column() {
        // Index keys 1, 5, 7 over 1..=9; 5 carries a column
        let mut list = CyclicSkipList::create_from(1..=9);
        assert!(list.remove(&5));
        assert!(!list.contains(&5));
        assert!(list.check_invariants(), "{:?}", list.check_invariants_detailed());

        let index_keys: Vec<i32> = list.levels()[1].clone();
        assert!(!index_keys.contains(&5));
    }

    #[test]
    fn test_remove_merges_minimal_gaps() {
        // Index gaps [2, 3] under the apex
        let mut list = CyclicSkipList::new(2).unwrap();
        for key in [1, 2, 3, 4, 5] {
            list.insert(key);
        }
        assert!(list.check_invariants());
        let before = list.level_lengths();

        assert!(list.remove(&1));
        assert!(list.remove(&2));
        assert!(list.check_invariants(), "{:?}", list.check_invariants_detailed());
        assert!(list.level_lengths().len() <= before.len());
    }

    #[test]
    fn test_minimal_gap_borrows_from_left_before_column_boundary() {
        // Gap of 6 is minimal and its right neighbour 8 carries a column,
        // the left gap of 3 has a node to spare
        let mut list = three_index_levels(&(1..=13).collect::<Vec<_>>(), &[1, 3, 6, 8, 10, 12]);
        assert_eq!(list.validate(), Ok(()));
        assert_eq!(list.level_lengths(), vec![1, 2, 6, 13]);

        assert!(list.remove(&7));
        assert_eq!(list.levels()[2], vec![1, 3, 5, 8, 10, 12]);
        assert_eq!(list.level_lengths(), vec![1, 2, 6, 12]);
        assert_eq!(list.validate(), Ok(()));
        assert!(!list.contains(&7));
        assert!(list.contains(&5));
    }

    #[test]
    fn test_minimal_gap_merges_into_left_before_column_boundary() {
        // Every gap of the index level is minimal, so 5 is absorbed by 3
        let mut list = three_index_levels(&(1..=12).collect::<Vec<_>>(), &[1, 3, 5, 7, 9, 11]);
        assert_eq!(list.validate(), Ok(()));

        assert!(list.remove(&6));
        assert_eq!(list.levels()[2], vec![1, 3, 7, 9, 11]);
        assert_eq!(list.level_lengths(), vec![1, 2, 5, 11]);
        assert_eq!(list.validate(), Ok(()));
        assert!(list.iter().copied().eq((1..=12).filter(|&k| k != 6)));
    }

    #[test]
    fn test_removing_everything_shrinks_to_empty() {
        let mut list = CyclicSkipList::create_from(0..200);
        for key in 0..200 {
            assert!(list.remove(&key));
            assert!(
                list.check_invariants(),
                "after {}: {:?}",
                key,
                list.check_invariants_detailed()
            );
        }
        assert!(list.is_empty());
        assert!(list.head.is_none());
    }

    #[test]
    fn test_removing_from_the_top_end() {
        for min_gap in 1..=4 {
            let mut list = CyclicSkipList::create_from_with(min_gap, crate::NaturalOrder, 0..150)
                .unwrap();
            for key in (0..150).rev() {
                assert!(list.remove(&key));
                assert!(list.check_invariants(), "min_gap {} after {}", min_gap, key);
            }
            assert!(list.is_empty());
        }
    }

    #[test]
    fn test_height_shrinks_as_list_empties() {
        let mut list = CyclicSkipList::create_from(0..100);
        let tall = list.height();
        for key in 0..98 {
            list.remove(&key);
        }
        assert!(list.height() < tall);
        assert_eq!(list.len(), 2);
        assert_eq!(list.level_lengths(), vec![1, 2]);
    }
}
