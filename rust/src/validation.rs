//! Validation and debugging utilities for CyclicSkipList.
//!
//! This module contains the structural validators, the aggregate invariant
//! checks used throughout the tests, and per-level diagnostics.
//!
//! Each validator returns the set of nodes at which its invariant fails, so a
//! broken structure can be inspected through [`CyclicSkipList::nodes`].

use std::collections::{BTreeSet, HashSet};

use crate::error::{SkipListError, SkipListResult};
use crate::order::KeyOrder;
use crate::types::{CyclicSkipList, NodeId};

/// Outcome of a structural validator: the failing nodes on error.
pub type ValidationResult = Result<(), Vec<NodeId>>;

fn failures(nodes: Vec<NodeId>) -> ValidationResult {
    if nodes.is_empty() {
        Ok(())
    } else {
        Err(nodes)
    }
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K, O: KeyOrder<K>> CyclicSkipList<K, O> {
    /// Every node reachable from the head over any of the four links, in handle order.
    ///
    /// Links to unallocated slots are not followed.
    pub fn reachable_nodes(&self) -> Vec<NodeId> {
        let mut processed = BTreeSet::new();
        let mut discovered: Vec<NodeId> = self.head.into_iter().collect();

        while let Some(id) = discovered.pop() {
            if !processed.insert(id) {
                continue;
            }
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let neighbours = [Some(node.left), Some(node.right), node.up, node.down];
            discovered.extend(
                neighbours
                    .into_iter()
                    .flatten()
                    .filter(|next| self.arena.contains(*next) && !processed.contains(next)),
            );
        }

        processed.into_iter().collect()
    }

    /// Every reachable node lies on a ring passing through the head column.
    pub fn validate_rightwards_reachability(&self) -> ValidationResult {
        let Some(head) = self.head else {
            return Ok(());
        };

        let rightwards: HashSet<NodeId> = self
            .arena
            .enumerate_down(head)
            .flat_map(|level_head| self.arena.enumerate_right(level_head))
            .collect();

        failures(
            self.reachable_nodes()
                .into_iter()
                .filter(|id| !rightwards.contains(id))
                .collect(),
        )
    }

    /// Every node sits cyclically between its left and right neighbours.
    pub fn validate_ordering(&self) -> ValidationResult {
        let ordered = |id: NodeId| -> SkipListResult<bool> {
            let key = self.arena.key_of(id)?;
            let left = self.arena.key_of(self.arena.left_of(id)?)?;
            let right = self.arena.key_of(self.arena.right_of(id)?)?;
            Ok(self.order.in_order(left, key, right))
        };

        failures(
            self.reachable_nodes()
                .into_iter()
                .filter(|&id| !matches!(ordered(id), Ok(true)))
                .collect(),
        )
    }

    /// Every index node owns between `min_gap` and `max_gap` lower nodes.
    pub fn validate_gap_size(&self) -> ValidationResult {
        let bounds = self.min_gap..=self.max_gap;
        failures(
            self.reachable_nodes()
                .into_iter()
                .filter(|&id| matches!(self.arena.down_of(id), Ok(Some(_))))
                .filter(|&id| match self.arena.size_of_gap(id) {
                    Ok(gap) => !bounds.contains(&gap),
                    Err(_) => true,
                })
                .collect(),
        )
    }

    /// Horizontal links are mutual inverses and vertical links point back.
    pub fn validate_links(&self) -> ValidationResult {
        let linked = |id: NodeId| -> SkipListResult<bool> {
            let right = self.arena.right_of(id)?;
            let left = self.arena.left_of(id)?;
            if self.arena.left_of(right)? != id || self.arena.right_of(left)? != id {
                return Ok(false);
            }
            if let Some(down) = self.arena.down_of(id)? {
                if self.arena.up_of(down)? != Some(id) {
                    return Ok(false);
                }
            }
            if let Some(up) = self.arena.up_of(id)? {
                if self.arena.down_of(up)? != Some(id) {
                    return Ok(false);
                }
            }
            Ok(true)
        };

        failures(
            self.reachable_nodes()
                .into_iter()
                .filter(|&id| !matches!(linked(id), Ok(true)))
                .collect(),
        )
    }

    /// Every index node carries the key of the bottom node of its column.
    pub fn validate_column_keys(&self) -> ValidationResult {
        let representative = |id: NodeId| -> SkipListResult<bool> {
            let bottom = self.arena.bottom(id)?;
            Ok(self
                .order
                .are_equal(self.arena.key_of(id)?, self.arena.key_of(bottom)?))
        };

        failures(
            self.reachable_nodes()
                .into_iter()
                .filter(|&id| !matches!(representative(id), Ok(true)))
                .collect(),
        )
    }

    /// The head ring is topmost and holds between one and `max_gap` nodes.
    pub fn validate_apex(&self) -> ValidationResult {
        let Some(head) = self.head else {
            return Ok(());
        };

        match (self.arena.up_of(head), self.arena.ring_len(head)) {
            (Ok(None), Ok(len)) if len <= self.max_gap => Ok(()),
            _ => Err(self.arena.enumerate_right(head).collect()),
        }
    }

    /// Check that arena allocation matches the node graph.
    ///
    /// Every allocated slot must be reachable from the head, and the element
    /// count must equal the length of the bottom ring.
    pub fn check_arena_consistency(&self) -> SkipListResult<()> {
        let reachable: HashSet<NodeId> = self.reachable_nodes().into_iter().collect();
        let orphans: Vec<NodeId> = self
            .arena
            .ids()
            .filter(|id| !reachable.contains(id))
            .collect();
        if !orphans.is_empty() {
            return Err(SkipListError::corrupted(
                "Arena",
                &format!("allocated nodes {:?} are unreachable from the head", orphans),
            ));
        }

        let bottom_len = match self.head {
            Some(head) => self.arena.ring_len(self.arena.bottom(head)?)?,
            None => 0,
        };
        if bottom_len != self.len {
            return Err(SkipListError::corrupted(
                "Arena",
                &format!("{} nodes in bottom ring vs count of {}", bottom_len, self.len),
            ));
        }

        Ok(())
    }

    /// Check if the list maintains all structural invariants.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let validators: [(&str, fn(&Self) -> ValidationResult); 6] = [
            ("link", Self::validate_links),
            ("rightwards reachability", Self::validate_rightwards_reachability),
            ("ordering", Self::validate_ordering),
            ("column key", Self::validate_column_keys),
            ("gap size", Self::validate_gap_size),
            ("apex", Self::validate_apex),
        ];
        for (name, validator) in validators {
            validator(self)
                .map_err(|nodes| format!("{} invariant violated at nodes {:?}", name, nodes))?;
        }

        self.check_arena_consistency().map_err(|e| e.to_string())
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Alias for check_invariants_detailed (for test compatibility).
    pub fn validate(&self) -> Result<(), String> {
        self.check_invariants_detailed()
    }

    /// Ring lengths from the head ring down to the bottom ring.
    pub fn level_lengths(&self) -> Vec<usize> {
        match self.head {
            Some(head) => self
                .arena
                .enumerate_down(head)
                .map(|level_head| self.arena.ring_len(level_head).unwrap_or(0))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Keys of every ring from the head ring down, each in ascending order.
    pub fn levels(&self) -> Vec<Vec<K>>
    where
        K: Clone,
    {
        let Some(head) = self.head else {
            return Vec::new();
        };

        self.arena
            .enumerate_down(head)
            .map(|level_head| {
                let mut keys: Vec<K> = self
                    .arena
                    .enumerate_right(level_head)
                    .filter_map(|id| self.arena.key_of(id).ok().cloned())
                    .collect();
                keys.sort_by(|a, b| self.order.compare(a, b));
                keys
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeArena;
    use crate::order::NaturalOrder;

    /// Two-level list over `keys` with index nodes over the given bottom positions.
    fn two_level(keys: &[i32], columns: &[usize], min_gap: usize) -> CyclicSkipList<i32> {
        let mut arena = NodeArena::new();
        let bottom: Vec<NodeId> = keys.iter().map(|&k| arena.allocate_node(k)).collect();
        for i in 0..bottom.len() {
            arena.connect_to(bottom[i], bottom[(i + 1) % bottom.len()]).unwrap();
        }
        let index: Vec<NodeId> = columns
            .iter()
            .map(|&position| {
                let id = arena.allocate_node(keys[position]);
                arena.connect_down_to(Some(id), Some(bottom[position])).unwrap();
                id
            })
            .collect();
        for i in 0..index.len() {
            arena.connect_to(index[i], index[(i + 1) % index.len()]).unwrap();
        }
        CyclicSkipList::from_parts(arena, Some(index[0]), min_gap, NaturalOrder).unwrap()
    }

    #[test]
    fn test_empty_list_is_valid() {
        let list = CyclicSkipList::<i32>::new(2).unwrap();
        assert!(list.reachable_nodes().is_empty());
        assert_eq!(list.validate(), Ok(()));
        assert!(list.level_lengths().is_empty());
    }

    #[test]
    fn test_bulk_list_is_valid() {
        let list = CyclicSkipList::create_from(0..500);
        assert_eq!(list.check_invariants_detailed(), Ok(()));
        assert_eq!(list.reachable_nodes().len(), list.arena.len());
    }

    #[test]
    fn test_hand_built_list_is_valid() {
        let list = two_level(&[1, 2, 3, 4, 5, 6], &[0, 3], 2);
        assert_eq!(list.validate(), Ok(()));
        assert_eq!(list.level_lengths(), vec![2, 6]);
        assert_eq!(list.levels(), vec![vec![1, 4], vec![1, 2, 3, 4, 5, 6]]);
    }

    #[test]
    fn test_gap_size_violation_is_reported() {
        // Gaps of 1 and 5 with min_gap 2
        let list = two_level(&[1, 2, 3, 4, 5, 6], &[0, 1], 2);
        let index_first = list.head.unwrap();
        let failing = list.validate_gap_size().unwrap_err();
        assert_eq!(failing.len(), 2);
        assert!(failing.contains(&index_first));
        assert!(!list.check_invariants());
    }

    #[test]
    fn test_ordering_violation_is_reported() {
        let mut list = two_level(&[1, 2, 3, 4, 5, 6], &[0, 3], 2);
        let bottom = list.arena.bottom(list.head.unwrap()).unwrap();
        let second = list.arena.right_of(bottom).unwrap();
        list.arena.set_key(second, 9).unwrap();

        let failing = list.validate_ordering().unwrap_err();
        assert!(failing.contains(&second));
    }

    #[test]
    fn test_column_key_violation_is_reported() {
        let mut list = two_level(&[1, 2, 3, 4, 5, 6], &[0, 3], 2);
        let head = list.head.unwrap();
        list.arena.set_key(head, 2).unwrap();
        assert_eq!(list.validate_column_keys(), Err(vec![head]));
    }

    #[test]
    fn test_broken_back_link_is_reported() {
        let mut list = two_level(&[1, 2, 3, 4, 5, 6], &[0, 3], 2);
        let head = list.head.unwrap();
        let bottom = list.arena.bottom(head).unwrap();
        list.arena.node_mut(bottom).unwrap().up = None;
        assert_eq!(list.validate_links(), Err(vec![head]));
    }

    #[test]
    fn test_unreachable_ring_is_reported() {
        let mut list = two_level(&[1, 2, 3, 4, 5, 6], &[0, 3], 2);
        let stray = list.arena.allocate_node(42);
        assert!(list.validate_rightwards_reachability().is_ok());
        let result = list.check_arena_consistency();
        assert!(matches!(result, Err(SkipListError::CorruptedStructure(_))));

        // Hang the stray node below a bottom node; it is reachable but on no
        // ring through the head column
        let bottom = list.arena.bottom(list.head.unwrap()).unwrap();
        let second = list.arena.right_of(bottom).unwrap();
        list.arena.connect_down_to(Some(second), Some(stray)).unwrap();
        assert_eq!(list.validate_rightwards_reachability(), Err(vec![stray]));
    }

    #[test]
    fn test_oversized_head_ring_is_reported() {
        let list = two_level(&(0..20).collect::<Vec<_>>(), &[0, 4, 8, 12, 16], 2);
        assert!(list.validate_gap_size().is_ok());
        assert_eq!(list.validate_apex().unwrap_err().len(), 5);
    }
}
