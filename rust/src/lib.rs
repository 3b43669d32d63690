//! Deterministic cyclic skip list in Rust.
//!
//! This crate provides an ordered set whose levels are closed, doubly linked
//! rings ordered by a wrap-around order. Every node above the bottom ring owns
//! a gap of between `min_gap` and `2 * min_gap` lower nodes; insertion and
//! removal keep that bound by splitting, borrowing and merging gaps top-down
//! on a single descent.
//!
//! Nodes live in an arena and refer to each other through stable `NodeId`
//! handles, so the cyclic four-way node graph needs no shared ownership.
//!
//! # Examples
//!
//! ```
//! use cyclic_skiplist::CyclicSkipList;
//!
//! let mut list: CyclicSkipList<u32> = (1..=9).collect();
//! assert_eq!(list.level_lengths(), vec![1, 3, 9]);
//!
//! list.insert(20);
//! list.remove(&4);
//! assert!(list.check_invariants());
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7, 8, 9, 20]);
//! ```

mod arena;
mod construction;
mod delete_operations;
mod error;
mod factory;
mod insert_operations;
mod iteration;
mod linkage;
mod macros;
mod order;
mod search_operations;
mod types;
mod validation;

pub use arena::{NodeArena, NodeArenaStats};
pub use construction::validation as config;
pub use error::{InitResult, ModifyResult, SkipListError, SkipListResult};
pub use iteration::Iter;
pub use linkage::{DownIter, RightIter};
pub use order::{FnOrder, KeyOrder, NaturalOrder};
pub use types::{
    CyclicSkipList, Node, NodeId, DEFAULT_MIN_GAP_SIZE, MIN_GAP_SIZE_LOWER_BOUND, NULL_NODE,
};
pub use validation::ValidationResult;

impl<K, O> CyclicSkipList<K, O> {
    // ============================================================================
    // OTHER API OPERATIONS
    // ============================================================================

    /// Returns the number of keys in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of index levels above the bottom ring.
    pub fn height(&self) -> usize {
        self.head
            .map_or(0, |head| self.arena.enumerate_down(head).count().saturating_sub(1))
    }

    pub fn min_gap_size(&self) -> usize {
        self.min_gap
    }

    pub fn max_gap_size(&self) -> usize {
        self.max_gap
    }

    /// Entry node of the topmost ring.
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// The node graph.
    pub fn nodes(&self) -> &NodeArena<Node<K>> {
        &self.arena
    }

    /// Mutable access to the node graph.
    ///
    /// Nothing stops the caller from breaking the invariants through this;
    /// run the validators afterwards.
    pub fn nodes_mut(&mut self) -> &mut NodeArena<Node<K>> {
        &mut self.arena
    }

    pub fn order(&self) -> &O {
        &self.order
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.len = 0;
    }

    /// Returns statistics for the node arena.
    pub fn arena_stats(&self) -> NodeArenaStats {
        self.arena.stats()
    }

    /// Whether a head ring of `len` nodes gets an apex node above it.
    pub(crate) fn needs_apex(&self, len: usize) -> bool {
        len > 1 && len >= self.min_gap
    }

    // ============================================================================
    // STRUCTURAL HELPERS
    // ============================================================================

    /// Take `node` out of its ring and free it.
    ///
    /// Vertical links must already have been detached by the caller.
    pub(crate) fn unlink(&mut self, node: NodeId) -> SkipListResult<()> {
        let left = self.arena.left_of(node)?;
        let right = self.arena.right_of(node)?;
        if right == node {
            return Err(SkipListError::corrupted(
                "Ring",
                &format!("cannot unlink node {}, it is alone in its ring", node),
            ));
        }

        self.arena.connect_to(left, right)?;
        if self.head == Some(node) {
            self.head = Some(right);
        }
        self.arena.deallocate(node);
        Ok(())
    }

    /// Copy the bottom key of the column through `node` into every index node above it.
    pub(crate) fn refresh_column(&mut self, node: NodeId) -> SkipListResult<()>
    where
        K: Clone,
    {
        let bottom = self.arena.bottom(node)?;
        let key = self.arena.key_of(bottom)?.clone();

        let mut current = self.arena.up_of(bottom)?;
        for _ in 0..self.arena.len() {
            let Some(id) = current else {
                return Ok(());
            };
            self.arena.set_key(id, key.clone())?;
            current = self.arena.up_of(id)?;
        }

        Err(SkipListError::corrupted(
            "Column",
            &format!("column above node {} never ends", bottom),
        ))
    }
}
