//! Slot arena holding every node of a skip list.
//!
//! Nodes are addressed by stable `NodeId` handles. Freed slots are pushed on a
//! free list and reused by later allocations, so handles of live nodes never
//! move while the list is being rebalanced.

use std::convert::TryFrom;

use crate::types::{NodeId, NULL_NODE};

/// Statistics for a node arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeArenaStats {
    pub total_slots: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
}

/// Arena allocator with a free list of vacated slots
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    /// Slot storage, `None` for vacated slots
    storage: Vec<Option<T>>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Number of occupied slots
    allocated: usize,
}

/// Handle for the slot at `index`, if it fits below `NULL_NODE`.
fn slot_id(index: usize) -> Option<NodeId> {
    NodeId::try_from(index).ok().filter(|&id| id != NULL_NODE)
}

impl<T> NodeArena<T> {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Create a new arena with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Allocate a new item in the arena and return its ID
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` slots.
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = self.free_list.last().copied().unwrap_or(self.storage.len());
        let Some(id) = slot_id(index) else {
            panic!("node arena exhausted the NodeId space at slot {}", index);
        };

        if self.free_list.pop().is_some() {
            self.storage[index] = Some(item);
        } else {
            self.storage.push(Some(item));
        }
        self.allocated += 1;
        id
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T> {
        let index = usize::try_from(id).ok()?;
        let item = self.storage.get_mut(index)?.take()?;
        self.free_list.push(index);
        self.allocated -= 1;
        Some(item)
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        let index = usize::try_from(id).ok()?;
        self.storage.get(index)?.as_ref()
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = usize::try_from(id).ok()?;
        self.storage.get_mut(index)?.as_mut()
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over the IDs of all allocated slots in slot order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.storage
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| index as NodeId)
    }

    /// Get arena statistics
    pub fn stats(&self) -> NodeArenaStats {
        let total_slots = self.storage.len();
        let utilization = if total_slots > 0 {
            self.allocated as f64 / total_slots as f64
        } else {
            0.0
        };

        NodeArenaStats {
            total_slots,
            allocated_count: self.allocated,
            free_count: self.free_list.len(),
            utilization,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.free_list.clear();
        self.allocated = 0;
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
