//! Construction and initialization logic for CyclicSkipList.
//!
//! This module contains gap size validation and the constructors for empty
//! lists and for lists assembled from an existing node graph. Bulk
//! construction from a key set lives in the factory module.

use crate::arena::NodeArena;
use crate::error::{InitResult, SkipListError};
use crate::order::NaturalOrder;
use crate::types::{CyclicSkipList, Node, NodeId, DEFAULT_MIN_GAP_SIZE};

impl<K> CyclicSkipList<K, NaturalOrder> {
    /// Create an empty list with the given minimum gap size.
    ///
    /// The maximum gap size is `2 * min_gap`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_skiplist::CyclicSkipList;
    ///
    /// let list = CyclicSkipList::<i32>::new(3).unwrap();
    /// assert_eq!(list.max_gap_size(), 6);
    /// assert!(list.is_empty());
    ///
    /// assert!(CyclicSkipList::<i32>::new(0).is_err());
    /// ```
    pub fn new(min_gap: usize) -> InitResult<Self> {
        Self::with_order(min_gap, NaturalOrder)
    }

    /// Create an empty list with `DEFAULT_MIN_GAP_SIZE`.
    pub fn with_default_gap() -> InitResult<Self> {
        Self::new(DEFAULT_MIN_GAP_SIZE)
    }
}

impl<K, O> CyclicSkipList<K, O> {
    /// Create an empty list ordered by `order`.
    pub fn with_order(min_gap: usize, order: O) -> InitResult<Self> {
        let max_gap = validation::validate_min_gap(min_gap)?;

        Ok(Self {
            head: None,
            min_gap,
            max_gap,
            order,
            arena: NodeArena::new(),
            len: 0,
        })
    }

    /// Wrap an existing node graph whose topmost ring is entered at `head`.
    ///
    /// The graph is taken as is; use the validation methods to check it.
    /// The element count is taken from the length of the bottom ring.
    pub fn from_parts(
        arena: NodeArena<Node<K>>,
        head: Option<NodeId>,
        min_gap: usize,
        order: O,
    ) -> InitResult<Self> {
        let mut list = Self::with_order(min_gap, order)?;
        let len = match head {
            Some(head) => {
                let bottom = arena.bottom(head)?;
                arena.ring_len(bottom)?
            }
            None => 0,
        };

        list.arena = arena;
        list.head = head;
        list.len = len;
        Ok(list)
    }
}

impl<K> Default for CyclicSkipList<K, NaturalOrder> {
    /// Create an empty list with the default minimum gap size.
    fn default() -> Self {
        Self {
            head: None,
            min_gap: DEFAULT_MIN_GAP_SIZE,
            max_gap: 2 * DEFAULT_MIN_GAP_SIZE,
            order: NaturalOrder,
            arena: NodeArena::new(),
            len: 0,
        }
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;
    use crate::types::MIN_GAP_SIZE_LOWER_BOUND;

    /// Validate that a minimum gap size can be used to configure a list.
    ///
    /// Returns the matching maximum gap size, `2 * min_gap`.
    pub fn validate_min_gap(min_gap: usize) -> InitResult<usize> {
        if min_gap < MIN_GAP_SIZE_LOWER_BOUND {
            return Err(SkipListError::invalid_gap_size(
                min_gap,
                MIN_GAP_SIZE_LOWER_BOUND,
            ));
        }
        min_gap
            .checked_mul(2)
            .ok_or_else(|| SkipListError::gap_size_too_large(min_gap))
    }

    /// Get the recommended minimum gap size for an expected number of keys.
    ///
    /// Wider gaps mean fewer levels but longer scans at each level.
    pub fn recommended_min_gap(expected_len: usize) -> usize {
        if expected_len < 1_000 {
            DEFAULT_MIN_GAP_SIZE
        } else if expected_len < 100_000 {
            4
        } else {
            8
        }
    }
}
