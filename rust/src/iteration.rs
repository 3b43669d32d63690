//! Iterator implementations for CyclicSkipList.
//!
//! Iteration walks the bottom ring once. It starts at the wrap point of the
//! ring, the node whose left neighbour holds a larger key, so keys come out
//! in ascending linear order.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::arena::NodeArena;
use crate::error::{SkipListError, SkipListResult};
use crate::macros::infallible;
use crate::order::KeyOrder;
use crate::types::{CyclicSkipList, Node, NodeId};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over the keys of a list in ascending order.
pub struct Iter<'a, K> {
    arena: &'a NodeArena<Node<K>>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.arena.get(self.next?)?;
        self.remaining -= 1;
        self.next = Some(node.right);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}

impl<'a, K> FusedIterator for Iter<'a, K> {}

// ============================================================================
// LIST ITERATOR METHODS
// ============================================================================

impl<K, O: KeyOrder<K>> CyclicSkipList<K, O> {
    /// Iterator over all keys in ascending order, reporting malformed graphs.
    pub fn try_iter(&self) -> SkipListResult<Iter<'_, K>> {
        Ok(Iter {
            arena: &self.arena,
            next: self.smallest_node()?,
            remaining: self.len,
        })
    }

    infallible! {
        /// Iterator over all keys in ascending order.
        ///
        /// # Panics
        ///
        /// Panics if the node graph is malformed.
        pub fn iter(&self) -> Iter<'_, K>
    }

    /// Copy the keys in ascending order into `buffer`, starting at `offset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_skiplist::CyclicSkipList;
    ///
    /// let list = CyclicSkipList::create_from([3, 1, 2]);
    /// let mut buffer = [0; 5];
    /// list.copy_to(&mut buffer, 1).unwrap();
    /// assert_eq!(buffer, [0, 1, 2, 3, 0]);
    /// assert!(list.copy_to(&mut buffer, 3).is_err());
    /// ```
    pub fn copy_to(&self, buffer: &mut [K], offset: usize) -> SkipListResult<()>
    where
        K: Clone,
    {
        let available = buffer.len().saturating_sub(offset);
        if available < self.len {
            return Err(SkipListError::buffer_too_small(self.len, available));
        }

        for (slot, key) in buffer.iter_mut().skip(offset).zip(self.try_iter()?) {
            *slot = key.clone();
        }
        Ok(())
    }

    /// The bottom node holding the smallest key, `None` for an empty list.
    fn smallest_node(&self) -> SkipListResult<Option<NodeId>> {
        let Some(head) = self.head else {
            return Ok(None);
        };
        let bottom = self.arena.bottom(head)?;

        for node in self.arena.enumerate_right(bottom) {
            let right = self.arena.right_of(node)?;
            if self.order.compare(self.arena.key_of(right)?, self.arena.key_of(node)?)
                == Ordering::Less
            {
                return Ok(Some(right));
            }
        }
        Ok(Some(bottom))
    }
}

impl<'a, K, O: KeyOrder<K>> IntoIterator for &'a CyclicSkipList<K, O> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}
