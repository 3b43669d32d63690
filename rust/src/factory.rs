//! Bulk construction of CyclicSkipList from a key set.
//!
//! Keys are sorted once and threaded into the bottom ring, then index levels
//! are synthesized bottom-up with every gap already inside the size bounds.
//! No splitting or rescanning happens during bulk construction.

use crate::error::{InitResult, SkipListResult};
use crate::order::{KeyOrder, NaturalOrder};
use crate::types::{CyclicSkipList, NodeId};

impl<K: Clone + Ord> CyclicSkipList<K, NaturalOrder> {
    /// Build a list holding `keys` with the default gap size.
    ///
    /// Duplicate keys are stored once.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_skiplist::CyclicSkipList;
    ///
    /// let list = CyclicSkipList::create_from([4, 2, 9, 2]);
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2, 4, 9]);
    /// ```
    pub fn create_from<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut list = Self::default();
        if let Err(err) = list.bulk_load(keys) {
            panic!("create_from failed: {}", err);
        }
        list
    }
}

impl<K: Clone, O: KeyOrder<K>> CyclicSkipList<K, O> {
    /// Build a list holding `keys` with the given gap size and order.
    pub fn create_from_with<I>(min_gap: usize, order: O, keys: I) -> InitResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut list = Self::with_order(min_gap, order)?;
        list.bulk_load(keys)?;
        Ok(list)
    }

    /// Replace the contents of the list with `keys`.
    fn bulk_load<I>(&mut self, keys: I) -> SkipListResult<()>
    where
        I: IntoIterator<Item = K>,
    {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort_by(|a, b| self.order.compare(a, b));
        keys.dedup_by(|a, b| self.order.are_equal(a, b));

        self.arena.clear();
        self.head = None;
        self.len = keys.len();
        if keys.is_empty() {
            return Ok(());
        }

        let mut level: Vec<NodeId> = keys
            .into_iter()
            .map(|key| self.arena.allocate_node(key))
            .collect();
        self.link_ring(&level)?;

        while level.len() > self.max_gap {
            level = self.synthesize_level(&level)?;
        }

        self.head = Some(level[0]);
        if self.needs_apex(level.len()) {
            self.grow_apex()?;
        }

        tracing::debug!(len = self.len, height = self.height(), "bulk construction complete");
        Ok(())
    }

    /// Build the ring above `lower`, one index node per stride.
    fn synthesize_level(&mut self, lower: &[NodeId]) -> SkipListResult<Vec<NodeId>> {
        let upper = stride_starts(lower.len(), self.max_gap)
            .into_iter()
            .map(|start| {
                let key = self.arena.key_of(lower[start])?.clone();
                let index = self.arena.allocate_node(key);
                self.arena.connect_down_to(Some(index), Some(lower[start]))?;
                Ok(index)
            })
            .collect::<SkipListResult<Vec<_>>>()?;
        self.link_ring(&upper)?;

        tracing::debug!(lower = lower.len(), upper = upper.len(), "synthesized index level");
        Ok(upper)
    }

    /// Close `ids` into a ring in slice order.
    fn link_ring(&mut self, ids: &[NodeId]) -> SkipListResult<()> {
        for (position, &id) in ids.iter().enumerate() {
            self.arena.connect_to(id, ids[(position + 1) % ids.len()])?;
        }
        Ok(())
    }
}

/// Offsets into a ring of `len` nodes at which index nodes are placed.
///
/// Strides are `max_gap` long. The wrap-around remainder, once it is at most
/// `2 * max_gap`, is split in half when a single stride would overflow.
pub(crate) fn stride_starts(len: usize, max_gap: usize) -> Vec<usize> {
    let mut starts = Vec::with_capacity(len / max_gap + 2);
    let mut position = 0;
    let mut remaining = len;

    while remaining > 2 * max_gap {
        starts.push(position);
        position += max_gap;
        remaining -= max_gap;
    }

    starts.push(position);
    if remaining > max_gap {
        starts.push(position + remaining / 2);
    }
    starts
}

impl<K: Clone + Ord> FromIterator<K> for CyclicSkipList<K, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::create_from(iter)
    }
}

impl<K: Clone, O: KeyOrder<K>> Extend<K> for CyclicSkipList<K, O> {
    /// Insert every key one at a time.
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
