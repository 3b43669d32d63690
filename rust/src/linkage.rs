//! Node linkage utilities.
//!
//! Primitive graph operations over the node arena: wiring links, walking
//! rings and columns, measuring distances and gaps. Nothing here looks at key
//! order; the search, insert and delete modules build on these.

use crate::arena::NodeArena;
use crate::error::{SkipListError, SkipListResult};
use crate::types::{Node, NodeId};

impl<K> NodeArena<Node<K>> {
    // ============================================================================
    // NODE ACCESS
    // ============================================================================

    /// Allocate a node that forms a ring of one.
    pub fn allocate_node(&mut self, key: K) -> NodeId {
        let id = self.allocate(Node::new(key));
        if let Some(node) = self.get_mut(id) {
            node.left = id;
            node.right = id;
        }
        id
    }

    /// Get a node, reporting a dangling handle as an error.
    #[inline]
    pub fn node(&self, id: NodeId) -> SkipListResult<&Node<K>> {
        self.get(id).ok_or_else(|| SkipListError::dangling("Node lookup", id))
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> SkipListResult<&mut Node<K>> {
        self.get_mut(id)
            .ok_or_else(|| SkipListError::dangling("Node update", id))
    }

    #[inline]
    pub fn key_of(&self, id: NodeId) -> SkipListResult<&K> {
        self.node(id).map(|node| &node.key)
    }

    #[inline]
    pub fn right_of(&self, id: NodeId) -> SkipListResult<NodeId> {
        self.node(id).map(|node| node.right)
    }

    #[inline]
    pub fn left_of(&self, id: NodeId) -> SkipListResult<NodeId> {
        self.node(id).map(|node| node.left)
    }

    #[inline]
    pub fn up_of(&self, id: NodeId) -> SkipListResult<Option<NodeId>> {
        self.node(id).map(|node| node.up)
    }

    #[inline]
    pub fn down_of(&self, id: NodeId) -> SkipListResult<Option<NodeId>> {
        self.node(id).map(|node| node.down)
    }

    /// Overwrite the key stored in a node.
    pub fn set_key(&mut self, id: NodeId, key: K) -> SkipListResult<()> {
        self.node_mut(id)?.key = key;
        Ok(())
    }

    // ============================================================================
    // LINK WIRING
    // ============================================================================

    /// Make `right` the right neighbour of `left` and vice versa.
    pub fn connect_to(&mut self, left: NodeId, right: NodeId) -> SkipListResult<()> {
        // Validate both ends first so a failure leaves no half-made link
        self.node(right)?;
        self.node_mut(left)?.right = right;
        self.node_mut(right)?.left = left;
        Ok(())
    }

    /// Make `bottom` the node below `top` and vice versa. Either side may be absent,
    /// which clears the corresponding link on the other side.
    pub fn connect_down_to(
        &mut self,
        top: Option<NodeId>,
        bottom: Option<NodeId>,
    ) -> SkipListResult<()> {
        if let Some(top) = top {
            self.node_mut(top)?.down = bottom;
        }
        if let Some(bottom) = bottom {
            self.node_mut(bottom)?.up = top;
        }
        Ok(())
    }

    // ============================================================================
    // TRAVERSAL
    // ============================================================================

    /// Nodes of the ring containing `start`, beginning with `start`.
    ///
    /// The walk ends on returning to `start`, at a dangling handle, or after
    /// visiting as many nodes as the arena holds.
    pub fn enumerate_right(&self, start: NodeId) -> RightIter<'_, K> {
        RightIter {
            arena: self,
            start,
            next: self.contains(start).then_some(start),
            budget: self.len(),
        }
    }

    /// Nodes of the column below `start`, beginning with `start`.
    pub fn enumerate_down(&self, start: NodeId) -> DownIter<'_, K> {
        DownIter {
            arena: self,
            next: self.contains(start).then_some(start),
            budget: self.len(),
        }
    }

    /// The bottom node of the column containing `start`.
    pub fn bottom(&self, start: NodeId) -> SkipListResult<NodeId> {
        let mut current = start;
        for _ in 0..=self.len() {
            match self.down_of(current)? {
                Some(down) => current = down,
                None => return Ok(current),
            }
        }
        Err(SkipListError::corrupted(
            "Column",
            &format!("no bottom below node {}", start),
        ))
    }

    /// Advance `count` hops to the right.
    pub fn right_by(&self, start: NodeId, count: usize) -> SkipListResult<NodeId> {
        let mut current = start;
        for _ in 0..count {
            current = self.right_of(current)?;
        }
        Ok(current)
    }

    /// Number of hops from `origin` to `destination` going right.
    ///
    /// For `origin == destination` this is the length of the ring. Completing a
    /// revolution without meeting `destination` means the two nodes are not in
    /// the same ring and is reported as corruption.
    pub fn distance_right_to(
        &self,
        origin: NodeId,
        destination: NodeId,
    ) -> SkipListResult<usize> {
        let mut distance = 1;
        let mut node = self.right_of(origin)?;
        while node != origin && node != destination {
            if distance > self.len() {
                return Err(SkipListError::corrupted(
                    "Ring",
                    &format!("ring through node {} never closes", origin),
                ));
            }
            node = self.right_of(node)?;
            distance += 1;
        }

        if origin != destination && node == origin {
            return Err(SkipListError::corrupted(
                "Ring",
                &format!(
                    "returned to origin {} without finding destination {}",
                    origin, destination
                ),
            ));
        }

        Ok(distance)
    }

    /// Number of nodes in the ring containing `node`.
    pub fn ring_len(&self, node: NodeId) -> SkipListResult<usize> {
        self.distance_right_to(node, node)
    }

    /// Number of lower nodes owned by the index node `node`.
    pub fn size_of_gap(&self, node: NodeId) -> SkipListResult<usize> {
        let start = self.down_of(node)?.ok_or_else(|| {
            SkipListError::corrupted("Gap", &format!("node {} does not precede a gap", node))
        })?;
        let right = self.right_of(node)?;
        let end = self.down_of(right)?.ok_or_else(|| {
            SkipListError::corrupted(
                "Gap",
                &format!("node {} to the right of {} does not succeed a gap", right, node),
            )
        })?;
        self.distance_right_to(start, end)
    }

    /// Number of `down` hops from `node` to the bottom ring.
    pub fn height(&self, node: NodeId) -> SkipListResult<usize> {
        let bottom = self.bottom(node)?;
        Ok(self.enumerate_down(node).take_while(|&id| id != bottom).count())
    }
}

/// Iterator over the nodes of one ring.
pub struct RightIter<'a, K> {
    arena: &'a NodeArena<Node<K>>,
    start: NodeId,
    next: Option<NodeId>,
    budget: usize,
}

impl<'a, K> Iterator for RightIter<'a, K> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.take()?;
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;
        self.next = self
            .arena
            .get(current)
            .map(|node| node.right)
            .filter(|&right| right != self.start && self.arena.contains(right));
        Some(current)
    }
}

/// Iterator over the nodes of one column, top to bottom.
pub struct DownIter<'a, K> {
    arena: &'a NodeArena<Node<K>>,
    next: Option<NodeId>,
    budget: usize,
}

impl<'a, K> Iterator for DownIter<'a, K> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.take()?;
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;
        self.next = self
            .arena
            .get(current)
            .and_then(|node| node.down)
            .filter(|&down| self.arena.contains(down));
        Some(current)
    }
}
