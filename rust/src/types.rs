//! Core types and data structures for CyclicSkipList.
//!
//! This module contains the node and list definitions, handle types and the
//! gap size constants shared by every operation module.

use crate::arena::NodeArena;
use crate::order::NaturalOrder;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum gap size a list may be configured with
pub const MIN_GAP_SIZE_LOWER_BOUND: usize = 1;

/// Minimum gap size used when none is specified
pub const DEFAULT_MIN_GAP_SIZE: usize = 2;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node handle type for arena-based allocation
pub type NodeId = u32;

/// Placeholder handle for links that have not been wired yet
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// One vertex of the skip list graph.
///
/// `left` and `right` always name a node of the same ring (a node alone in its
/// ring links to itself). `up` and `down` join the node to the rest of its
/// column. An index node's key mirrors the key at the bottom of its column.
#[derive(Debug, Clone)]
pub struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) up: Option<NodeId>,
    pub(crate) down: Option<NodeId>,
}

impl<K> Node<K> {
    /// Creates an unlinked node. The arena wires it into a ring of one.
    pub fn new(key: K) -> Self {
        Self {
            key,
            left: NULL_NODE,
            right: NULL_NODE,
            up: None,
            down: None,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn left(&self) -> NodeId {
        self.left
    }

    pub fn right(&self) -> NodeId {
        self.right
    }

    pub fn up(&self) -> Option<NodeId> {
        self.up
    }

    pub fn down(&self) -> Option<NodeId> {
        self.down
    }

    /// Returns true if this node belongs to the bottom ring.
    pub fn is_leaf(&self) -> bool {
        self.down.is_none()
    }
}

/// Deterministic skip list whose levels are circular rings.
///
/// Each level is a closed, doubly linked ring ordered by a cyclic order, so
/// there is no distinguished smallest element the algorithms depend on. Every
/// node above the bottom ring owns a *gap* of the ring below it, and every gap
/// holds between `min_gap` and `2 * min_gap` nodes. Insertion and removal keep
/// that bound by splitting, borrowing and merging gaps on the way down.
///
/// # Type Parameters
///
/// * `K` - Key type, cloned into index nodes
/// * `O` - Key order, `NaturalOrder` for `K: Ord`
///
/// # Examples
///
/// ```
/// use cyclic_skiplist::CyclicSkipList;
///
/// let mut list = CyclicSkipList::new(2).unwrap();
/// list.insert(30);
/// list.insert(10);
/// list.insert(20);
///
/// assert!(list.contains(&20));
/// assert!(!list.contains(&25));
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
///
/// assert!(list.remove(&10));
/// assert_eq!(list.len(), 2);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n), at most one split per level
/// - **Lookup**: O(log n)
/// - **Deletion**: O(log n), at most one borrow or merge per level
/// - **Bulk construction**: O(n log n) for the sort, O(n) node creations
/// - **Iteration**: O(n)
#[derive(Debug)]
pub struct CyclicSkipList<K, O = NaturalOrder> {
    /// Entry node of the topmost ring, `None` when the list is empty.
    pub(crate) head: Option<NodeId>,
    /// Smallest gap size any index node may own.
    pub(crate) min_gap: usize,
    /// Largest gap size any index node may own, always `2 * min_gap`.
    pub(crate) max_gap: usize,
    /// Linear and cyclic key order.
    pub(crate) order: O,
    /// Arena storage for every node of every level.
    pub(crate) arena: NodeArena<Node<K>>,
    /// Number of nodes in the bottom ring.
    pub(crate) len: usize,
}
