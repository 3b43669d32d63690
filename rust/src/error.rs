//! Error handling and result types for CyclicSkipList operations.
//!
//! Missing keys and empty lists are ordinary outcomes and are reported through
//! return values. The variants below are reserved for invalid configuration and
//! for node graphs that are malformed.

use crate::types::NodeId;

/// Error type for cyclic skip list operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipListError {
    /// Invalid minimum gap size specified.
    InvalidGapSize(String),
    /// A link refers to an arena slot that is not allocated.
    DanglingNode(String),
    /// The node graph violates a traversal invariant.
    CorruptedStructure(String),
    /// A caller-supplied buffer cannot hold the requested elements.
    BufferTooSmall(String),
}

impl SkipListError {
    /// Create an InvalidGapSize error with context
    pub fn invalid_gap_size(min_gap: usize, lower_bound: usize) -> Self {
        Self::InvalidGapSize(format!(
            "Minimum gap size {} is invalid (must be at least {})",
            min_gap, lower_bound
        ))
    }

    /// Create an InvalidGapSize error for a gap size whose double overflows
    pub fn gap_size_too_large(min_gap: usize) -> Self {
        Self::InvalidGapSize(format!(
            "Minimum gap size {} is invalid (must be at most {})",
            min_gap,
            usize::MAX / 2
        ))
    }

    /// Create a DanglingNode error for a handle read during `operation`
    pub fn dangling(operation: &str, id: NodeId) -> Self {
        Self::DanglingNode(format!("{} reached unallocated node {}", operation, id))
    }

    /// Create a CorruptedStructure error with context
    pub fn corrupted(component: &str, details: &str) -> Self {
        Self::CorruptedStructure(format!("{} corruption: {}", component, details))
    }

    /// Create a BufferTooSmall error
    pub fn buffer_too_small(required: usize, available: usize) -> Self {
        Self::BufferTooSmall(format!(
            "{} slots required but only {} available",
            required, available
        ))
    }

    /// Check if this error signals a malformed node graph
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DanglingNode(_) | Self::CorruptedStructure(_))
    }
}

impl std::fmt::Display for SkipListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipListError::InvalidGapSize(msg) => write!(f, "Invalid gap size: {}", msg),
            SkipListError::DanglingNode(msg) => write!(f, "Dangling node: {}", msg),
            SkipListError::CorruptedStructure(msg) => write!(f, "Corrupted structure: {}", msg),
            SkipListError::BufferTooSmall(msg) => write!(f, "Buffer too small: {}", msg),
        }
    }
}

impl std::error::Error for SkipListError {}

/// Result type for skip list operations that may fail
pub type SkipListResult<T> = Result<T, SkipListError>;

/// Result type for skip list modification operations
pub type ModifyResult<T> = Result<T, SkipListError>;

/// Result type for skip list construction
pub type InitResult<T> = Result<T, SkipListError>;
