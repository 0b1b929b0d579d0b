//! DOM Node Operations
//!
//! Error type shared by tree mutations.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found (or already removed)
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("Hierarchy request error: {child} cannot be placed under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Operation needs an element (or a container) but got something else
    #[error("Invalid node type for {0}")]
    InvalidNodeType(NodeId),
}
