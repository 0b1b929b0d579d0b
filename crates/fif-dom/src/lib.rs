//! fif DOM - Host document model
//!
//! Arena-backed element tree that widgets mount their markup into.
//! Nodes are addressed by [`NodeId`]; slots of removed subtrees are
//! recycled under a new generation.

mod node;
mod tree;
mod document;
mod operations;
mod selector;
mod serialize;

pub use node::{Node, NodeData, ElementData};
pub use tree::DomTree;
pub use document::Document;
pub use operations::{DomError, DomResult};
pub use selector::SimpleSelector;

use std::fmt;

/// Node identifier: arena slot plus the slot's generation
///
/// Slots are recycled after removal; the generation is bumped each time,
/// so an id kept past its node's removal never resolves to the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Document root node ID
    pub const ROOT: NodeId = NodeId::new(0, 0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId::new(u32::MAX, 0);

    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Check the id is not the sentinel
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.index != u32::MAX
    }

    /// Stable numeric key, e.g. for side tables keyed by node
    #[inline]
    pub fn as_u64(&self) -> u64 {
        (self.generation as u64) << 32 | self.index as u64
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}
