//! Document surface the link scanner operates on.
//!
//! The scanner never sees a concrete DOM. It works through [`DomSurface`],
//! addressing elements by [`NodeId`], a stable identity that survives href
//! rewrites.

use crate::error::AppError;

/// Stable identity of a node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One observed subtree insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationRecord {
    pub added_nodes: Vec<NodeId>,
}

impl MutationRecord {
    pub fn added(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            added_nodes: nodes.into_iter().collect(),
        }
    }
}

/// Mutation records delivered together, in observation order.
pub type MutationBatch = Vec<MutationRecord>;

/// Read/write access to the anchors of a live document.
pub trait DomSurface {
    /// Every anchor in the document, in document order.
    fn document_anchors(&self) -> Vec<NodeId>;

    /// Anchors in the subtree rooted at `root` (inclusive), in document order.
    fn anchors_within(&self, root: NodeId) -> Vec<NodeId>;

    /// Whether `node` is an element (as opposed to text or a stale handle).
    fn is_element(&self, node: NodeId) -> bool;

    /// The anchor's href resolved against the document base, if any.
    fn href(&self, node: NodeId) -> Option<String>;

    /// Replaces the anchor's href.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomMutation`] if `node` is not an anchor element.
    fn set_href(&mut self, node: NodeId, href: &str) -> Result<(), AppError>;
}
