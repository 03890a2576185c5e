//! Arena-backed document implementing [`DomSurface`].

use serde_json::json;
use std::collections::BTreeMap;
use url::Url;

use crate::domain::dom::{DomSurface, NodeId};
use crate::error::AppError;

const ANCHOR_TAG: &str = "a";
const HREF_ATTR: &str = "href";

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A minimal element tree with a `<body>` root.
///
/// Nodes are never freed; a [`NodeId`] stays valid for the lifetime of the
/// document, which makes it usable as a stable element identity. Relative
/// hrefs are resolved against the optional base URL, like `HTMLAnchorElement.href`.
#[derive(Debug, Clone)]
pub struct InMemoryDocument {
    nodes: Vec<Node>,
    body: NodeId,
    base_url: Option<Url>,
}

impl InMemoryDocument {
    /// Creates an empty document without a base URL.
    pub fn new() -> Self {
        let body = Node {
            kind: NodeKind::Element {
                tag: "body".to_string(),
                attributes: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };

        Self {
            nodes: vec![body],
            body: NodeId(0),
            base_url: None,
        }
    }

    /// Creates an empty document whose relative hrefs resolve against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Parse`] if `base` is not an absolute URL.
    pub fn with_base_url(base: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base).map_err(|e| {
            AppError::parse(
                "Invalid document base URL",
                json!({ "base": base, "reason": e.to_string() }),
            )
        })?;

        Ok(Self {
            base_url: Some(base_url),
            ..Self::new()
        })
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element. Tag names are case-insensitive.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        })
    }

    /// Creates a detached `<a href=..>`.
    pub fn create_anchor(&mut self, href: &str) -> NodeId {
        let mut attributes = BTreeMap::new();
        attributes.insert(HREF_ATTR.to_string(), href.to_string());
        self.push(NodeKind::Element {
            tag: ANCHOR_TAG.to_string(),
            attributes,
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn node(&self, id: NodeId) -> Result<&Node, AppError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| AppError::dom_mutation("Unknown node", json!({ "node": id.0 })))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Text of a text node; `None` for elements.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    /// Sets an attribute on an element.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomMutation`] for text nodes or unknown ids.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), AppError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or_else(|| AppError::dom_mutation("Unknown node", json!({ "node": id.0 })))?;

        match &mut node.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.to_ascii_lowercase(), value.to_string());
                Ok(())
            }
            NodeKind::Text(_) => Err(AppError::dom_mutation(
                "Text nodes have no attributes",
                json!({ "node": id.0, "attribute": name }),
            )),
        }
    }

    /// Appends a detached node to `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DomMutation`] if either id is unknown, `parent` is a
    /// text node, `child` already has a parent, or the append would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), AppError> {
        if !self.is_element(parent) {
            return Err(AppError::dom_mutation(
                "Parent must be an element",
                json!({ "parent": parent.0 }),
            ));
        }
        if self.node(child)?.parent.is_some() || child == self.body {
            return Err(AppError::dom_mutation(
                "Child is already attached",
                json!({ "child": child.0 }),
            ));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(AppError::dom_mutation(
                "Append would create a cycle",
                json!({ "parent": parent.0, "child": child.0 }),
            ));
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// `node` followed by its ancestors up to the root.
    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), |id| {
            self.nodes.get(id.0).and_then(|n| n.parent)
        })
    }

    /// Whether `node` is reachable from `<body>`.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some() && self.ancestors(node).any(|a| a == self.body)
    }

    fn is_anchor(&self, node: NodeId) -> bool {
        self.tag_name(node) == Some(ANCHOR_TAG)
    }

    /// Pre-order walk of the subtree rooted at `root`, inclusive.
    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            order.push(id);
            stack.extend(node.children.iter().rev().copied());
        }

        order
    }
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSurface for InMemoryDocument {
    fn document_anchors(&self) -> Vec<NodeId> {
        self.anchors_within(self.body)
    }

    fn anchors_within(&self, root: NodeId) -> Vec<NodeId> {
        self.subtree(root)
            .into_iter()
            .filter(|id| self.is_anchor(*id))
            .collect()
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.tag_name(node).is_some()
    }

    fn href(&self, node: NodeId) -> Option<String> {
        if !self.is_anchor(node) {
            return None;
        }
        let raw = self.attribute(node, HREF_ATTR)?;

        match &self.base_url {
            Some(base) => base.join(raw).ok().map(String::from),
            None => Some(raw.to_string()),
        }
    }

    fn set_href(&mut self, node: NodeId, href: &str) -> Result<(), AppError> {
        if !self.is_anchor(node) {
            return Err(AppError::dom_mutation(
                "href can only be written on anchors",
                json!({ "node": node.0, "tag": self.tag_name(node) }),
            ));
        }
        self.set_attribute(node, HREF_ATTR, href)
    }
}
