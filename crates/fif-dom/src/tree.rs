//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
///
/// Index 0 always holds the document node. Removal frees the whole
/// subtree's slots for reuse; see [`NodeId`] for how stale ids are caught.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    free: Vec<u32>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::new(NodeData::Document)], free: Vec::new() }
    }

    /// Tree holding `<html>` with `<head>` and `<body>`
    pub(crate) fn with_skeleton() -> (Self, [NodeId; 3]) {
        let mut tree = Self::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.link_fresh(NodeId::ROOT, html);
        tree.link_fresh(html, head);
        tree.link_fresh(html, body);
        (tree, [html, head, body])
    }

    /// Append a just-created, unattached node
    fn link_fresh(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = parent;
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a live node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index())
            .filter(|n| !n.removed && n.generation == id.generation())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .filter(|n| !n.removed && n.generation == id.generation())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Check whether the id refers to a live node
    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes, document node included
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of arena slots, live or free
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.nodes[index as usize];
            let generation = slot.generation;
            *slot = Node::new(data);
            slot.generation = generation;
            return NodeId::new(index, generation);
        }
        let id = NodeId::new(self.nodes.len() as u32, 0);
        self.nodes.push(Node::new(data));
        id
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Children of a node (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Element data for a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))
    }

    /// Append `child` as last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let at = self.node(parent)?.children.len();
        self.insert_child(parent, at, child)
    }

    /// Insert `child` as first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_child(parent, 0, child)
    }

    fn insert_child(&mut self, parent: NodeId, at: usize, child: NodeId) -> DomResult<()> {
        if self.node(parent)?.is_text() {
            return Err(DomError::InvalidNodeType(parent));
        }
        self.node(child)?;
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.unlink(child);

        let at = at.min(self.children(parent).len());
        if let Some(p) = self.get_mut(parent) {
            p.children.insert(at, child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = parent;
        }
        Ok(())
    }

    /// Detach a node from its parent without removing it
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else { return };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = NodeId::NONE;
        }
    }

    /// Remove a node and free its whole subtree
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        if id == NodeId::ROOT {
            return Err(DomError::HierarchyRequest { parent: NodeId::NONE, child: id });
        }
        self.node(id)?;
        self.unlink(id);

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.get_mut(next) {
                node.removed = true;
                node.generation = node.generation.wrapping_add(1);
                node.data = NodeData::Text(String::new());
                stack.extend(node.children.drain(..));
                self.free.push(next.index() as u32);
            }
        }
        tracing::trace!("removed subtree rooted at {}", id);
        Ok(())
    }

    /// Remove every child of a node
    pub fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        let children = self.node(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Get an attribute from an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attribute(name))
    }

    /// Remove an attribute from an element
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        self.element_mut(id)?.remove_attribute(name);
        Ok(())
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.element_mut(id)?.add_class(class);
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.element_mut(id)?.remove_class(class);
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.clear_children(id)?;
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t)?;
        }
        Ok(())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        if let Some(text) = node.as_text() {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// Inclusive ancestry check: true if `node` is `ancestor` or lies beneath it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return self.is_live(id);
            }
            cur = self.parent(id);
        }
        false
    }

    /// Descendants in pre-order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_contains() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();

        assert!(tree.contains(div, span));
        assert!(tree.contains(span, span));
        assert!(!tree.contains(span, div));
        assert_eq!(tree.parent(span), Some(div));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        tree.append_child(a, b).unwrap();

        let err = tree.append_child(b, a).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: b, child: a });
    }

    #[test]
    fn test_remove_frees_subtree() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let li = tree.create_element("li");
        tree.append_child(tree.root(), ul).unwrap();
        tree.append_child(ul, li).unwrap();
        assert_eq!(tree.live_count(), 3);

        tree.remove(ul).unwrap();
        assert!(!tree.is_live(ul));
        assert!(!tree.is_live(li));
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.remove(ul), Err(DomError::NotFound(ul)));
    }

    #[test]
    fn test_freed_slots_reused_and_stale_ids_miss() {
        let mut tree = DomTree::new();
        let old = tree.create_element("li");
        tree.append_child(tree.root(), old).unwrap();
        tree.remove(old).unwrap();

        let new = tree.create_element("li");
        assert_ne!(old, new);
        assert_eq!(tree.slot_count(), 2);
        assert!(tree.is_live(new));
        assert!(!tree.is_live(old));
        assert_eq!(tree.set_attribute(old, "id", "x"), Err(DomError::NotFound(old)));
    }

    #[test]
    fn test_remount_keeps_arena_bounded() {
        let mut tree = DomTree::new();
        let list = tree.create_element("ul");
        tree.append_child(tree.root(), list).unwrap();

        for round in 0..1000 {
            tree.clear_children(list).unwrap();
            for _ in 0..(round % 5) {
                let li = tree.create_element("li");
                tree.set_text_content(li, "entry").unwrap();
                tree.append_child(list, li).unwrap();
            }
        }
        // root, ul, and at most four li + text pairs
        assert!(tree.slot_count() <= 10, "arena grew to {}", tree.slot_count());
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        tree.set_text_content(p, "old").unwrap();
        tree.set_text_content(p, "new").unwrap();
        assert_eq!(tree.text_content(p), "new");
        assert_eq!(tree.children(p).len(), 1);

        tree.set_text_content(p, "").unwrap();
        assert!(tree.children(p).is_empty());
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let c = tree.create_element("span");
        tree.append_child(a, c).unwrap();
        tree.append_child(b, c).unwrap();

        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
    }
}
