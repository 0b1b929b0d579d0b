//! DOM Node
//!
//! Nodes keep their children as an ordered id list; element attributes
//! are stored in insertion order so serialization is stable.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub(crate) parent: NodeId,
    /// Ordered children
    pub(crate) children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
    /// Set once the node's subtree has been removed from the tree
    pub(crate) removed: bool,
    /// Bumped every time the slot is freed
    pub(crate) generation: u32,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            children: Vec::new(),
            data,
            removed: false,
            generation: 0,
        }
    }

    /// Parent node, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent.is_valid().then_some(self.parent)
    }

    /// Child ids in document order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element data: tag name plus ordered attributes
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute, returning the previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            return Some(std::mem::replace(&mut slot.1, value.to_string()));
        }
        self.attrs.push((name.to_string(), value.to_string()));
        None
    }

    /// Remove attribute, returning its value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Whitespace-separated class list
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class; returns false if already present
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let value = match self.get_attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute("class", &value);
        true
    }

    /// Remove a class; drops the attribute when the list becomes empty
    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let rest: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        if rest.is_empty() {
            self.remove_attribute("class");
        } else {
            let joined = rest.join(" ");
            self.set_attribute("class", &joined);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_replace_keeps_order() {
        let mut el = ElementData::new("INPUT");
        assert_eq!(el.tag, "input");
        el.set_attribute("type", "search");
        el.set_attribute("id", "q");
        assert_eq!(el.set_attribute("type", "text"), Some("search".to_string()));

        let names: Vec<_> = el.attributes().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["type", "id"]);
    }

    #[test]
    fn test_class_list() {
        let mut el = ElementData::new("div");
        assert!(el.add_class("a"));
        assert!(el.add_class("b"));
        assert!(!el.add_class("a"));
        assert_eq!(el.get_attribute("class"), Some("a b"));

        assert!(el.remove_class("a"));
        assert!(el.remove_class("b"));
        assert!(!el.has_attribute("class"));
    }
}
