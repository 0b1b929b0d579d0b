//! Status announcements
//!
//! One polite live region per document, shared by every instance. The
//! region is a `div` prepended to `body` holding a single `span` whose text
//! is rewritten for each result set.

use fif_a11y::{AriaRole, LiveRegionChange, LiveRegionConfig, LiveRegionMode, LiveRegionTracker};
use fif_dom::{Document, DomResult, NodeId};

use crate::config::Messages;

/// Element id of the shared live region
pub const LIVE_REGION_ID: &str = "findItFast-live-region";

#[derive(Debug, Default)]
pub struct AnnouncementChannel {
    region: Option<Region>,
    tracker: LiveRegionTracker,
}

#[derive(Debug, Clone, Copy)]
struct Region {
    node: NodeId,
    span: NodeId,
    /// Created by us, so ours to remove
    owned: bool,
}

impl AnnouncementChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the region, or adopt one already in the document
    pub fn ensure(&mut self, doc: &mut Document, sr_hidden_class: &str) -> DomResult<NodeId> {
        if let Some(region) = self.region.filter(|r| doc.tree.is_live(r.node)) {
            return Ok(region.node);
        }

        let region = match doc.get_element_by_id(LIVE_REGION_ID) {
            Some(node) => {
                let existing = doc.tree.children(node).iter().copied()
                    .find(|c| doc.tree.element(*c).is_some_and(|e| e.tag == "span"));
                let span = match existing {
                    Some(span) => span,
                    None => doc.append_element(node, "span")?,
                };
                tracing::debug!("adopting existing live region {}", node);
                Region { node, span, owned: false }
            }
            None => {
                let node = doc.tree.create_element("div");
                doc.tree.set_attribute(node, "id", LIVE_REGION_ID)?;
                doc.tree.set_attribute(node, "aria-live", LiveRegionMode::Polite.as_str())?;
                doc.tree.set_attribute(node, "role", AriaRole::Status.as_str())?;
                if !sr_hidden_class.is_empty() {
                    doc.tree.add_class(node, sr_hidden_class)?;
                }
                let span = doc.tree.create_element("span");
                doc.tree.append_child(node, span)?;
                let body = doc.body();
                doc.tree.prepend_child(body, node)?;
                tracing::debug!("created live region {}", node);
                Region { node, span, owned: true }
            }
        };

        self.tracker.register(region.node.as_u64(), LiveRegionConfig::polite());
        self.region = Some(region);
        Ok(region.node)
    }

    pub fn node(&self) -> Option<NodeId> {
        self.region.map(|r| r.node)
    }

    /// Announce the status message for `count` results
    pub fn announce(&mut self, doc: &mut Document, count: usize, messages: &Messages) -> DomResult<()> {
        let Some(region) = self.region else { return Ok(()) };
        let text = messages.for_count(count);

        doc.tree.set_text_content(region.span, "")?;
        doc.tree.set_text_content(region.span, text)?;

        if let Err(err) = self.tracker.announce(region.node.as_u64(), text) {
            tracing::warn!("announcement dropped: {}", err);
        }
        Ok(())
    }

    /// Current region text
    pub fn text(&self, doc: &Document) -> Option<String> {
        self.region.map(|r| doc.tree.text_content(r.span))
    }

    /// Remove the region if we created it
    pub fn remove(&mut self, doc: &mut Document) -> DomResult<()> {
        let Some(region) = self.region.take() else { return Ok(()) };
        self.tracker.unregister(region.node.as_u64());
        if region.owned && doc.tree.is_live(region.node) {
            doc.tree.remove(region.node)?;
            tracing::debug!("removed live region {}", region.node);
        }
        Ok(())
    }

    /// Pending announcements, oldest first
    pub fn drain(&mut self) -> Vec<LiveRegionChange> {
        self.tracker.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_is_idempotent() {
        let mut doc = Document::default();
        let mut ch = AnnouncementChannel::new();
        let a = ch.ensure(&mut doc, "sr-only").unwrap();
        let b = ch.ensure(&mut doc, "sr-only").unwrap();
        assert_eq!(a, b);
        assert_eq!(doc.query_selector_all("#findItFast-live-region").len(), 1);
        assert_eq!(doc.tree.children(doc.body()).first(), Some(&a));
        assert_eq!(
            doc.tree.outer_html(a),
            "<div id=\"findItFast-live-region\" aria-live=\"polite\" role=\"status\" class=\"sr-only\"><span></span></div>"
        );
    }

    #[test]
    fn test_repeated_message_announced_each_time() {
        let mut doc = Document::default();
        let mut ch = AnnouncementChannel::new();
        ch.ensure(&mut doc, "sr-only").unwrap();

        let msgs = Messages::default();
        ch.announce(&mut doc, 0, &msgs).unwrap();
        ch.announce(&mut doc, 0, &msgs).unwrap();

        let changes = ch.drain();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.text == msgs.none));
        assert_eq!(ch.text(&doc).as_deref(), Some(msgs.none.as_str()));
    }

    #[test]
    fn test_adopted_region_survives_remove() {
        let mut doc = Document::default();
        let body = doc.body();
        let existing = doc.append_element(body, "div").unwrap();
        doc.tree.set_attribute(existing, "id", LIVE_REGION_ID).unwrap();

        let mut ch = AnnouncementChannel::new();
        assert_eq!(ch.ensure(&mut doc, "sr-only").unwrap(), existing);
        ch.remove(&mut doc).unwrap();
        assert!(doc.tree.is_live(existing));
        assert_eq!(ch.node(), None);
    }

    #[test]
    fn test_owned_region_removed() {
        let mut doc = Document::default();
        let mut ch = AnnouncementChannel::new();
        let node = ch.ensure(&mut doc, "").unwrap();
        ch.announce(&mut doc, 1, &Messages::default()).unwrap();
        ch.remove(&mut doc).unwrap();
        assert!(!doc.tree.is_live(node));
        assert!(ch.drain().is_empty());
    }
}
