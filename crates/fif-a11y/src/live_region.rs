//! Live Region Support
//!
//! ARIA live regions for dynamic content announcements.

use std::collections::VecDeque;

use crate::A11yError;
use crate::aria::LiveRegionMode;

/// Live region configuration
#[derive(Debug, Clone, Default)]
pub struct LiveRegionConfig {
    /// Politeness level; `Off` regions are never registered
    pub politeness: LiveRegionMode,
}

impl LiveRegionConfig {
    /// Create polite live region
    pub fn polite() -> Self {
        Self { politeness: LiveRegionMode::Polite }
    }
}

/// A queued announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegionChange {
    /// ID of the live region
    pub region_id: u64,
    /// Text to announce
    pub text: String,
    /// Politeness level
    pub politeness: LiveRegionMode,
    /// Monotonic order of the announcement
    pub sequence: u64,
}

/// Live region tracker
#[derive(Debug)]
pub struct LiveRegionTracker {
    /// Registered live regions by node ID
    regions: Vec<RegisteredRegion>,
    /// Pending changes to announce
    pending: VecDeque<LiveRegionChange>,
    /// Maximum pending queue size
    max_pending: usize,
    next_sequence: u64,
}

#[derive(Debug)]
struct RegisteredRegion {
    node_id: u64,
    config: LiveRegionConfig,
    /// Last text written to the region
    last_content: String,
}

impl Default for LiveRegionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveRegionTracker {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            pending: VecDeque::new(),
            max_pending: 100,
            next_sequence: 0,
        }
    }

    /// Register a live region
    pub fn register(&mut self, node_id: u64, config: LiveRegionConfig) {
        self.regions.retain(|r| r.node_id != node_id);

        if config.politeness != LiveRegionMode::Off {
            self.regions.push(RegisteredRegion {
                node_id,
                config,
                last_content: String::new(),
            });
        }
    }

    /// Unregister a live region and drop its queued announcements
    pub fn unregister(&mut self, node_id: u64) {
        self.regions.retain(|r| r.node_id != node_id);
        self.pending.retain(|c| c.region_id != node_id);
    }

    /// Last text written to a region
    pub fn content(&self, node_id: u64) -> Option<&str> {
        self.regions.iter()
            .find(|r| r.node_id == node_id)
            .map(|r| r.last_content.as_str())
    }

    /// Clear and rewrite a region's text, queueing exactly one announcement.
    ///
    /// Identical consecutive texts are still announced: the region is emptied
    /// before each write.
    pub fn announce(&mut self, node_id: u64, text: &str) -> Result<(), A11yError> {
        let region = self.regions.iter_mut()
            .find(|r| r.node_id == node_id)
            .ok_or(A11yError::NotALiveRegion(node_id))?;

        region.last_content.clear();
        region.last_content.push_str(text);

        let change = LiveRegionChange {
            region_id: node_id,
            text: text.to_string(),
            politeness: region.config.politeness,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.queue_change(change);
        Ok(())
    }

    fn queue_change(&mut self, change: LiveRegionChange) {
        self.pending.push_back(change);
        while self.pending.len() > self.max_pending {
            self.pending.pop_front();
        }
    }

    /// Drain every pending change in announcement order
    pub fn drain(&mut self) -> Vec<LiveRegionChange> {
        self.pending.drain(..).collect()
    }
}
