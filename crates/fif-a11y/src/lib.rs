//! fif Accessibility
//!
//! Accessibility primitives for Find-It-Fast widgets.
//!
//! Features:
//! - ARIA roles, states, properties
//! - Live region announcement queue

pub mod aria;
pub mod live_region;

pub use aria::{AriaRole, AriaState, AriaAttributes, LiveRegionMode};
pub use live_region::{LiveRegionConfig, LiveRegionTracker, LiveRegionChange};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Node {0} is not a registered live region")]
    NotALiveRegion(u64),
}
