//! Error types
//!
//! Configuration errors fail fast; attach errors are per host; data errors
//! never leave the engine and degrade to an empty result set.

use fif_dom::{DomError, NodeId};
use fif_net::NetError;

/// Invalid widget options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Widget name is required (templates.form.name)")]
    MissingName,

    #[error("Input name is required (templates.form.inputName)")]
    MissingInputName,

    #[error("Invalid data kind {0:?}: expected array, object-list or remote")]
    InvalidDataKind(String),

    #[error("Display field (dataConfig.valueName) is required for object-list sources")]
    MissingDisplayField,

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid options document: {0}")]
    Parse(String),
}

/// Failure to attach to one host element
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachError {
    #[error("Host {0} does not exist")]
    HostNotFound(NodeId),

    #[error("Host {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Host {0} already carries a widget")]
    AlreadyAttached(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Runtime data problems; logged and treated as zero results
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("No data available")]
    Unavailable,

    #[error("Fetch failed: {0}")]
    Fetch(#[from] NetError),

    #[error("Unexpected record shape at index {index}: {reason}")]
    Shape { index: usize, reason: String },
}
