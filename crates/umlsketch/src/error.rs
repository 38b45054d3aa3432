//! Error types for umlsketch operations.
//!
//! The layout and geometry functions never fail; errors only come from the
//! editor model (bad references, self connections), persistence and
//! configuration.

use std::io;

use thiserror::Error;

use umlsketch_core::identifier::NodeId;

/// The main error type for umlsketch operations.
#[derive(Debug, Error)]
pub enum UmlSketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid diagram data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown node `{0}`")]
    UnknownNode(NodeId),

    #[error("Node `{0}` cannot be connected to itself")]
    SelfConnection(NodeId),

    #[error("Nothing to arrange: the diagram has no nodes")]
    EmptyDiagram,

    #[error("No saved diagram under key `{0}`")]
    MissingKey(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
