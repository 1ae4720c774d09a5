//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `TaError` as one variant
//! via `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `ta-core` and a common base for sub-crates.
#[derive(Debug, Error, PartialEq)]
pub enum TaError {
    #[error("node {node} out of range for a network of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    #[error("invalid demand {demand} for destination {node}")]
    InvalidDemand { node: NodeId, demand: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `ta-*` crates.
pub type TaResult<T> = Result<T, TaError>;
