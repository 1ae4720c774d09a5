//! Network error type.

use thiserror::Error;

use ta_core::NodeId;

/// Errors produced by `ta-network`.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("node {node} not found in a network of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    #[error("arc {from} -> {to} has an invalid cost function: {reason}")]
    InvalidCost { from: NodeId, to: NodeId, reason: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
