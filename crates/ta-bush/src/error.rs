use ta_core::TaError;
use ta_network::NetworkError;
use thiserror::Error;

/// Errors raised while constructing a bush.
///
/// Only contract violations are errors.  Unreachable destinations and
/// non-convergence are reported through `tracing` and the query methods.
#[derive(Debug, Error, PartialEq)]
pub enum BushError {
    #[error(transparent)]
    Core(#[from] TaError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

pub type BushResult<T> = Result<T, BushError>;
