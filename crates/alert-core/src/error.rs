//! Error types for hazard-source internals.

use thiserror::Error;

/// Errors a feed adapter can hit while talking to its upstream.
///
/// These never cross the [`crate::HazardSource`] boundary; adapters catch
/// them, log, and degrade to an empty or fallback list.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The upstream could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The upstream answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request ran past the adapter's deadline.
    #[error("request timed out")]
    Timeout,
}
