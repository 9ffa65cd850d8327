//! Error types for aggregation and dispatch.

use alert_store::StoreError;
use thiserror::Error;

use crate::gateway::DispatchError;

/// Errors that can occur while running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Every enabled hazard source failed to produce a result this attempt.
    #[error("all hazard sources failed")]
    AllSourcesFailed,

    /// Startup state could not be read from the durable store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The notification gateway rejected a send.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}
