//! Core types and traits for the Vigil disaster-alert client.
//!
//! This crate provides the shared vocabulary for every hazard feed and for
//! the aggregation engine. It defines:
//!
//! - [`Alert`] - The normalized hazard event record
//! - [`HazardType`] / [`Severity`] - Exhaustive hazard and severity enums
//! - [`HazardSource`] - The trait every upstream feed adapter implements
//! - [`SourceQuery`] - The per-fetch query an adapter receives
//! - [`Preferences`] - The user-preference shape consumed read-only
//! - [`SourceError`] - Error types for adapter internals
//! - [`geo`] - Pure geographic containment and distance functions
//!
//! # Example
//!
//! ```rust
//! use alert_core::{Alert, HazardSource, SourceQuery};
//! use async_trait::async_trait;
//!
//! struct EmptyFeed;
//!
//! #[async_trait]
//! impl HazardSource for EmptyFeed {
//!     async fn fetch(&self, _query: &SourceQuery) -> Vec<Alert> {
//!         Vec::new()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "EmptyFeed"
//!     }
//! }
//! ```

pub mod geo;

mod error;
mod model;
mod prefs;
mod trait_def;

pub use error::SourceError;
pub use model::{now_ms, Alert, HazardType, Severity};
pub use prefs::Preferences;
pub use trait_def::{HazardSource, SourceQuery};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

/// Reference coordinate used whenever a caller supplies unusable input
/// (Bangkok, the reference deployment's capital).
pub const DEFAULT_COORDINATES: (f64, f64) = (13.7563, 100.5018);
