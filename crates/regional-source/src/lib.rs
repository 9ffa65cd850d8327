//! Static regional hazard feeds.
//!
//! Three feeds with fixed candidate sets, so the client always has example
//! content even without live network access:
//!
//! - [`NationalFeed`] - hazards inside the reference country, radius-filtered
//! - [`PacificFeed`] - Pacific-basin hazards, suppressed under the
//!   region-only preference, otherwise radius-filtered
//! - [`ReliefFeed`] - humanitarian-relief bulletins, suppressed under the
//!   region-only preference
//!
//! Each is a pluggable stand-in for a real feed: an implementer can swap in
//! a live [`alert_core::HazardSource`] without touching the engine.
//! Candidate ids are stable slugs so notification dedup behaves the same
//! way it does for live feeds; timestamps are offsets from the current
//! time so the candidates always look current.

mod national;
mod pacific;
mod relief;

pub use national::NationalFeed;
pub use pacific::PacificFeed;
pub use relief::ReliefFeed;
