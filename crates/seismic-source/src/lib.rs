//! Earthquake-catalog feed adapter.
//!
//! [`SeismicSource`] queries a public FDSN-style event catalog (GeoJSON
//! feature collection) for recent earthquakes around a point and maps them
//! into the normalized [`alert_core::Alert`] shape. Failures never escape
//! the adapter: the catalog being unreachable degrades to a small fixed
//! offline sample tagged with a distinguishable source string so the UI can
//! flag degraded data.
//!
//! # Example
//!
//! ```no_run
//! use alert_core::{HazardSource, SourceQuery};
//! use seismic_source::{SeismicConfig, SeismicSource};
//!
//! # async fn example() {
//! let source = SeismicSource::new(SeismicConfig::default());
//! let alerts = source.fetch(&SourceQuery::new(13.7563, 100.5018, 300.0)).await;
//! # }
//! ```

mod api_types;
mod config;
mod source;

pub use config::SeismicConfig;
pub use source::{severity_for_magnitude, SeismicSource, FALLBACK_SOURCE};
