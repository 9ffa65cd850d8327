//! Alert aggregation engine for the Vigil disaster-alert client.
//!
//! This crate provides the [`AggregationEngine`] type which coordinates one
//! fetch→merge→notify cycle over every configured hazard feed, and the
//! [`NotificationDispatcher`] which turns the merged list into at most one
//! local notification per alert.
//!
//! # Features
//!
//! - Fans out to all enabled feeds concurrently with a per-feed deadline
//! - Merges, deduplicates, and filters results against user preferences
//! - Carries session-scoped test alerts at the head of the list
//! - Sends at most one notification per alert, grouping per-type bursts
//! - Persists the notified-id set and notification history across restarts
//! - Degrades instead of failing: bad input, dead feeds, and store errors
//!   all leave the last-known list standing
//!
//! # Architecture
//!
//! ```text
//! fetch_alerts(lat, lon)            (UI, timers: same entry point)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AGGREGATION ENGINE                       │
//! │                                                             │
//! │  1. Single-flight + debounce gate                           │
//! │         ↓                                                   │
//! │  2. Fetch all enabled feeds concurrently (join barrier)     │
//! │     • seismic catalog  • weather feed  • regional feeds     │
//! │         ↓                                                   │
//! │  3. Merge: category/severity filters, dedup, sort,          │
//! │     carry forward test alerts                               │
//! │         ↓                                                   │
//! │  4. Dispatch: group new high-severity alerts per type,      │
//! │     send via NotificationGateway, persist ids + history     │
//! │         ↓                                                   │
//! │  5. Publish list, stamp last-fetch time                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use aggregator::{AggregationEngine, LoggingGateway};
//! use alert_store::Store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::connect("sqlite:vigil.db?mode=rwc").await?;
//!     store.migrate().await?;
//!
//!     let engine = AggregationEngine::from_env(LoggingGateway::new()).with_store(store);
//!     engine.load().await?;
//!
//!     engine.fetch_alerts(13.7563, 100.5018).await;
//!     for alert in engine.alerts().await {
//!         println!("{} [{}] {}", alert.severity, alert.hazard, alert.title);
//!     }
//!     Ok(())
//! }
//! ```

mod dispatcher;
mod engine;
mod error;
mod gateway;
mod preferences;
mod retry;
mod test_alert;

// Public exports
pub use dispatcher::{DispatchOutcome, NotificationDispatcher, DEFAULT_RECENCY_WINDOW_MS};
pub use engine::{AggregationEngine, EngineConfig, EnginePhase};
pub use error::EngineError;
pub use gateway::{
    DispatchError, LoggingGateway, NoOpGateway, Notification, NotificationGateway, NotificationId,
    NotificationPayload, Permission,
};
pub use preferences::PreferenceStore;
pub use retry::RetryPolicy;
pub use test_alert::build_test_alert;

// Re-export commonly used types from dependencies
pub use alert_core::{Alert, HazardSource, HazardType, Preferences, Severity, SourceQuery};
pub use alert_store::Store;
