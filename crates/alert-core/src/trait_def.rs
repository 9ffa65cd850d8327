//! The HazardSource trait definition.

use async_trait::async_trait;

use crate::model::Alert;
use crate::prefs::Preferences;

/// Parameters for one fetch against a hazard feed.
///
/// Built by the aggregation engine from sanitized coordinates and the
/// current preferences; coordinates here are always finite and in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    /// Restrict results to the fixed regional bounding box.
    pub regional_only: bool,
}

impl SourceQuery {
    /// Create a query with no region restriction.
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
            regional_only: false,
        }
    }
}

/// A trait for fetching normalized alerts from one upstream hazard feed.
///
/// Implementations range from live HTTP catalogs to fixed regional sample
/// feeds. This trait is object-safe and can be used with
/// `Arc<dyn HazardSource>`.
///
/// `fetch` must never fail past this boundary: on any network, parse, or
/// timeout problem the adapter logs the cause and returns an empty list or
/// its own deterministic fallback. Returned alerts carry `is_read: false`
/// and `is_test: false`.
#[async_trait]
pub trait HazardSource: Send + Sync {
    /// Fetch alerts near the query point.
    async fn fetch(&self, query: &SourceQuery) -> Vec<Alert>;

    /// Get a human-readable name for this feed.
    fn name(&self) -> &str;

    /// Whether this feed should run at all under the given preferences.
    ///
    /// Default implementation always returns true; feeds gated by a
    /// category flag override this.
    fn enabled(&self, preferences: &Preferences) -> bool {
        let _ = preferences;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HazardType, Severity};

    struct OneShotFeed;

    #[async_trait]
    impl HazardSource for OneShotFeed {
        async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
            vec![Alert {
                id: "one-shot-1".to_string(),
                title: "Flood Warning".to_string(),
                description: "Test feed entry".to_string(),
                hazard: HazardType::Flood,
                severity: Severity::Medium,
                latitude: query.latitude,
                longitude: query.longitude,
                location: "Near the query point".to_string(),
                timestamp: 0,
                source: "OneShotFeed".to_string(),
                source_url: None,
                recommendations: None,
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            }]
        }

        fn name(&self) -> &str {
            "OneShotFeed"
        }
    }

    #[tokio::test]
    async fn test_trait_object_usage() {
        let feed: std::sync::Arc<dyn HazardSource> = std::sync::Arc::new(OneShotFeed);
        let query = SourceQuery::new(13.75, 100.5, 500.0);

        let alerts = feed.fetch(&query).await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].latitude, 13.75);
        assert!(feed.enabled(&Preferences::default()));
    }
}
