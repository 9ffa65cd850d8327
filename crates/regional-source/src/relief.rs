//! Static feed of humanitarian-relief bulletins.

use alert_core::{async_trait, now_ms, Alert, HazardSource, HazardType, Severity, SourceQuery};
use tracing::debug;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Static humanitarian-relief bulletin feed. Bulletins describe wide areas
/// rather than points, so the feed is not radius-filtered; it is suppressed
/// entirely under the region-only preference since every bulletin covers
/// territory outside the regional bounding box.
#[derive(Debug, Clone, Default)]
pub struct ReliefFeed;

impl ReliefFeed {
    /// Create a new feed.
    pub fn new() -> Self {
        Self
    }

    /// The fixed candidate set, stamped relative to `now_ms`.
    pub fn candidates(now_ms: i64) -> Vec<Alert> {
        vec![
            Alert {
                id: "relief-flood-vietnam".to_string(),
                title: "Severe Flooding".to_string(),
                description:
                    "Widespread flooding affecting multiple regions with displacement of populations."
                        .to_string(),
                hazard: HazardType::Flood,
                severity: Severity::High,
                latitude: 19.076,
                longitude: 105.3312,
                location: "Central Vietnam".to_string(),
                timestamp: now_ms - DAY_MS,
                source: "ReliefWeb".to_string(),
                source_url: Some("https://reliefweb.int/".to_string()),
                recommendations: Some(
                    "Seek higher ground and follow evacuation instructions from local authorities."
                        .to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "relief-drought-cambodia".to_string(),
                title: "Drought Warning".to_string(),
                description:
                    "Prolonged drought conditions affecting agricultural production and water supplies."
                        .to_string(),
                hazard: HazardType::Drought,
                severity: Severity::Medium,
                latitude: 15.87,
                longitude: 104.78,
                location: "Northeast Cambodia".to_string(),
                timestamp: now_ms - 2 * DAY_MS,
                source: "ReliefWeb".to_string(),
                source_url: Some("https://reliefweb.int/".to_string()),
                recommendations: Some(
                    "Conserve water and follow guidance from local authorities.".to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "relief-landslide-nepal".to_string(),
                title: "Landslide Emergency".to_string(),
                description:
                    "Multiple landslides triggered by heavy rainfall have blocked roads and damaged homes."
                        .to_string(),
                hazard: HazardType::Landslide,
                severity: Severity::High,
                latitude: 27.7172,
                longitude: 85.324,
                location: "Central Nepal".to_string(),
                timestamp: now_ms - 20 * DAY_MS,
                source: "ReliefWeb".to_string(),
                source_url: Some("https://reliefweb.int/".to_string()),
                recommendations: Some("Avoid hillside areas and follow evacuation orders.".to_string()),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "relief-wildfire-nsw".to_string(),
                title: "Wildfire Alert".to_string(),
                description:
                    "Large wildfire spreading rapidly due to dry conditions and strong winds."
                        .to_string(),
                hazard: HazardType::Wildfire,
                severity: Severity::Medium,
                latitude: -33.8688,
                longitude: 151.2093,
                location: "New South Wales, Australia".to_string(),
                timestamp: now_ms - 10 * DAY_MS,
                source: "ReliefWeb".to_string(),
                source_url: Some("https://reliefweb.int/".to_string()),
                recommendations: Some(
                    "Follow evacuation orders and stay informed through local emergency services."
                        .to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
        ]
    }
}

#[async_trait]
impl HazardSource for ReliefFeed {
    async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
        if query.regional_only {
            return Vec::new();
        }
        let alerts = Self::candidates(now_ms());
        debug!("ReliefFeed returned {} bulletins", alerts.len());
        alerts
    }

    fn name(&self) -> &str {
        "ReliefFeed"
    }
}
