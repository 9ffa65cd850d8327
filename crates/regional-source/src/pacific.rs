//! Static feed of Pacific-basin hazards.

use alert_core::{async_trait, geo, now_ms, Alert, HazardSource, HazardType, Severity, SourceQuery};
use tracing::debug;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Static Pacific-basin disaster feed. Suppressed entirely when the caller
/// restricts results to the regional bounding box, since every candidate
/// lies outside it; otherwise filtered by distance from the query point.
#[derive(Debug, Clone, Default)]
pub struct PacificFeed;

impl PacificFeed {
    /// Create a new feed.
    pub fn new() -> Self {
        Self
    }

    /// The fixed candidate set, stamped relative to `now_ms`.
    pub fn candidates(now_ms: i64) -> Vec<Alert> {
        vec![
            Alert {
                id: "pacific-typhoon-manila".to_string(),
                title: "Typhoon Warning".to_string(),
                description: "Typhoon approaching with strong winds and heavy rainfall expected."
                    .to_string(),
                hazard: HazardType::Storm,
                severity: Severity::High,
                latitude: 14.5995,
                longitude: 120.9842,
                location: "Manila, Philippines".to_string(),
                timestamp: now_ms - 30 * MINUTE_MS,
                source: "Pacific Disaster Center".to_string(),
                source_url: Some("https://www.pdc.org/".to_string()),
                recommendations: Some(
                    "Secure loose objects, prepare emergency supplies, and follow evacuation orders if issued."
                        .to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "pacific-volcano-agung".to_string(),
                title: "Volcanic Activity".to_string(),
                description: "Increased volcanic activity detected with potential for eruption."
                    .to_string(),
                hazard: HazardType::Volcano,
                severity: Severity::Medium,
                latitude: -8.2675,
                longitude: 115.3755,
                location: "Mount Agung, Bali, Indonesia".to_string(),
                timestamp: now_ms - HOUR_MS,
                source: "Pacific Disaster Center".to_string(),
                source_url: Some("https://www.pdc.org/".to_string()),
                recommendations: Some(
                    "Monitor official announcements and be prepared to evacuate if necessary."
                        .to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "pacific-earthquake-tokyo".to_string(),
                title: "M5.8 Earthquake".to_string(),
                description: "Moderate earthquake detected with potential for aftershocks."
                    .to_string(),
                hazard: HazardType::Earthquake,
                severity: Severity::Medium,
                latitude: 35.6762,
                longitude: 139.6503,
                location: "Tokyo, Japan".to_string(),
                timestamp: now_ms - 2 * HOUR_MS,
                source: "Pacific Disaster Center".to_string(),
                source_url: Some("https://www.pdc.org/".to_string()),
                recommendations: Some(
                    "Be alert for aftershocks and check structures for damage.".to_string(),
                ),
                magnitude: Some(5.8),
                depth: Some(10.0),
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "pacific-flood-yangtze".to_string(),
                title: "Major Flooding".to_string(),
                description:
                    "Severe flooding affecting multiple regions with displacement of populations."
                        .to_string(),
                hazard: HazardType::Flood,
                severity: Severity::High,
                latitude: 23.8103,
                longitude: 90.4125,
                location: "Yangtze River Basin, China".to_string(),
                timestamp: now_ms - 25 * DAY_MS,
                source: "Pacific Disaster Center".to_string(),
                source_url: Some("https://www.pdc.org/".to_string()),
                recommendations: Some("Follow evacuation orders and avoid flooded areas.".to_string()),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "pacific-cyclone-bengal".to_string(),
                title: "Cyclone Warning".to_string(),
                description:
                    "Tropical cyclone approaching with destructive winds and storm surge."
                        .to_string(),
                hazard: HazardType::Storm,
                severity: Severity::High,
                latitude: 17.385,
                longitude: 78.4867,
                location: "Bay of Bengal, India".to_string(),
                timestamp: now_ms - 15 * DAY_MS,
                source: "Pacific Disaster Center".to_string(),
                source_url: Some("https://www.pdc.org/".to_string()),
                recommendations: Some(
                    "Evacuate coastal areas and seek shelter in sturdy buildings.".to_string(),
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
impl HazardSource for PacificFeed {
    async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
        if query.regional_only {
            return Vec::new();
        }

        let alerts: Vec<Alert> = Self::candidates(now_ms())
            .into_iter()
            .filter(|a| {
                geo::is_within_radius(
                    query.latitude,
                    query.longitude,
                    a.latitude,
                    a.longitude,
                    query.radius_km,
                )
            })
            .collect();
        debug!("PacificFeed matched {} candidates", alerts.len());
        alerts
    }

    fn name(&self) -> &str {
        "PacificFeed"
    }
}
