//! Static feed of hazards inside the reference country.

use alert_core::{async_trait, geo, now_ms, Alert, HazardSource, HazardType, Severity, SourceQuery};
use tracing::debug;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Static national-authority feed (meteorological department and disaster
/// prevention bulletins), filtered by distance from the query point.
#[derive(Debug, Clone, Default)]
pub struct NationalFeed;

impl NationalFeed {
    /// Create a new feed.
    pub fn new() -> Self {
        Self
    }

    /// The fixed candidate set, stamped relative to `now_ms`.
    pub fn candidates(now_ms: i64) -> Vec<Alert> {
        vec![
            Alert {
                id: "national-flood-central".to_string(),
                title: "Flood Warning".to_string(),
                description: "Heavy monsoon rains have caused flooding in central Thailand."
                    .to_string(),
                hazard: HazardType::Flood,
                severity: Severity::Medium,
                latitude: 13.7563,
                longitude: 100.5018,
                location: "Central Thailand".to_string(),
                timestamp: now_ms - HOUR_MS,
                source: "Thai Meteorological Department".to_string(),
                source_url: Some("https://www.tmd.go.th/".to_string()),
                recommendations: Some(
                    "Avoid flood-prone areas. Follow evacuation orders if issued.".to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "national-landslide-north".to_string(),
                title: "Landslide Risk".to_string(),
                description:
                    "Heavy rainfall has increased the risk of landslides in northern Thailand."
                        .to_string(),
                hazard: HazardType::Landslide,
                severity: Severity::High,
                latitude: 18.7883,
                longitude: 98.9853,
                location: "Northern Thailand".to_string(),
                timestamp: now_ms - 2 * HOUR_MS,
                source: "Department of Disaster Prevention and Mitigation".to_string(),
                source_url: Some("https://www.disaster.go.th/".to_string()),
                recommendations: Some(
                    "Avoid hillside areas. Be prepared to evacuate if necessary.".to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "national-storm-south".to_string(),
                title: "Severe Storm".to_string(),
                description:
                    "Tropical storm bringing heavy rainfall and strong winds to southern provinces."
                        .to_string(),
                hazard: HazardType::Storm,
                severity: Severity::Medium,
                latitude: 7.8804,
                longitude: 98.3923,
                location: "Southern Thailand".to_string(),
                timestamp: now_ms - 23 * DAY_MS,
                source: "Thai Meteorological Department".to_string(),
                source_url: Some("https://www.tmd.go.th/".to_string()),
                recommendations: Some(
                    "Secure loose objects and stay indoors during peak storm conditions."
                        .to_string(),
                ),
                magnitude: None,
                depth: None,
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "national-drought-northeast".to_string(),
                title: "Drought Alert".to_string(),
                description: "Water shortage affecting agricultural areas in northeastern Thailand."
                    .to_string(),
                hazard: HazardType::Drought,
                severity: Severity::Low,
                latitude: 16.4331,
                longitude: 102.8236,
                location: "Northeastern Thailand".to_string(),
                timestamp: now_ms - 5 * DAY_MS,
                source: "Department of Disaster Prevention and Mitigation".to_string(),
                source_url: Some("https://www.disaster.go.th/".to_string()),
                recommendations: Some(
                    "Conserve water and follow local water usage restrictions.".to_string(),
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
impl HazardSource for NationalFeed {
    async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
        let candidates = Self::candidates(now_ms());
        let alerts: Vec<Alert> = candidates
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
        debug!("NationalFeed matched {} candidates", alerts.len());
        alerts
    }

    fn name(&self) -> &str {
        "NationalFeed"
    }
}
