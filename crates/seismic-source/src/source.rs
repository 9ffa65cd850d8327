//! SeismicSource implementation against an FDSN-style event catalog.

use alert_core::{
    async_trait, geo, Alert, HazardSource, HazardType, Preferences, Severity, SourceError,
    SourceQuery,
};
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{Feature, FeatureCollection};
use crate::config::SeismicConfig;

/// Source string carried by the offline fallback entries, distinguishable
/// from the live catalog so the UI can indicate degraded data.
pub const FALLBACK_SOURCE: &str = "Seismic Catalog (offline data)";

const LIVE_SOURCE: &str = "USGS Earthquake Information Center";
const RECOMMENDATIONS: &str =
    "If indoors, drop, cover, and hold on. If outdoors, stay away from buildings.";

/// Map a catalog magnitude to an alert severity.
pub fn severity_for_magnitude(magnitude: f64) -> Severity {
    if magnitude >= 6.0 {
        Severity::High
    } else if magnitude >= 4.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// A feed adapter that queries a public earthquake catalog.
///
/// Queries cover the configured lookback window above the configured
/// minimum magnitude, within the caller's radius of the query point.
pub struct SeismicSource {
    client: Client,
    config: SeismicConfig,
}

impl SeismicSource {
    /// Create a new adapter with the given configuration.
    pub fn new(config: SeismicConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Create an adapter from environment variables.
    ///
    /// See [`SeismicConfig::from_env`] for the recognized variables.
    pub fn from_env() -> Self {
        Self::new(SeismicConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &SeismicConfig {
        &self.config
    }

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Vec<Alert>, SourceError> {
        let end_time = Utc::now();
        let start_time = end_time - ChronoDuration::days(self.config.lookback_days);

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("format", "geojson".to_string()),
                ("starttime", start_time.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("endtime", end_time.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("latitude", query.latitude.to_string()),
                ("longitude", query.longitude.to_string()),
                ("maxradiuskm", query.radius_km.to_string()),
                ("minmagnitude", self.config.min_magnitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let collection: FeatureCollection = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        let mut alerts: Vec<Alert> = collection
            .features
            .into_iter()
            .filter_map(map_feature)
            .collect();

        if query.regional_only {
            alerts.retain(|a| geo::is_within_region(a.latitude, a.longitude));
        }

        debug!("Seismic catalog returned {} events", alerts.len());
        Ok(alerts)
    }

    /// The fixed offline sample returned when the catalog is unreachable.
    ///
    /// Entries use stable ids and severities below High, so degraded data is
    /// deduplicated normally and never triggers a notification.
    pub fn fallback_alerts(now_ms: i64) -> Vec<Alert> {
        vec![
            Alert {
                id: "seismic-offline-andaman".to_string(),
                title: "M4.8 Earthquake".to_string(),
                description: "Earthquake detected near the Andaman Sea (offline sample)"
                    .to_string(),
                hazard: HazardType::Earthquake,
                severity: Severity::Medium,
                latitude: 9.1,
                longitude: 97.9,
                location: "Andaman Sea".to_string(),
                timestamp: now_ms - 2 * 60 * 60 * 1000,
                source: FALLBACK_SOURCE.to_string(),
                source_url: None,
                recommendations: Some(RECOMMENDATIONS.to_string()),
                magnitude: Some(4.8),
                depth: Some(25.0),
                is_read: false,
                is_test: false,
            },
            Alert {
                id: "seismic-offline-chiang-rai".to_string(),
                title: "M3.4 Earthquake".to_string(),
                description: "Earthquake detected near Chiang Rai (offline sample)".to_string(),
                hazard: HazardType::Earthquake,
                severity: Severity::Low,
                latitude: 19.9,
                longitude: 99.8,
                location: "Chiang Rai Province".to_string(),
                timestamp: now_ms - 6 * 60 * 60 * 1000,
                source: FALLBACK_SOURCE.to_string(),
                source_url: None,
                recommendations: Some(RECOMMENDATIONS.to_string()),
                magnitude: Some(3.4),
                depth: Some(8.0),
                is_read: false,
                is_test: false,
            },
        ]
    }
}

/// Map one catalog feature to an alert.
///
/// Features without a magnitude or a usable coordinate pair are dropped;
/// a missing place name degrades to "Unknown location" rather than
/// rejecting the record.
fn map_feature(feature: Feature) -> Option<Alert> {
    let magnitude = feature.properties.mag?;
    let coords = &feature.geometry.coordinates;
    if coords.len() < 2 {
        return None;
    }
    let (longitude, latitude) = (coords[0], coords[1]);
    let depth = coords.get(2).copied();

    let description = match &feature.properties.place {
        Some(place) => format!("Earthquake detected near {}", place),
        None => "Earthquake detected".to_string(),
    };
    let location = feature
        .properties
        .place
        .unwrap_or_else(|| "Unknown location".to_string());

    Some(Alert {
        id: feature.id,
        title: format!("M{:.1} Earthquake", magnitude),
        description,
        hazard: HazardType::Earthquake,
        severity: severity_for_magnitude(magnitude),
        latitude,
        longitude,
        location,
        timestamp: feature.properties.time.unwrap_or(0),
        source: LIVE_SOURCE.to_string(),
        source_url: feature.properties.url,
        recommendations: Some(RECOMMENDATIONS.to_string()),
        magnitude: Some(magnitude),
        depth,
        is_read: false,
        is_test: false,
    })
}

#[async_trait]
impl HazardSource for SeismicSource {
    async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
        match self.try_fetch(query).await {
            Ok(alerts) => alerts,
            Err(e) => {
                warn!("Seismic catalog fetch failed, using offline sample: {}", e);
                let mut fallback = Self::fallback_alerts(alert_core::now_ms());
                if query.regional_only {
                    fallback.retain(|a| geo::is_within_region(a.latitude, a.longitude));
                }
                fallback
            }
        }
    }

    fn name(&self) -> &str {
        "SeismicSource"
    }

    fn enabled(&self, preferences: &Preferences) -> bool {
        preferences.earthquake_alerts
    }
}
