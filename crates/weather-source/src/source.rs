//! WeatherSource implementation against a forecast endpoint.

use alert_core::{
    async_trait, geo, now_ms, Alert, HazardSource, HazardType, Preferences, Severity, SourceError,
    SourceQuery, DEFAULT_COORDINATES,
};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::Forecast;
use crate::config::WeatherConfig;

const SOURCE: &str = "Open-Meteo Weather Service";
const SOURCE_URL: &str = "https://open-meteo.com/";

/// What one weather code synthesizes into, before position and time are
/// stamped on.
struct CodeMapping {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    hazard: HazardType,
    severity: Severity,
    recommendations: &'static str,
}

/// Map a WMO weather code to an alert template.
///
/// Only thunderstorms, heavy snow, and heavy rain showers produce alerts;
/// every other code returns `None`.
pub fn alert_for_weather_code(code: i64) -> Option<(HazardType, Severity)> {
    mapping_for_code(code).map(|m| (m.hazard, m.severity))
}

fn mapping_for_code(code: i64) -> Option<CodeMapping> {
    match code {
        95 | 96 | 99 => Some(CodeMapping {
            slug: "thunderstorm",
            title: "Severe Thunderstorm",
            description: "Thunderstorm with possible heavy rain and lightning in your area.",
            hazard: HazardType::Storm,
            severity: Severity::Medium,
            recommendations: "Stay indoors and away from windows. Avoid using electrical appliances.",
        }),
        71 | 73 | 75 | 77 => Some(CodeMapping {
            slug: "snow",
            title: "Heavy Snow",
            description: "Heavy snowfall expected in your area.",
            hazard: HazardType::Storm,
            severity: Severity::Medium,
            recommendations: "Avoid unnecessary travel. Keep warm and check on vulnerable neighbors.",
        }),
        80..=82 => Some(CodeMapping {
            slug: "rain",
            title: "Heavy Rain",
            description: "Heavy rainfall that may cause localized flooding.",
            hazard: HazardType::Flood,
            severity: Severity::Low,
            recommendations: "Be cautious when driving and avoid flood-prone areas.",
        }),
        _ => None,
    }
}

/// Derive a short place label from an IANA timezone identifier.
fn location_from_timezone(timezone: &str) -> String {
    let city = timezone
        .rsplit('/')
        .next()
        .unwrap_or(timezone)
        .replace('_', " ");
    format!("Near {}", city)
}

/// A feed adapter that synthesizes alerts from current weather conditions.
pub struct WeatherSource {
    client: Client,
    config: WeatherConfig,
}

impl WeatherSource {
    /// Create a new adapter with the given configuration.
    pub fn new(config: WeatherConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Create an adapter from environment variables.
    ///
    /// See [`WeatherConfig::from_env`] for the recognized variables.
    pub fn from_env() -> Self {
        Self::new(WeatherConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Vec<Alert>, SourceError> {
        // Outside the supported region under a region-only preference, ask
        // about the fixed reference point instead of the caller's position.
        let (latitude, longitude) =
            if query.regional_only && !geo::is_within_region(query.latitude, query.longitude) {
                DEFAULT_COORDINATES
            } else {
                (query.latitude, query.longitude)
            };

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", self.config.timezone.clone()),
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

        let forecast: Forecast = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        let code = forecast.current_weather.weathercode;
        let Some(mapping) = mapping_for_code(code) else {
            debug!("Weather code {} maps to no alert", code);
            return Ok(Vec::new());
        };

        let now = now_ms();
        Ok(vec![Alert {
            id: format!("weather-{}-{}", mapping.slug, now),
            title: mapping.title.to_string(),
            description: mapping.description.to_string(),
            hazard: mapping.hazard,
            severity: mapping.severity,
            latitude,
            longitude,
            location: location_from_timezone(&forecast.timezone),
            timestamp: now,
            source: SOURCE.to_string(),
            source_url: Some(SOURCE_URL.to_string()),
            recommendations: Some(mapping.recommendations.to_string()),
            magnitude: None,
            depth: None,
            is_read: false,
            is_test: false,
        }])
    }
}

#[async_trait]
impl HazardSource for WeatherSource {
    async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
        match self.try_fetch(query).await {
            Ok(alerts) => alerts,
            Err(e) => {
                warn!("Weather fetch failed: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "WeatherSource"
    }

    fn enabled(&self, preferences: &Preferences) -> bool {
        preferences.weather_alerts
    }
}
