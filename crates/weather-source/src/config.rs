//! Configuration for the weather feed adapter.

use std::env;
use std::time::Duration;

/// Configuration for [`crate::WeatherSource`].
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint URL.
    pub api_url: String,

    /// Timezone identifier sent with the query; the response echoes it and
    /// the adapter derives a location label from it.
    pub timezone: String,

    /// Per-request deadline.
    pub timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            timezone: "Asia/Bangkok".to_string(),
            timeout: Duration::from_secs(12),
        }
    }
}

impl WeatherConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `WEATHER_API_URL` - Forecast endpoint (default: Open-Meteo)
    /// - `WEATHER_TIMEZONE` - Query timezone (default: Asia/Bangkok)
    /// - `WEATHER_TIMEOUT_SECS` - Request deadline (default: 12)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("WEATHER_API_URL").unwrap_or(defaults.api_url);
        let timezone = env::var("WEATHER_TIMEZONE").unwrap_or(defaults.timezone);
        let timeout = env::var("WEATHER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_url,
            timezone,
            timeout,
        }
    }
}
