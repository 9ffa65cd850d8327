//! Configuration for the seismic catalog adapter.

use std::env;
use std::time::Duration;

/// Configuration for [`crate::SeismicSource`].
#[derive(Debug, Clone)]
pub struct SeismicConfig {
    /// Base URL of the FDSN event query endpoint.
    pub api_url: String,

    /// Minimum magnitude to request from the catalog.
    pub min_magnitude: f64,

    /// How far back the catalog query reaches, in days.
    pub lookback_days: i64,

    /// Per-request deadline.
    pub timeout: Duration,
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            api_url: "https://earthquake.usgs.gov/fdsnws/event/1/query".to_string(),
            min_magnitude: 2.5,
            lookback_days: 30,
            timeout: Duration::from_secs(12),
        }
    }
}

impl SeismicConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `SEISMIC_API_URL` - Catalog endpoint (default: USGS FDSN query)
    /// - `SEISMIC_MIN_MAGNITUDE` - Minimum magnitude (default: 2.5)
    /// - `SEISMIC_LOOKBACK_DAYS` - Query window in days (default: 30)
    /// - `SEISMIC_TIMEOUT_SECS` - Request deadline (default: 12)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("SEISMIC_API_URL").unwrap_or(defaults.api_url);

        let min_magnitude = env::var("SEISMIC_MIN_MAGNITUDE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.min_magnitude);

        let lookback_days = env::var("SEISMIC_LOOKBACK_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.lookback_days);

        let timeout = env::var("SEISMIC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_url,
            min_magnitude,
            lookback_days,
            timeout,
        }
    }
}
