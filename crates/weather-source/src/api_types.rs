//! Wire types for the forecast endpoint.

use serde::Deserialize;

/// Forecast response; only the fields the mapping needs.
#[derive(Debug, Deserialize)]
pub struct Forecast {
    pub current_weather: CurrentWeather,
    #[serde(default)]
    pub timezone: String,
}

/// Current conditions block.
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    /// WMO weather interpretation code.
    pub weathercode: i64,
}
