//! Current-conditions weather feed adapter.
//!
//! [`WeatherSource`] queries an Open-Meteo-style forecast endpoint for the
//! current weather at a point and synthesizes storm/flood alerts from a
//! small set of WMO weather codes. Most codes map to no alert at all;
//! silence is the default. Failures degrade to an empty list.

mod api_types;
mod config;
mod source;

pub use config::WeatherConfig;
pub use source::{alert_for_weather_code, WeatherSource};
