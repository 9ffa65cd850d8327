//! The normalized alert record and its enums.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Hazard categories understood by the client.
///
/// Upstream feeds report free-form category strings; anything that does not
/// match a known category parses as [`HazardType::Other`] rather than being
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Earthquake,
    Flood,
    Storm,
    Tsunami,
    Volcano,
    Wildfire,
    Landslide,
    Drought,
    Other,
}

impl HazardType {
    /// The canonical lowercase name, as used in ids and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earthquake => "earthquake",
            Self::Flood => "flood",
            Self::Storm => "storm",
            Self::Tsunami => "tsunami",
            Self::Volcano => "volcano",
            Self::Wildfire => "wildfire",
            Self::Landslide => "landslide",
            Self::Drought => "drought",
            Self::Other => "other",
        }
    }

    /// Parse a category string permissively; unknown categories map to
    /// [`HazardType::Other`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "earthquake" => Self::Earthquake,
            "flood" => Self::Flood,
            "storm" => Self::Storm,
            "tsunami" => Self::Tsunami,
            "volcano" => Self::Volcano,
            "wildfire" => Self::Wildfire,
            "landslide" => Self::Landslide,
            "drought" => Self::Drought,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal alert severity, used for filtering and notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// The lowercase name used in wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized hazard event from any feed.
///
/// `id` is globally unique per source and stable across re-fetches of the
/// same event so that notification dedup works. `timestamp` is the event
/// occurrence time in epoch milliseconds, not the fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub hazard: HazardType,
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub timestamp: i64,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_test: bool,
}

impl Alert {
    /// Whether the event occurred within `window_ms` of `now_ms`.
    ///
    /// Future-dated events count as recent; upstream clocks are not trusted
    /// to agree with ours.
    pub fn is_recent(&self, now_ms: i64, window_ms: i64) -> bool {
        now_ms - self.timestamp <= window_ms
    }
}

/// Current time in epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_alert() -> Alert {
        Alert {
            id: "usgs-abc123".to_string(),
            title: "M6.2 Earthquake".to_string(),
            description: "Earthquake detected near Chiang Rai".to_string(),
            hazard: HazardType::Earthquake,
            severity: Severity::High,
            latitude: 19.9,
            longitude: 99.8,
            location: "Chiang Rai, Thailand".to_string(),
            timestamp: 1_700_000_000_000,
            source: "USGS Earthquake Information Center".to_string(),
            source_url: Some("https://example.org/event/abc123".to_string()),
            recommendations: None,
            magnitude: Some(6.2),
            depth: Some(10.0),
            is_read: false,
            is_test: false,
        }
    }

    #[test]
    fn test_hazard_parse_known() {
        assert_eq!(HazardType::parse("earthquake"), HazardType::Earthquake);
        assert_eq!(HazardType::parse("Flood"), HazardType::Flood);
        assert_eq!(HazardType::parse(" TSUNAMI "), HazardType::Tsunami);
    }

    #[test]
    fn test_hazard_parse_unknown_maps_to_other() {
        assert_eq!(HazardType::parse("meteor"), HazardType::Other);
        assert_eq!(HazardType::parse(""), HazardType::Other);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_alert_serializes_camel_case() {
        let json = serde_json::to_value(sample_alert()).unwrap();
        assert_eq!(json["type"], "earthquake");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["sourceUrl"], "https://example.org/event/abc123");
        assert_eq!(json["isRead"], false);
        // Absent options are omitted entirely
        assert!(json.get("recommendations").is_none());
    }

    #[test]
    fn test_alert_deserializes_with_missing_flags() {
        // Stored records from older versions may omit isRead/isTest
        let json = r#"{
            "id": "x",
            "title": "t",
            "description": "d",
            "type": "flood",
            "severity": "low",
            "latitude": 1.0,
            "longitude": 2.0,
            "location": "somewhere",
            "timestamp": 123,
            "source": "test"
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert!(!alert.is_read);
        assert!(!alert.is_test);
        assert_eq!(alert.hazard, HazardType::Flood);
    }

    #[test]
    fn test_is_recent() {
        let alert = sample_alert();
        let hour = 60 * 60 * 1000;
        assert!(alert.is_recent(alert.timestamp + hour, hour));
        assert!(!alert.is_recent(alert.timestamp + hour + 1, hour));
        // Future-dated events are treated as recent
        assert!(alert.is_recent(alert.timestamp - 5000, hour));
    }
}
