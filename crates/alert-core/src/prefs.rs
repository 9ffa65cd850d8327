//! The user-preference shape consumed read-only by the core.

use serde::{Deserialize, Serialize};

use crate::model::HazardType;

/// User preferences controlling filtering and notification behavior.
///
/// Defaults are conservative so a fresh install still shows useful data:
/// every hazard category on, a wide radius, no severity or region
/// restriction. Stored documents may predate new fields, so every field
/// carries a serde default and unknown keys are ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub notifications_enabled: bool,
    pub earthquake_alerts: bool,
    pub weather_alerts: bool,
    pub flood_alerts: bool,
    pub tsunami_alerts: bool,
    pub volcano_alerts: bool,
    pub high_severity_only: bool,
    pub regional_only: bool,
    pub alert_radius_km: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            earthquake_alerts: true,
            weather_alerts: true,
            flood_alerts: true,
            tsunami_alerts: true,
            volcano_alerts: true,
            high_severity_only: false,
            regional_only: false,
            alert_radius_km: 1000.0,
        }
    }
}

impl Preferences {
    /// Whether alerts of the given hazard category should be shown.
    ///
    /// Storm alerts ride the weather flag; categories without a dedicated
    /// flag are always allowed.
    pub fn allows(&self, hazard: HazardType) -> bool {
        match hazard {
            HazardType::Earthquake => self.earthquake_alerts,
            HazardType::Flood => self.flood_alerts,
            HazardType::Storm => self.weather_alerts,
            HazardType::Tsunami => self.tsunami_alerts,
            HazardType::Volcano => self.volcano_alerts,
            HazardType::Wildfire | HazardType::Landslide | HazardType::Drought | HazardType::Other => {
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_conservative() {
        let prefs = Preferences::default();
        assert!(prefs.notifications_enabled);
        assert!(prefs.earthquake_alerts);
        assert!(prefs.weather_alerts);
        assert!(!prefs.high_severity_only);
        assert!(!prefs.regional_only);
        assert_eq!(prefs.alert_radius_km, 1000.0);
    }

    #[test]
    fn test_allows_respects_category_flags() {
        let prefs = Preferences {
            earthquake_alerts: false,
            weather_alerts: false,
            ..Preferences::default()
        };
        assert!(!prefs.allows(HazardType::Earthquake));
        assert!(!prefs.allows(HazardType::Storm));
        assert!(prefs.allows(HazardType::Flood));
        // No dedicated flag: always shown
        assert!(prefs.allows(HazardType::Landslide));
        assert!(prefs.allows(HazardType::Other));
    }

    #[test]
    fn test_partial_document_loads_over_defaults() {
        // A document written by an older version only knows some keys
        let prefs: Preferences =
            serde_json::from_str(r#"{"highSeverityOnly": true, "alertRadius": 300}"#).unwrap();
        assert!(prefs.high_severity_only);
        assert!(prefs.notifications_enabled);
        // Unknown keys are ignored, missing keys take defaults
        assert_eq!(prefs.alert_radius_km, 1000.0);
    }

    #[test]
    fn test_round_trip() {
        let prefs = Preferences {
            alert_radius_km: 250.0,
            regional_only: true,
            ..Preferences::default()
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back.alert_radius_km, 250.0);
        assert!(back.regional_only);
    }
}
