//! Synthetic test alerts for demonstration.

use alert_core::{Alert, HazardType, Severity, DEFAULT_COORDINATES};

struct TestTemplate {
    title: &'static str,
    description: &'static str,
    hazard: HazardType,
    severity: Severity,
    recommendations: &'static str,
    magnitude: Option<f64>,
    depth: Option<f64>,
}

/// Fixed template per hazard type; hazards without their own template fall
/// back to the earthquake one.
fn template(hazard: HazardType) -> TestTemplate {
    match hazard {
        HazardType::Flood => TestTemplate {
            title: "TEST: Flood Warning",
            description: "This is a test flood alert. No actual flooding has occurred.",
            hazard: HazardType::Flood,
            severity: Severity::Medium,
            recommendations: "This is a test alert. In a real flood: Move to higher ground immediately.",
            magnitude: None,
            depth: None,
        },
        HazardType::Tsunami => TestTemplate {
            title: "TEST: Tsunami Warning",
            description: "This is a test tsunami alert. No actual tsunami has occurred.",
            hazard: HazardType::Tsunami,
            severity: Severity::High,
            recommendations: "This is a test alert. In a real tsunami: Evacuate to higher ground immediately.",
            magnitude: None,
            depth: None,
        },
        HazardType::Volcano => TestTemplate {
            title: "TEST: Volcanic Eruption",
            description: "This is a test volcanic eruption alert. No actual eruption has occurred.",
            hazard: HazardType::Volcano,
            severity: Severity::High,
            recommendations: "This is a test alert. In a real eruption: Follow evacuation orders immediately.",
            magnitude: None,
            depth: None,
        },
        HazardType::Storm => TestTemplate {
            title: "TEST: Severe Storm",
            description: "This is a test severe storm alert. No actual storm is approaching.",
            hazard: HazardType::Storm,
            severity: Severity::Medium,
            recommendations: "This is a test alert. In a real storm: Stay indoors and away from windows.",
            magnitude: None,
            depth: None,
        },
        _ => TestTemplate {
            title: "TEST: M6.5 Earthquake",
            description: "This is a test earthquake alert. No actual earthquake has occurred.",
            hazard: HazardType::Earthquake,
            severity: Severity::High,
            recommendations: "This is a test alert. In a real earthquake: Drop, Cover, and Hold On.",
            magnitude: Some(6.5),
            depth: Some(10.0),
        },
    }
}

/// Build a synthetic alert of the requested hazard type, stamped at
/// `now_ms` and fixed to the reference coordinates.
pub fn build_test_alert(hazard: HazardType, now_ms: i64) -> Alert {
    let template = template(hazard);

    Alert {
        id: format!("test-{}-{}", template.hazard, now_ms),
        title: template.title.to_string(),
        description: template.description.to_string(),
        hazard: template.hazard,
        severity: template.severity,
        latitude: DEFAULT_COORDINATES.0,
        longitude: DEFAULT_COORDINATES.1,
        location: "Your Current Location (Test)".to_string(),
        timestamp: now_ms,
        source: "Test Alert System".to_string(),
        source_url: None,
        recommendations: Some(template.recommendations.to_string()),
        magnitude: template.magnitude,
        depth: template.depth,
        is_read: false,
        is_test: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_known_type() {
        let alert = build_test_alert(HazardType::Tsunami, 1_700_000_000_000);
        assert_eq!(alert.id, "test-tsunami-1700000000000");
        assert_eq!(alert.hazard, HazardType::Tsunami);
        assert_eq!(alert.severity, Severity::High);
        assert!(alert.is_test);
        assert!(!alert.is_read);
        assert_eq!(
            (alert.latitude, alert.longitude),
            (DEFAULT_COORDINATES.0, DEFAULT_COORDINATES.1)
        );
    }

    #[test]
    fn test_unknown_type_falls_back_to_earthquake() {
        let alert = build_test_alert(HazardType::Other, 42);
        assert_eq!(alert.hazard, HazardType::Earthquake);
        assert_eq!(alert.magnitude, Some(6.5));
        assert_eq!(alert.id, "test-earthquake-42");
    }

    #[test]
    fn test_ids_differ_over_time() {
        let a = build_test_alert(HazardType::Flood, 1);
        let b = build_test_alert(HazardType::Flood, 2);
        assert_ne!(a.id, b.id);
    }
}
