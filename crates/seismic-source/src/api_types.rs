//! Wire types for the FDSN GeoJSON event query.

use serde::Deserialize;

/// Top-level GeoJSON feature collection.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One catalog event.
#[derive(Debug, Deserialize)]
pub struct Feature {
    pub id: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

/// Event properties; the catalog leaves fields null for sparse events, so
/// everything the mapping can survive without is optional.
#[derive(Debug, Deserialize)]
pub struct Properties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub time: Option<i64>,
    pub url: Option<String>,
}

/// Event geometry: `coordinates` is `[longitude, latitude, depth_km]`.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}
