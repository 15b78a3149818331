//! Raw chart input as delivered by the chart source
//!
//! Names are kept as plain strings here: the provider may report bodies,
//! signs or aspect kinds the registry does not model, and those are only
//! filtered out during enrichment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::SourceError;

/// One body's placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlanet {
    pub name: String,
    pub sign: String,
    /// House reported by the provider; not trusted for visual placement
    pub house_id: i32,
    /// Absolute ecliptic degree, 0..360
    pub degree: f64,
    #[serde(default)]
    pub retrograde: bool,
}

/// One house cusp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHouse {
    pub id: i32,
    #[serde(default)]
    pub sign: String,
    pub cusp_degree: f64,
}

/// One aspect between two bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAspect {
    pub p1_name: String,
    pub p2_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Deviation from the exact angle, in degrees
    pub orb: f64,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub applying: bool,
}

/// A complete raw chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChart {
    #[serde(default)]
    pub planets: Vec<RawPlanet>,
    #[serde(default)]
    pub houses: Vec<RawHouse>,
    #[serde(default)]
    pub aspects: Vec<RawAspect>,
}

impl RawChart {
    /// Parse a raw chart from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a raw chart JSON file from disk
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_chart() {
        let json = r#"{
            "planets": [
                {"name": "Sun", "sign": "Aries", "house_id": 1, "degree": 5.0, "retrograde": false},
                {"name": "Mercury", "sign": "Aries", "house_id": 1, "degree": 12.5}
            ],
            "houses": [{"id": 1, "sign": "Aries", "cusp_degree": 0.0}],
            "aspects": [
                {"p1_name": "Sun", "p2_name": "Mercury", "type": "Conjunction", "orb": 7.5}
            ]
        }"#;

        let chart = RawChart::from_json(json).unwrap();
        assert_eq!(chart.planets.len(), 2);
        assert!(!chart.planets[1].retrograde);
        assert_eq!(chart.aspects[0].kind, "Conjunction");
        assert!(!chart.aspects[0].applying);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let chart = RawChart::from_json("{}").unwrap();
        assert!(chart.planets.is_empty());
        assert!(chart.houses.is_empty());
        assert!(chart.aspects.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(RawChart::from_json("{\"planets\": 3}"), Err(SourceError::SerdeError(_))));
    }
}
