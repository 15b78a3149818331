//! Provider response normalization
//!
//! The astrology service reports planets with `full_degree` and `is_retro`,
//! houses with `house`/`degree`, and aspects with `aspecting_planet` /
//! `aspected_planet`. This module maps that shape onto `RawChart`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chart::{RawAspect, RawChart, RawHouse, RawPlanet};
use crate::core::error::SourceError;

/// Orb under which the provider's aspect counts as exact
pub const EXACT_ORB: f64 = 1.0;

/// The provider sends `is_retro` as either a bool or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetroFlag {
    Bool(bool),
    Text(String),
}

impl RetroFlag {
    pub fn as_bool(&self) -> bool {
        match self {
            RetroFlag::Bool(b) => *b,
            RetroFlag::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        }
    }
}

impl Default for RetroFlag {
    fn default() -> Self {
        RetroFlag::Bool(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPlanet {
    pub name: String,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub house: i32,
    pub full_degree: f64,
    #[serde(default)]
    pub is_retro: RetroFlag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHouse {
    pub house: i32,
    #[serde(default)]
    pub sign: String,
    pub degree: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAspect {
    pub aspecting_planet: String,
    pub aspected_planet: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub orb: f64,
    /// Signed separation from the exact angle, when reported
    #[serde(default)]
    pub diff: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub planets: Vec<ProviderPlanet>,
    #[serde(default)]
    pub houses: Vec<ProviderHouse>,
    #[serde(default)]
    pub aspects: Vec<ProviderAspect>,
}

/// Map a provider response onto a raw chart
///
/// Points the registry does not model (Ascendant, Node, ...) are kept here and
/// dropped later during enrichment.
pub fn normalize_response(response: &ProviderResponse) -> RawChart {
    let planets = response
        .planets
        .iter()
        .map(|p| RawPlanet {
            name: p.name.clone(),
            sign: p.sign.clone(),
            house_id: p.house,
            degree: p.full_degree,
            retrograde: p.is_retro.as_bool(),
        })
        .collect();

    let houses = response
        .houses
        .iter()
        .map(|h| RawHouse {
            id: h.house,
            sign: h.sign.clone(),
            cusp_degree: h.degree,
        })
        .collect();

    let aspects = response
        .aspects
        .iter()
        .map(|a| RawAspect {
            p1_name: a.aspecting_planet.clone(),
            p2_name: a.aspected_planet.clone(),
            kind: a.kind.clone(),
            orb: a.orb.abs(),
            exact: a.orb.abs() < EXACT_ORB,
            applying: false,
        })
        .collect();

    RawChart {
        planets,
        houses,
        aspects,
    }
}

/// Parse a provider response body
pub fn parse_response(body: &str) -> Result<RawChart, SourceError> {
    let response: ProviderResponse = serde_json::from_str(body)?;
    Ok(normalize_response(&response))
}

fn looks_like_provider(document: &Value) -> bool {
    let first_planet = document
        .get("planets")
        .and_then(Value::as_array)
        .and_then(|p| p.first());
    let first_aspect = document
        .get("aspects")
        .and_then(Value::as_array)
        .and_then(|a| a.first());

    first_planet.map_or(false, |p| p.get("full_degree").is_some())
        || first_aspect.map_or(false, |a| a.get("aspecting_planet").is_some())
}

/// Parse either a raw chart document or a saved provider response
pub fn parse_chart_document(json: &str) -> Result<RawChart, SourceError> {
    let document: Value = serde_json::from_str(json)?;
    if looks_like_provider(&document) {
        let response: ProviderResponse = serde_json::from_value(document)?;
        Ok(normalize_response(&response))
    } else {
        Ok(serde_json::from_value(document)?)
    }
}
