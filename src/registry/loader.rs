//! Load registry tables from TOML documents
//!
//! The bundled documents under `data/registry/` are compiled into the crate;
//! `load_directory` reads the same four files from disk so a deployment can
//! ship an edited dataset without rebuilding.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

use super::schema::{AspectTypeDescriptor, CelestialBody, House, Sign};
use super::Registry;
use crate::core::error::RegistryError;

pub const BUNDLED_PLANETS: &str = include_str!("../../data/registry/planets.toml");
pub const BUNDLED_SIGNS: &str = include_str!("../../data/registry/signs.toml");
pub const BUNDLED_HOUSES: &str = include_str!("../../data/registry/houses.toml");
pub const BUNDLED_ASPECTS: &str = include_str!("../../data/registry/aspects.toml");

#[derive(Deserialize)]
struct PlanetFile {
    planets: Vec<CelestialBody>,
}

#[derive(Deserialize)]
struct SignFile {
    signs: Vec<Sign>,
}

#[derive(Deserialize)]
struct HouseFile {
    houses: Vec<House>,
}

#[derive(Deserialize)]
struct AspectFile {
    #[serde(default)]
    aspects: Vec<AspectTypeDescriptor>,
}

/// Raw TOML text for each registry table
#[derive(Debug, Clone, Copy)]
pub struct RegistrySources<'a> {
    pub planets: &'a str,
    pub signs: &'a str,
    pub houses: &'a str,
    pub aspects: &'a str,
}

impl RegistrySources<'static> {
    /// The dataset compiled into the crate
    pub fn bundled() -> Self {
        Self {
            planets: BUNDLED_PLANETS,
            signs: BUNDLED_SIGNS,
            houses: BUNDLED_HOUSES,
            aspects: BUNDLED_ASPECTS,
        }
    }
}

fn parse_table<T: DeserializeOwned>(content: &str, source_name: &str) -> Result<T, RegistryError> {
    toml::from_str(content).map_err(|e| RegistryError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Parse and validate all four tables
pub fn load_registry(sources: RegistrySources<'_>) -> Result<Registry, RegistryError> {
    let planets: PlanetFile = parse_table(sources.planets, "planets.toml")?;
    let signs: SignFile = parse_table(sources.signs, "signs.toml")?;
    let houses: HouseFile = parse_table(sources.houses, "houses.toml")?;
    let aspects: AspectFile = parse_table(sources.aspects, "aspects.toml")?;

    let registry = Registry::from_tables(planets.planets, signs.signs, houses.houses, aspects.aspects)?;
    tracing::debug!(
        planets = registry.planets().len(),
        signs = registry.signs().len(),
        houses = registry.houses().len(),
        aspects = registry.aspects().len(),
        "Registry loaded"
    );
    Ok(registry)
}

/// Load `planets.toml`, `signs.toml`, `houses.toml` and `aspects.toml` from a directory
pub fn load_directory(dir: &Path) -> Result<Registry, RegistryError> {
    let planets = std::fs::read_to_string(dir.join("planets.toml"))?;
    let signs = std::fs::read_to_string(dir.join("signs.toml"))?;
    let houses = std::fs::read_to_string(dir.join("houses.toml"))?;
    let aspects = std::fs::read_to_string(dir.join("aspects.toml"))?;

    load_registry(RegistrySources {
        planets: &planets,
        signs: &signs,
        houses: &houses,
        aspects: &aspects,
    })
}
