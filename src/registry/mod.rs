//! Dataset registry: static planets, signs, houses and aspect types
//!
//! The registry is built once at startup and shared by reference with the
//! enrichment, geometry and sentence engines. Lookups are by strongly typed
//! key; string lookups are case-insensitive.

pub mod loader;
pub mod schema;

use ahash::AHashMap;

pub use loader::{load_directory, load_registry, RegistrySources};
pub use schema::{AspectTypeDescriptor, CelestialBody, House, Sign, VisualMappings};

use crate::core::error::RegistryError;
use crate::core::types::{AspectKind, Body, ZodiacSign, HOUSE_COUNT};

/// Registry of every static descriptor
#[derive(Debug, Clone)]
pub struct Registry {
    planets: Vec<CelestialBody>,
    signs: Vec<Sign>,
    /// Sorted by id, so `houses[id - 1]` is house `id`
    houses: Vec<House>,
    aspects: Vec<AspectTypeDescriptor>,
    planet_index: AHashMap<Body, usize>,
    sign_index: AHashMap<ZodiacSign, usize>,
    aspect_index: AHashMap<AspectKind, usize>,
}

impl Registry {
    /// Load the dataset compiled into the crate
    pub fn bundled() -> Result<Self, RegistryError> {
        load_registry(RegistrySources::bundled())
    }

    /// Build a registry from parsed tables, validating completeness
    ///
    /// Every body, sign and house must appear exactly once. The aspect table
    /// may be partial; kinds without a descriptor degrade downstream.
    pub fn from_tables(
        planets: Vec<CelestialBody>,
        signs: Vec<Sign>,
        mut houses: Vec<House>,
        aspects: Vec<AspectTypeDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut planet_index = AHashMap::new();
        for (i, planet) in planets.iter().enumerate() {
            if planet_index.insert(planet.name, i).is_some() {
                return Err(RegistryError::DuplicateEntry(format!("planet {}", planet.name)));
            }
        }
        if let Some(missing) = Body::ALL.iter().find(|b| !planet_index.contains_key(*b)) {
            return Err(RegistryError::MissingEntry(format!("planet {}", missing)));
        }

        let mut sign_index = AHashMap::new();
        for (i, sign) in signs.iter().enumerate() {
            if sign_index.insert(sign.name, i).is_some() {
                return Err(RegistryError::DuplicateEntry(format!("sign {}", sign.name)));
            }
        }
        if let Some(missing) = ZodiacSign::ALL.iter().find(|s| !sign_index.contains_key(*s)) {
            return Err(RegistryError::MissingEntry(format!("sign {}", missing)));
        }

        houses.sort_by_key(|h| h.id);
        for pair in houses.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(RegistryError::DuplicateEntry(format!("house {}", pair[0].id)));
            }
        }
        for id in 1..=HOUSE_COUNT {
            if houses.get(usize::from(id) - 1).map(|h| h.id) != Some(id) {
                return Err(RegistryError::MissingEntry(format!("house {}", id)));
            }
        }
        if houses.len() != usize::from(HOUSE_COUNT) {
            return Err(RegistryError::DuplicateEntry(format!(
                "house table has {} entries",
                houses.len()
            )));
        }

        let mut aspect_index = AHashMap::new();
        for (i, aspect) in aspects.iter().enumerate() {
            if aspect_index.insert(aspect.kind, i).is_some() {
                return Err(RegistryError::DuplicateEntry(format!("aspect {}", aspect.kind)));
            }
        }

        Ok(Self {
            planets,
            signs,
            houses,
            aspects,
            planet_index,
            sign_index,
            aspect_index,
        })
    }

    pub fn planets(&self) -> &[CelestialBody] {
        &self.planets
    }

    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn aspects(&self) -> &[AspectTypeDescriptor] {
        &self.aspects
    }

    pub fn planet(&self, body: Body) -> Option<&CelestialBody> {
        self.planet_index.get(&body).map(|&i| &self.planets[i])
    }

    pub fn planet_by_name(&self, name: &str) -> Option<&CelestialBody> {
        Body::from_name(name).and_then(|b| self.planet(b))
    }

    pub fn sign(&self, sign: ZodiacSign) -> Option<&Sign> {
        self.sign_index.get(&sign).map(|&i| &self.signs[i])
    }

    pub fn sign_by_name(&self, name: &str) -> Option<&Sign> {
        ZodiacSign::from_name(name).and_then(|s| self.sign(s))
    }

    /// House by id (1..=12)
    pub fn house(&self, id: u8) -> Option<&House> {
        if id == 0 {
            return None;
        }
        self.houses.get(usize::from(id) - 1)
    }

    pub fn aspect(&self, kind: AspectKind) -> Option<&AspectTypeDescriptor> {
        self.aspect_index.get(&kind).map(|&i| &self.aspects[i])
    }

    pub fn aspect_by_name(&self, name: &str) -> Option<&AspectTypeDescriptor> {
        AspectKind::from_name(name).and_then(|k| self.aspect(k))
    }

    /// House colors ordered by id, used as the spiral layer palette
    pub fn house_palette(&self) -> Vec<String> {
        self.houses.iter().map(|h| h.color.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::bundled().unwrap()
    }

    #[test]
    fn test_lookup_by_name_is_case_insensitive() {
        let registry = registry();
        assert_eq!(registry.planet_by_name("venus").unwrap().name, Body::Venus);
        assert_eq!(registry.sign_by_name("SCORPIO").unwrap().name, ZodiacSign::Scorpio);
        assert_eq!(registry.aspect_by_name("trine").unwrap().kind, AspectKind::Trine);
        assert!(registry.planet_by_name("Ceres").is_none());
    }

    #[test]
    fn test_house_lookup_bounds() {
        let registry = registry();
        assert_eq!(registry.house(1).unwrap().id, 1);
        assert_eq!(registry.house(12).unwrap().id, 12);
        assert!(registry.house(0).is_none());
        assert!(registry.house(13).is_none());
    }

    #[test]
    fn test_house_palette_follows_id_order() {
        let registry = registry();
        let palette = registry.house_palette();
        assert_eq!(palette.len(), 12);
        assert_eq!(palette[0], registry.house(1).unwrap().color);
        assert_eq!(palette[11], registry.house(12).unwrap().color);
    }

    #[test]
    fn test_duplicate_house_rejected() {
        let registry = registry();
        let mut houses = registry.houses().to_vec();
        houses[11].id = 11;
        let result = Registry::from_tables(
            registry.planets().to_vec(),
            registry.signs().to_vec(),
            houses,
            registry.aspects().to_vec(),
        );
        assert!(matches!(result, Err(RegistryError::DuplicateEntry(_))));
    }

    #[test]
    fn test_missing_planet_rejected() {
        let registry = registry();
        let planets: Vec<_> = registry
            .planets()
            .iter()
            .filter(|p| p.name != Body::Pluto)
            .cloned()
            .collect();
        let result = Registry::from_tables(
            planets,
            registry.signs().to_vec(),
            registry.houses().to_vec(),
            registry.aspects().to_vec(),
        );
        match result {
            Err(RegistryError::MissingEntry(msg)) => assert_eq!(msg, "planet Pluto"),
            other => panic!("Expected missing entry, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_partial_aspect_table_allowed() {
        let registry = registry();
        let aspects: Vec<_> = registry
            .aspects()
            .iter()
            .filter(|a| a.kind != AspectKind::Sextile)
            .cloned()
            .collect();
        let partial = Registry::from_tables(
            registry.planets().to_vec(),
            registry.signs().to_vec(),
            registry.houses().to_vec(),
            aspects,
        )
        .unwrap();
        assert!(partial.aspect(AspectKind::Sextile).is_none());
        assert!(partial.aspect(AspectKind::Square).is_some());
    }
}
