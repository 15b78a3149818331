//! Static descriptor types for the dataset registry
//!
//! These mirror the bundled TOML documents one-to-one and are never mutated
//! after load.

use serde::{Deserialize, Serialize};

use crate::core::types::{AspectHarmony, AspectKind, Body, Element, Modality, ZodiacSign};

/// Descriptor for one of the ten modeled bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub name: Body,
    pub archetype_name: String,
    pub archetype_figure_name: String,
    /// Short phrase naming what the body stands for
    pub essence: String,
    /// Ordered visual motifs; the first is the primary one
    pub visual_elements: Vec<String>,
    #[serde(default)]
    pub glyph: Option<String>,
    pub color: String,
}

/// How a sign is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMappings {
    pub shape: String,
    pub motion: String,
    pub texture: String,
    pub palette: String,
    pub rhythm: String,
}

/// Descriptor for a zodiac sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sign {
    pub name: ZodiacSign,
    pub element: Element,
    pub modality: Modality,
    pub archetype_name: String,
    pub visual_mappings: VisualMappings,
    #[serde(default)]
    pub expressions: Vec<String>,
    /// Palette color used for sign tokens and glyphs
    pub color: String,
}

/// Descriptor for a house (life domain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// 1..=12
    pub id: u8,
    pub name: String,
    pub essence: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub visual_elements: Vec<String>,
    pub color: String,
}

/// Descriptor for an aspect kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectTypeDescriptor {
    pub kind: AspectKind,
    /// Exact separation in degrees
    pub angle: f64,
    pub color: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub quality: String,
}

impl AspectTypeDescriptor {
    pub fn harmony(&self) -> AspectHarmony {
        self.kind.harmony()
    }
}
