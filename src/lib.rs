//! Natal Spiral - chart enrichment, spiral geometry and sentence generation
//!
//! A raw natal chart is joined against a static dataset registry, laid out
//! on a 3D helix and a constellation sphere, and described in weighted,
//! template-driven sentences with colored tokens.

pub mod chart;
pub mod core;
pub mod geometry;
pub mod registry;
pub mod sentence;
pub mod source;
