//! Spiral and constellation geometry
//!
//! Everything here is pure arithmetic and total over numeric input: malformed
//! cusps or degrees fall back to house 1 and a 30° house rather than failing.

pub mod aspects;
pub mod layout;
pub mod placement;
pub mod sphere;
pub mod spiral;

pub use aspects::{aspect_strength, MIN_ASPECT_STRENGTH};
pub use layout::{
    aspect_lines, build_constellation, place_planets, AspectLine, Constellation, ConstellationLink,
    ConstellationNode, PlacedBody,
};
pub use placement::{place_body, resolve_house, BodyPlacement, HouseCusps, DEFAULT_HOUSE_SIZE};
pub use sphere::place_on_sphere;
pub use spiral::{generate_spiral_backbone, point_at, SpiralLayer, SpiralParams};
