//! Placing bodies on the helix from their ecliptic degree
//!
//! The provider's house id is ignored here. The occupied house is recomputed
//! from the cusps so the drawn position always agrees with the drawn house
//! boundaries.

use glam::DVec3;
use serde::Serialize;

use super::spiral::{point_at, SpiralParams};
use crate::core::types::{normalize_degrees, FULL_CIRCLE, HOUSE_COUNT};

/// Width assumed for a house whose cusps are out of order
pub const DEFAULT_HOUSE_SIZE: f64 = 30.0;

/// The twelve cusp degrees, indexed by house id - 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseCusps([f64; 12]);

impl HouseCusps {
    pub fn new(cusps: [f64; 12]) -> Self {
        Self(cusps)
    }

    /// Equal 30° houses starting at `ascendant`
    pub fn equal(ascendant: f64) -> Self {
        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = normalize_degrees(ascendant + i as f64 * 30.0);
        }
        Self(cusps)
    }

    /// Cusp of house `id` (1..=12); ids wrap cyclically
    pub fn cusp(&self, id: u8) -> f64 {
        self.0[Self::index(id)]
    }

    /// Cusp of the house after `id` (house 12 is followed by house 1)
    pub fn next_cusp(&self, id: u8) -> f64 {
        self.0[(Self::index(id) + 1) % 12]
    }

    pub fn as_array(&self) -> &[f64; 12] {
        &self.0
    }

    fn index(id: u8) -> usize {
        (usize::from(id.max(1)) - 1) % 12
    }
}

impl Default for HouseCusps {
    fn default() -> Self {
        Self::equal(0.0)
    }
}

/// House containing `degree`, scanning cusps in id order
///
/// A house whose cusp is greater than the next cusp spans the 0° point.
/// Falls back to house 1 when nothing matches.
pub fn resolve_house(degree: f64, cusps: &HouseCusps) -> u8 {
    let d = normalize_degrees(degree);
    for id in 1..=HOUSE_COUNT {
        let cusp = normalize_degrees(cusps.cusp(id));
        let next = normalize_degrees(cusps.next_cusp(id));

        let inside = if cusp < next {
            d >= cusp && d < next
        } else if cusp > next {
            d >= cusp || d < next
        } else {
            false
        };

        if inside {
            return id;
        }
    }
    1
}

/// Where a body lands on the helix
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPlacement {
    /// House recomputed from the cusps
    pub house: u8,
    /// Signed distance past the house cusp, in (-180, 180]
    pub degree_from_cusp: f64,
    pub house_size: f64,
    /// Fraction of the way through the house
    pub progress: f64,
    /// Global helix parameter
    pub t: f64,
    pub position: DVec3,
}

/// Place a body at `degree` on the helix
pub fn place_body(degree: f64, cusps: &HouseCusps, params: &SpiralParams) -> BodyPlacement {
    let house = resolve_house(degree, cusps);
    let cusp = cusps.cusp(house);
    let next = cusps.next_cusp(house);

    let mut degree_from_cusp = normalize_degrees(degree - cusp);
    if degree_from_cusp > FULL_CIRCLE / 2.0 {
        degree_from_cusp -= FULL_CIRCLE;
    }

    let mut house_size = normalize_degrees(next - cusp);
    if !(house_size > 0.0) {
        house_size = DEFAULT_HOUSE_SIZE;
    }

    let mut progress = degree_from_cusp / house_size;
    if !progress.is_finite() {
        progress = 0.0;
    }

    let layer_count = f64::from(params.layer_count.max(1));
    let t = (f64::from(house - 1) + progress) / layer_count;

    BodyPlacement {
        house,
        degree_from_cusp,
        house_size,
        progress,
        t,
        position: point_at(t, params),
    }
}
