//! Even point distribution on a sphere for the constellation view

use glam::DVec3;
use std::f64::consts::PI;

/// Position of body `index` out of `count` on a sphere of `radius`
///
/// Spiral-lattice layout: `phi = acos(-1 + 2i/n)`, `theta = sqrt(n·π)·phi`.
pub fn place_on_sphere(index: usize, count: usize, radius: f64) -> DVec3 {
    if count == 0 {
        return DVec3::ZERO;
    }

    let n = count as f64;
    let phi = (-1.0 + 2.0 * index as f64 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;

    DVec3::new(
        radius * theta.cos() * phi.sin(),
        radius * theta.sin() * phi.sin(),
        radius * phi.cos(),
    )
}
