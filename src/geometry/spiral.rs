//! Helix backbone of the spiral view
//!
//! The spiral descends from the top (t = 0) to the bottom (t → 1), winding
//! once per layer. Layer `n` holds house `n + 1`, so house 1 sits at the top.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Shape of the helix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralParams {
    /// Number of full windings (one per house)
    pub layer_count: u32,
    /// Samples per winding when drawing the backbone
    pub points_per_layer: u32,
    /// Radius at the top of the helix
    pub start_radius: f64,
    /// Radius at the bottom of the helix
    pub end_radius: f64,
    /// Total vertical extent; the helix spans +height/2 down to -height/2
    pub height: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            layer_count: 12,
            points_per_layer: 100,
            start_radius: 1.5,
            end_radius: 4.0,
            height: 10.0,
        }
    }
}

impl SpiralParams {
    /// Total samples across every layer
    pub fn total_points(&self) -> usize {
        self.layer_count as usize * self.points_per_layer as usize
    }
}

/// Position on the helix for a global parameter `t` in [0, 1)
pub fn point_at(t: f64, params: &SpiralParams) -> DVec3 {
    let angle = t * TAU * f64::from(params.layer_count);
    let radius = params.start_radius + (params.end_radius - params.start_radius) * t;
    DVec3::new(
        radius * angle.cos(),
        params.height / 2.0 - t * params.height,
        radius * angle.sin(),
    )
}

/// One winding of the backbone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiralLayer {
    /// Zero-based layer index (house id - 1)
    pub layer: u32,
    pub color: String,
    pub points: Vec<DVec3>,
}

impl SpiralLayer {
    /// House drawn on this layer
    pub fn house_id(&self) -> u32 {
        self.layer + 1
    }
}

/// Sample the full backbone, one polyline per layer
///
/// Layer colors cycle through `palette`; an empty palette draws white.
pub fn generate_spiral_backbone(params: &SpiralParams, palette: &[String]) -> Vec<SpiralLayer> {
    let total = params.total_points();
    if total == 0 {
        return Vec::new();
    }

    let per_layer = params.points_per_layer as usize;
    let mut layers: Vec<SpiralLayer> = (0..params.layer_count)
        .map(|layer| SpiralLayer {
            layer,
            color: if palette.is_empty() {
                "#FFFFFF".to_string()
            } else {
                palette[layer as usize % palette.len()].clone()
            },
            points: Vec::with_capacity(per_layer),
        })
        .collect();

    for i in 0..total {
        let t = i as f64 / total as f64;
        layers[i / per_layer].points.push(point_at(t, params));
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<String> {
        vec!["#111111".to_string(), "#222222".to_string()]
    }

    #[test]
    fn test_default_backbone_has_1200_points() {
        let params = SpiralParams::default();
        let layers = generate_spiral_backbone(&params, &palette());
        assert_eq!(layers.len(), 12);
        let total: usize = layers.iter().map(|l| l.points.len()).sum();
        assert_eq!(total, 1200);
        assert!(layers.iter().all(|l| l.points.len() == 100));
    }

    #[test]
    fn test_y_strictly_decreasing() {
        let params = SpiralParams::default();
        let points: Vec<DVec3> = generate_spiral_backbone(&params, &palette())
            .into_iter()
            .flat_map(|l| l.points)
            .collect();

        assert_eq!(points[0].y, params.height / 2.0);
        for pair in points.windows(2) {
            assert!(pair[1].y < pair[0].y);
        }
        let last = points[points.len() - 1].y;
        assert!(last > -params.height / 2.0);
        assert!((last + params.height / 2.0) < params.height / 100.0);
    }

    #[test]
    fn test_first_point_on_start_radius() {
        let params = SpiralParams::default();
        let p = point_at(0.0, &params);
        assert!((p.x - params.start_radius).abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_palette_cycles() {
        let layers = generate_spiral_backbone(&SpiralParams::default(), &palette());
        assert_eq!(layers[0].color, "#111111");
        assert_eq!(layers[1].color, "#222222");
        assert_eq!(layers[2].color, "#111111");
        assert_eq!(layers[11].house_id(), 12);
    }

    #[test]
    fn test_empty_params_yield_no_layers() {
        let params = SpiralParams { layer_count: 0, ..SpiralParams::default() };
        assert!(generate_spiral_backbone(&params, &[]).is_empty());
    }
}
