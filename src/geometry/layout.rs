//! Scene layouts built from an enriched chart
//!
//! These are what the renderer consumes: positioned bodies and aspect lines
//! for the spiral view, and the node/link network for the constellation view.

use glam::DVec3;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;

use super::placement::{place_body, BodyPlacement};
use super::sphere::place_on_sphere;
use super::spiral::SpiralParams;
use crate::chart::EnrichedChart;
use crate::core::types::Body;
use crate::registry::Registry;

/// A body positioned on the spiral
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBody {
    pub body: Body,
    pub glyph: Option<String>,
    pub body_color: String,
    /// Color of the house the body was placed in
    pub house_color: String,
    pub retrograde: bool,
    pub placement: BodyPlacement,
}

/// A line joining two placed bodies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectLine {
    pub from: Body,
    pub to: Body,
    pub kind: String,
    pub start: DVec3,
    pub end: DVec3,
    pub color: String,
    pub strength: f64,
}

/// Position every enriched planet on the helix
///
/// The house color follows the house the cusps place the body in, which can
/// differ from the house the chart source reported.
pub fn place_planets(chart: &EnrichedChart<'_>, registry: &Registry, params: &SpiralParams) -> Vec<PlacedBody> {
    chart
        .planets
        .iter()
        .map(|planet| {
            let placement = place_body(planet.degree, &chart.cusps, params);
            let house_color = registry
                .house(placement.house)
                .map(|h| h.color.clone())
                .unwrap_or_else(|| planet.house.color.clone());

            PlacedBody {
                body: planet.name(),
                glyph: planet.body.glyph.clone(),
                body_color: planet.body.color.clone(),
                house_color,
                retrograde: planet.retrograde,
                placement,
            }
        })
        .collect()
}

/// One line per enriched aspect, between the helix positions of its bodies
pub fn aspect_lines(
    chart: &EnrichedChart<'_>,
    params: &SpiralParams,
    default_color: &str,
) -> Vec<AspectLine> {
    chart
        .aspects
        .iter()
        .map(|aspect| {
            let (a, b) = chart.endpoints(aspect);
            AspectLine {
                from: a.name(),
                to: b.name(),
                kind: aspect.kind_name.clone(),
                start: place_body(a.degree, &chart.cusps, params).position,
                end: place_body(b.degree, &chart.cusps, params).position,
                color: aspect
                    .descriptor
                    .map(|d| d.color.clone())
                    .unwrap_or_else(|| default_color.to_string()),
                strength: aspect.strength(),
            }
        })
        .collect()
}

/// A body on the constellation sphere
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstellationNode {
    pub body: Body,
    pub label: String,
    pub color: String,
    pub position: DVec3,
}

/// An aspect drawn between two constellation nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstellationLink {
    /// Index into `Constellation::nodes`
    pub from: usize,
    /// Index into `Constellation::nodes`
    pub to: usize,
    pub kind: String,
    pub color: String,
    pub strength: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Constellation {
    pub nodes: Vec<ConstellationNode>,
    pub links: Vec<ConstellationLink>,
}

/// Lay the chart's bodies on a sphere and link its strongest aspects
///
/// Links are ranked by strength, then by smaller orb, then by input order,
/// and cut to `max_links`.
pub fn build_constellation(
    chart: &EnrichedChart<'_>,
    radius: f64,
    max_links: usize,
    default_color: &str,
) -> Constellation {
    let count = chart.planets.len();
    let nodes = chart
        .planets
        .iter()
        .enumerate()
        .map(|(i, planet)| ConstellationNode {
            body: planet.name(),
            label: planet.body.archetype_figure_name.clone(),
            color: planet.body.color.clone(),
            position: place_on_sphere(i, count, radius),
        })
        .collect();

    let mut ranked: Vec<usize> = (0..chart.aspects.len()).collect();
    // sort_by_key is stable, so equal keys keep input order
    ranked.sort_by_key(|&i| {
        let aspect = &chart.aspects[i];
        (Reverse(OrderedFloat(aspect.strength())), OrderedFloat(aspect.orb))
    });

    let links = ranked
        .into_iter()
        .take(max_links)
        .map(|i| {
            let aspect = &chart.aspects[i];
            ConstellationLink {
                from: aspect.from,
                to: aspect.to,
                kind: aspect.kind_name.clone(),
                color: aspect
                    .descriptor
                    .map(|d| d.color.clone())
                    .unwrap_or_else(|| default_color.to_string()),
                strength: aspect.strength(),
            }
        })
        .collect();

    Constellation { nodes, links }
}
