//! Chart-wide summary derived from the enriched planets and aspects

use serde::Serialize;
use std::collections::BTreeMap;

use super::enrich::EnrichedChart;
use crate::core::error::ChartError;
use crate::core::types::{AspectHarmony, Body, Element, Modality};

/// Ratio one aspect family must exceed the other by to set the mood
pub const MOOD_DOMINANCE_RATIO: f64 = 1.5;

/// Overall feel of the aspect web
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMood {
    Harmonious,
    Dynamic,
    Balanced,
}

impl AspectMood {
    pub fn name(&self) -> &'static str {
        match self {
            AspectMood::Harmonious => "harmonious",
            AspectMood::Dynamic => "dynamic",
            AspectMood::Balanced => "balanced",
        }
    }

    /// Harmonious when harmonic aspects outnumber tension ones by more than
    /// 1.5x, dynamic for the reverse, balanced otherwise
    pub fn from_counts(harmonic: usize, tension: usize) -> Self {
        let (h, t) = (harmonic as f64, tension as f64);
        if h > t * MOOD_DOMINANCE_RATIO {
            AspectMood::Harmonious
        } else if t > h * MOOD_DOMINANCE_RATIO {
            AspectMood::Dynamic
        } else {
            AspectMood::Balanced
        }
    }
}

/// Derived summary of an enriched chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub dominant_element: Element,
    pub dominant_mode: Modality,
    /// House id with the most occupants
    pub primary_house: u8,
    /// The Sun if present, else the first planet
    pub signature: Body,
    /// Index of the signature planet in `EnrichedChart::planets`
    pub signature_index: usize,
    pub aspect_mood: AspectMood,
    /// Element tallies in first-seen order
    pub element_counts: Vec<(Element, usize)>,
    /// Modality tallies in first-seen order
    pub mode_counts: Vec<(Modality, usize)>,
    pub house_occupants: BTreeMap<u8, Vec<Body>>,
    /// Planets sitting in the primary house
    pub centers: Vec<Body>,
    pub harmonic_aspects: usize,
    pub tension_aspects: usize,
    /// Share of tension among classified aspects; None without any
    pub tension_ratio: Option<f64>,
    pub retrograde_count: usize,
    /// Index of the smallest-orb aspect in `EnrichedChart::aspects`
    pub tightest_aspect: Option<usize>,
}

/// Tally values in first-seen order
fn tally<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}

/// Plurality winner; a tie keeps whichever value was tallied first
fn plurality<T: Copy>(counts: &[(T, usize)]) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for &(value, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

/// Compute the summary for a chart
pub fn summarize(chart: &EnrichedChart<'_>) -> Result<ChartSummary, ChartError> {
    if chart.planets.is_empty() {
        return Err(ChartError::EmptyChart { dropped: chart.dropped_planets });
    }

    let element_counts = tally(chart.planets.iter().map(|p| p.sign.element));
    let mode_counts = tally(chart.planets.iter().map(|p| p.sign.modality));

    let mut house_occupants: BTreeMap<u8, Vec<Body>> = BTreeMap::new();
    for planet in &chart.planets {
        house_occupants.entry(planet.house_id()).or_default().push(planet.name());
    }

    // Ascending key order: on a tie the lowest house id wins
    let mut primary: Option<(u8, usize)> = None;
    for (&id, bodies) in &house_occupants {
        if primary.map_or(true, |(_, top)| bodies.len() > top) {
            primary = Some((id, bodies.len()));
        }
    }

    let signature_index = chart
        .planets
        .iter()
        .position(|p| p.name() == Body::Sun)
        .unwrap_or(0);

    let mut harmonic_aspects = 0;
    let mut tension_aspects = 0;
    for aspect in &chart.aspects {
        match aspect.kind.map(|k| k.harmony()) {
            Some(AspectHarmony::Harmonic) => harmonic_aspects += 1,
            Some(AspectHarmony::Tension) => tension_aspects += 1,
            None => {}
        }
    }
    let classified = harmonic_aspects + tension_aspects;
    let tension_ratio = (classified > 0).then(|| tension_aspects as f64 / classified as f64);

    let tightest_aspect = chart
        .aspects
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.orb.total_cmp(&b.orb))
        .map(|(i, _)| i);

    let (Some(dominant_element), Some(dominant_mode), Some((primary_house, _))) =
        (plurality(&element_counts), plurality(&mode_counts), primary)
    else {
        return Err(ChartError::EmptyChart { dropped: chart.dropped_planets });
    };

    let centers = house_occupants.get(&primary_house).cloned().unwrap_or_default();

    Ok(ChartSummary {
        dominant_element,
        dominant_mode,
        primary_house,
        signature: chart.planets[signature_index].name(),
        signature_index,
        aspect_mood: AspectMood::from_counts(harmonic_aspects, tension_aspects),
        element_counts,
        mode_counts,
        house_occupants,
        centers,
        harmonic_aspects,
        tension_aspects,
        tension_ratio,
        retrograde_count: chart.planets.iter().filter(|p| p.retrograde).count(),
        tightest_aspect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::enrich::enrich;
    use crate::chart::raw::{RawAspect, RawChart, RawPlanet};
    use crate::chart::subject::BirthSubject;
    use crate::core::diagnostics::NullSink;
    use crate::registry::Registry;

    fn planet(name: &str, sign: &str, house_id: i32) -> RawPlanet {
        RawPlanet {
            name: name.to_string(),
            sign: sign.to_string(),
            house_id,
            degree: 0.0,
            retrograde: false,
        }
    }

    fn aspect(kind: &str, orb: f64) -> RawAspect {
        RawAspect {
            p1_name: "Moon".to_string(),
            p2_name: "Mars".to_string(),
            kind: kind.to_string(),
            orb,
            exact: false,
            applying: false,
        }
    }

    #[test]
    fn test_mood_thresholds() {
        assert_eq!(AspectMood::from_counts(4, 2), AspectMood::Harmonious);
        assert_eq!(AspectMood::from_counts(3, 2), AspectMood::Balanced);
        assert_eq!(AspectMood::from_counts(2, 4), AspectMood::Dynamic);
        assert_eq!(AspectMood::from_counts(0, 0), AspectMood::Balanced);
        assert_eq!(AspectMood::from_counts(1, 0), AspectMood::Harmonious);
    }

    #[test]
    fn test_element_tie_keeps_first_seen() {
        let registry = Registry::bundled().unwrap();
        // Water (Cancer) is seen first, Fire (Leo) second: 2 vs 2
        let raw = RawChart {
            planets: vec![
                planet("Moon", "Cancer", 4),
                planet("Mars", "Leo", 5),
                planet("Venus", "Pisces", 12),
                planet("Jupiter", "Aries", 1),
            ],
            houses: vec![],
            aspects: vec![],
        };
        let chart = enrich(&raw, BirthSubject::named("T"), &registry, &NullSink);
        let summary = chart.summary().unwrap();
        assert_eq!(summary.dominant_element, Element::Water);
        // Cardinal (Cancer, Aries) beats Fixed and Mutable
        assert_eq!(summary.dominant_mode, Modality::Cardinal);
    }

    #[test]
    fn test_primary_house_tie_goes_to_lowest_id() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![
                planet("Moon", "Cancer", 9),
                planet("Mars", "Leo", 9),
                planet("Venus", "Pisces", 3),
                planet("Mercury", "Pisces", 3),
            ],
            houses: vec![],
            aspects: vec![],
        };
        let chart = enrich(&raw, BirthSubject::named("T"), &registry, &NullSink);
        let summary = chart.summary().unwrap();
        assert_eq!(summary.primary_house, 3);
        assert_eq!(summary.centers, vec![Body::Venus, Body::Mercury]);
    }

    #[test]
    fn test_signature_prefers_sun() {
        let registry = Registry::bundled().unwrap();
        let mut raw = RawChart {
            planets: vec![planet("Moon", "Cancer", 4), planet("Sun", "Leo", 5)],
            houses: vec![],
            aspects: vec![],
        };
        let chart = enrich(&raw, BirthSubject::named("T"), &registry, &NullSink);
        assert_eq!(chart.summary().unwrap().signature, Body::Sun);
        assert_eq!(chart.summary().unwrap().signature_index, 1);

        raw.planets.remove(1);
        let chart = enrich(&raw, BirthSubject::named("T"), &registry, &NullSink);
        assert_eq!(chart.summary().unwrap().signature, Body::Moon);
    }

    #[test]
    fn test_aspect_counts_and_tightest() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![planet("Moon", "Cancer", 4), planet("Mars", "Leo", 5)],
            houses: vec![],
            aspects: vec![
                aspect("Trine", 3.0),
                aspect("Square", 1.0),
                aspect("Quincunx", 0.2),
                aspect("Sextile", 1.0),
            ],
        };
        let chart = enrich(&raw, BirthSubject::named("T"), &registry, &NullSink);
        let summary = chart.summary().unwrap();

        assert_eq!(summary.harmonic_aspects, 2);
        assert_eq!(summary.tension_aspects, 1);
        assert_eq!(summary.aspect_mood, AspectMood::Harmonious);
        assert!((summary.tension_ratio.unwrap() - 1.0 / 3.0).abs() < 1e-12);
        // The unclassified Quincunx still has the tightest orb
        assert_eq!(summary.tightest_aspect, Some(2));
    }
}
