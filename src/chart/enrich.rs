//! Join a raw chart against the registry
//!
//! Enrichment never aborts on partial data. Anything the registry cannot
//! resolve is dropped and reported to the diagnostic sink; the rest of the
//! chart carries on.

use serde::Serialize;

use super::raw::{RawAspect, RawChart, RawHouse, RawPlanet};
use super::subject::BirthSubject;
use super::summary::{summarize, ChartSummary};
use crate::core::diagnostics::{DiagnosticEvent, DiagnosticKind, DiagnosticSink};
use crate::core::error::ChartError;
use crate::core::types::{AspectKind, Body, ZodiacSign, HOUSE_COUNT};
use crate::geometry::{aspect_strength, HouseCusps};
use crate::registry::{AspectTypeDescriptor, CelestialBody, House, Registry, Sign};

/// A placement with its registry descriptors attached
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedPlanet<'r> {
    pub body: &'r CelestialBody,
    pub sign: &'r Sign,
    /// House reported by the provider
    pub house: &'r House,
    pub degree: f64,
    pub retrograde: bool,
}

impl EnrichedPlanet<'_> {
    pub fn name(&self) -> Body {
        self.body.name
    }

    pub fn house_id(&self) -> u8 {
        self.house.id
    }
}

/// An aspect whose endpoints both survived enrichment
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedAspect<'r> {
    /// Index into `EnrichedChart::planets`
    pub from: usize,
    /// Index into `EnrichedChart::planets`
    pub to: usize,
    /// Kind as reported by the provider
    pub kind_name: String,
    pub kind: Option<AspectKind>,
    /// Absent when the registry has no descriptor for this kind
    pub descriptor: Option<&'r AspectTypeDescriptor>,
    pub orb: f64,
    pub exact: bool,
    pub applying: bool,
}

impl EnrichedAspect<'_> {
    /// Visual weight: tighter orbs draw stronger
    pub fn strength(&self) -> f64 {
        aspect_strength(self.orb)
    }
}

/// A house cusp with its registry descriptor
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedHouse<'r> {
    pub house: &'r House,
    pub sign: Option<ZodiacSign>,
    pub cusp: f64,
}

/// The enriched chart handed to the geometry and sentence engines
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedChart<'r> {
    pub subject: BirthSubject,
    pub planets: Vec<EnrichedPlanet<'r>>,
    pub aspects: Vec<EnrichedAspect<'r>>,
    pub houses: Vec<EnrichedHouse<'r>>,
    pub cusps: HouseCusps,
    pub dropped_planets: usize,
    pub dropped_aspects: usize,
}

impl<'r> EnrichedChart<'r> {
    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    pub fn planet(&self, body: Body) -> Option<&EnrichedPlanet<'r>> {
        self.planets.iter().find(|p| p.name() == body)
    }

    /// Both endpoints of an aspect
    pub fn endpoints(&self, aspect: &EnrichedAspect<'r>) -> (&EnrichedPlanet<'r>, &EnrichedPlanet<'r>) {
        (&self.planets[aspect.from], &self.planets[aspect.to])
    }

    /// Derived summary; fails with `EmptyChart` when no planet resolved
    pub fn summary(&self) -> Result<ChartSummary, ChartError> {
        summarize(self)
    }
}

fn miss(sink: &dyn DiagnosticSink, entity: &str, detail: String) {
    sink.emit(DiagnosticEvent::warning(DiagnosticKind::ResolutionMiss {
        entity: entity.to_string(),
        detail,
    }));
}

fn resolve_planet<'r>(
    raw: &RawPlanet,
    registry: &'r Registry,
) -> Result<EnrichedPlanet<'r>, String> {
    let body = registry
        .planet_by_name(&raw.name)
        .ok_or_else(|| format!("unknown body '{}'", raw.name))?;
    let sign = registry
        .sign_by_name(&raw.sign)
        .ok_or_else(|| format!("{}: unknown sign '{}'", raw.name, raw.sign))?;
    let house = u8::try_from(raw.house_id)
        .ok()
        .filter(|id| (1..=HOUSE_COUNT).contains(id))
        .and_then(|id| registry.house(id))
        .ok_or_else(|| format!("{}: house {} out of range", raw.name, raw.house_id))?;

    Ok(EnrichedPlanet {
        body,
        sign,
        house,
        degree: raw.degree,
        retrograde: raw.retrograde,
    })
}

fn resolve_aspect<'r>(
    raw: &RawAspect,
    planets: &[EnrichedPlanet<'r>],
    registry: &'r Registry,
) -> Result<EnrichedAspect<'r>, String> {
    let find = |name: &str| {
        Body::from_name(name).and_then(|body| planets.iter().position(|p| p.name() == body))
    };
    let from = find(&raw.p1_name)
        .ok_or_else(|| format!("{} {}-{}: '{}' not in chart", raw.kind, raw.p1_name, raw.p2_name, raw.p1_name))?;
    let to = find(&raw.p2_name)
        .ok_or_else(|| format!("{} {}-{}: '{}' not in chart", raw.kind, raw.p1_name, raw.p2_name, raw.p2_name))?;

    let kind = AspectKind::from_name(&raw.kind);
    let descriptor = kind.and_then(|k| registry.aspect(k));

    Ok(EnrichedAspect {
        from,
        to,
        kind_name: raw.kind.clone(),
        kind,
        descriptor,
        orb: raw.orb.abs(),
        exact: raw.exact,
        applying: raw.applying,
    })
}

/// Collect cusps by house id, falling back to equal houses for gaps
fn build_cusps(houses: &[RawHouse], sink: &dyn DiagnosticSink) -> HouseCusps {
    let mut slots: [Option<f64>; 12] = [None; 12];

    for house in houses {
        let Some(index) = usize::try_from(house.id)
            .ok()
            .filter(|id| (1..=usize::from(HOUSE_COUNT)).contains(id))
            .map(|id| id - 1)
        else {
            sink.emit(DiagnosticEvent::warning(DiagnosticKind::MalformedGeometryInput {
                detail: format!("house id {} out of range", house.id),
            }));
            continue;
        };

        if !house.cusp_degree.is_finite() {
            sink.emit(DiagnosticEvent::warning(DiagnosticKind::MalformedGeometryInput {
                detail: format!("house {} cusp is not a number", house.id),
            }));
            continue;
        }

        if slots[index].is_some() {
            sink.emit(DiagnosticEvent::warning(DiagnosticKind::MalformedGeometryInput {
                detail: format!("house {} listed twice; keeping the first cusp", house.id),
            }));
            continue;
        }
        slots[index] = Some(house.cusp_degree);
    }

    let mut cusps = [0.0; 12];
    for (i, slot) in slots.iter().enumerate() {
        cusps[i] = match slot {
            Some(degree) => *degree,
            None => {
                let fallback = i as f64 * 30.0;
                sink.emit(DiagnosticEvent::warning(DiagnosticKind::MalformedGeometryInput {
                    detail: format!("house {} cusp missing; using {}°", i + 1, fallback),
                }));
                fallback
            }
        };
    }

    HouseCusps::new(cusps)
}

/// Enrich a raw chart
///
/// Planets are resolved first; aspects are then matched against the
/// surviving planets only, so an aspect touching a dropped planet is dropped
/// too. Unknown aspect kinds pass through without a descriptor.
pub fn enrich<'r>(
    raw: &RawChart,
    subject: BirthSubject,
    registry: &'r Registry,
    sink: &dyn DiagnosticSink,
) -> EnrichedChart<'r> {
    let mut planets: Vec<EnrichedPlanet<'r>> = Vec::with_capacity(raw.planets.len());
    let mut dropped_planets = 0;

    for raw_planet in &raw.planets {
        match resolve_planet(raw_planet, registry) {
            Ok(planet) if planets.iter().any(|p| p.name() == planet.name()) => {
                dropped_planets += 1;
                miss(sink, "planet", format!("{} listed twice; keeping the first", planet.name()));
            }
            Ok(planet) => planets.push(planet),
            Err(detail) => {
                dropped_planets += 1;
                miss(sink, "planet", detail);
            }
        }
    }

    let mut aspects = Vec::with_capacity(raw.aspects.len());
    let mut dropped_aspects = 0;

    for raw_aspect in &raw.aspects {
        match resolve_aspect(raw_aspect, &planets, registry) {
            Ok(aspect) => {
                if aspect.descriptor.is_none() {
                    tracing::debug!(kind = %aspect.kind_name, "Aspect kind has no descriptor");
                }
                aspects.push(aspect);
            }
            Err(detail) => {
                dropped_aspects += 1;
                miss(sink, "aspect", detail);
            }
        }
    }

    let houses = raw
        .houses
        .iter()
        .filter_map(|h| {
            let id = u8::try_from(h.id).ok()?;
            Some(EnrichedHouse {
                house: registry.house(id)?,
                sign: ZodiacSign::from_name(&h.sign),
                cusp: h.cusp_degree,
            })
        })
        .collect();

    let cusps = build_cusps(&raw.houses, sink);

    sink.emit(DiagnosticEvent::info(DiagnosticKind::ChartEnriched {
        planets: planets.len(),
        aspects: aspects.len(),
        dropped_planets,
        dropped_aspects,
    }));

    EnrichedChart {
        subject,
        planets,
        aspects,
        houses,
        cusps,
        dropped_planets,
        dropped_aspects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::{NullSink, RecordingSink};

    fn raw_planet(name: &str, sign: &str, house_id: i32, degree: f64) -> RawPlanet {
        RawPlanet {
            name: name.to_string(),
            sign: sign.to_string(),
            house_id,
            degree,
            retrograde: false,
        }
    }

    fn raw_aspect(a: &str, b: &str, kind: &str, orb: f64) -> RawAspect {
        RawAspect {
            p1_name: a.to_string(),
            p2_name: b.to_string(),
            kind: kind.to_string(),
            orb,
            exact: false,
            applying: true,
        }
    }

    fn equal_houses() -> Vec<RawHouse> {
        (1..=12)
            .map(|id| RawHouse {
                id,
                sign: ZodiacSign::ALL[(id - 1) as usize].name().to_string(),
                cusp_degree: f64::from(id - 1) * 30.0,
            })
            .collect()
    }

    #[test]
    fn test_unknown_planet_dropped_with_warning() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![
                raw_planet("Sun", "Aries", 1, 5.0),
                raw_planet("Chiron", "Aries", 1, 8.0),
                raw_planet("Moon", "Narnia", 4, 95.0),
                raw_planet("Mars", "Leo", 13, 130.0),
            ],
            houses: equal_houses(),
            aspects: vec![],
        };
        let sink = RecordingSink::new();
        let chart = enrich(&raw, BirthSubject::named("Test"), &registry, &sink);

        assert_eq!(chart.planets.len(), 1);
        assert_eq!(chart.dropped_planets, 3);
        assert_eq!(sink.warning_count(), 3);
    }

    #[test]
    fn test_aspect_against_dropped_planet_is_dropped() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![
                raw_planet("Sun", "Aries", 1, 5.0),
                raw_planet("Moon", "Cancer", 4, 95.0),
                raw_planet("Chiron", "Aries", 1, 8.0),
            ],
            houses: equal_houses(),
            aspects: vec![
                raw_aspect("Sun", "Moon", "Square", 2.0),
                raw_aspect("Chiron", "Sun", "Conjunction", 3.0),
                raw_aspect("Sun", "Node", "Trine", 1.0),
            ],
        };
        let chart = enrich(&raw, BirthSubject::named("Test"), &registry, &NullSink);

        assert_eq!(chart.aspects.len(), 1);
        assert_eq!(chart.dropped_aspects, 2);
        let (a, b) = chart.endpoints(&chart.aspects[0]);
        assert_eq!(a.name(), Body::Sun);
        assert_eq!(b.name(), Body::Moon);
        assert_eq!(chart.aspects[0].descriptor.unwrap().kind, AspectKind::Square);
    }

    #[test]
    fn test_unknown_aspect_kind_passes_without_descriptor() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![
                raw_planet("Sun", "Aries", 1, 5.0),
                raw_planet("Venus", "Virgo", 6, 155.0),
            ],
            houses: equal_houses(),
            aspects: vec![raw_aspect("sun", "VENUS", "Quincunx", 0.5)],
        };
        let chart = enrich(&raw, BirthSubject::named("Test"), &registry, &NullSink);

        assert_eq!(chart.aspects.len(), 1);
        assert!(chart.aspects[0].kind.is_none());
        assert!(chart.aspects[0].descriptor.is_none());
        assert_eq!(chart.aspects[0].kind_name, "Quincunx");
    }

    #[test]
    fn test_duplicate_planet_keeps_first() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![
                raw_planet("Sun", "Aries", 1, 5.0),
                raw_planet("sun", "Leo", 5, 125.0),
            ],
            houses: equal_houses(),
            aspects: vec![],
        };
        let chart = enrich(&raw, BirthSubject::named("Test"), &registry, &NullSink);
        assert_eq!(chart.planets.len(), 1);
        assert_eq!(chart.planets[0].degree, 5.0);
    }

    #[test]
    fn test_missing_cusps_fall_back_to_equal_houses() {
        let registry = Registry::bundled().unwrap();
        let mut houses = equal_houses();
        houses.retain(|h| h.id != 7);
        houses[0].cusp_degree = 10.0;
        let raw = RawChart { planets: vec![], houses, aspects: vec![] };

        let sink = RecordingSink::new();
        let chart = enrich(&raw, BirthSubject::named("Test"), &registry, &sink);

        assert_eq!(chart.cusps.cusp(1), 10.0);
        assert_eq!(chart.cusps.cusp(7), 180.0);
        assert_eq!(chart.houses.len(), 11);
        assert!(sink.events().iter().any(|e| matches!(
            &e.kind,
            DiagnosticKind::MalformedGeometryInput { detail } if detail.contains("house 7")
        )));
    }

    #[test]
    fn test_empty_chart_summary_is_explicit_error() {
        let registry = Registry::bundled().unwrap();
        let raw = RawChart {
            planets: vec![raw_planet("Ceres", "Virgo", 6, 160.0)],
            houses: equal_houses(),
            aspects: vec![],
        };
        let chart = enrich(&raw, BirthSubject::named("Test"), &registry, &NullSink);
        assert!(chart.is_empty());
        assert_eq!(chart.summary().unwrap_err(), ChartError::EmptyChart { dropped: 1 });
    }
}
