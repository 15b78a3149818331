//! Chart payload consumed by template placeholders
//!
//! The payload is a JSON tree so that templates can reach any value through a
//! dotted path:
//!
//! - `subject.name`
//! - `summary.{dominant_element, dominant_mode, primary_house, signature,
//!   aspect_mood, centers, tension_ratio, intensity, retrograde_count,
//!   planet_count}`
//! - `planets[N]` and one entry per lower-cased body name (`sun`, `moon`, ...)
//! - `top_aspect.{a_planet, b_planet, type, orb, strength, a_house, b_house}`
//! - `aspects[N]`
//! - `focus` (a planet entry) and `focus_aspect` when a view narrows in

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::chart::{BirthSubject, ChartSummary, EnrichedAspect, EnrichedChart, EnrichedPlanet};
use crate::core::types::{normalize_degrees, Body};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChartPayload {
    value: Value,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn planet_entry(planet: &EnrichedPlanet<'_>) -> Value {
    let degree = normalize_degrees(planet.degree);
    json!({
        "name": planet.name().name(),
        "sign": planet.sign.name.name(),
        "house": planet.house_id(),
        "house_name": planet.house.name,
        "degree": round2(degree),
        "degree_in_sign": round2(degree % 30.0),
        "retrograde": planet.retrograde,
        "archetype": planet.body.archetype_name,
        "figure": planet.body.archetype_figure_name,
        "essence": planet.body.essence,
        "element": planet.sign.element.name(),
        "mode": planet.sign.modality.name(),
        "motif": planet.body.visual_elements.first(),
    })
}

fn aspect_entry(chart: &EnrichedChart<'_>, aspect: &EnrichedAspect<'_>) -> Value {
    let (a, b) = chart.endpoints(aspect);
    json!({
        "a_planet": a.name().name(),
        "b_planet": b.name().name(),
        "type": aspect.kind_name,
        "orb": round2(aspect.orb),
        "strength": round2(aspect.strength()),
        "a_house": a.house_id(),
        "b_house": b.house_id(),
        "exact": aspect.exact,
        "applying": aspect.applying,
    })
}

impl ChartPayload {
    /// Build the full payload for an enriched chart and its summary
    pub fn build(chart: &EnrichedChart<'_>, summary: &ChartSummary) -> Self {
        let mut root = Map::new();
        root.insert("subject".to_string(), json!({ "name": chart.subject.name }));

        let primary_house = chart
            .planets
            .iter()
            .map(|p| p.house)
            .find(|h| h.id == summary.primary_house)
            .map(|h| {
                json!({
                    "id": h.id,
                    "name": h.name,
                    "essence": h.essence,
                    "keywords": h.keywords,
                })
            })
            .unwrap_or(Value::Null);

        let signature = chart
            .planets
            .get(summary.signature_index)
            .map(planet_entry)
            .unwrap_or(Value::Null);

        let tightest = summary.tightest_aspect.and_then(|i| chart.aspects.get(i));

        root.insert(
            "summary".to_string(),
            json!({
                "dominant_element": summary.dominant_element.name(),
                "dominant_mode": summary.dominant_mode.name(),
                "primary_house": primary_house,
                "signature": signature,
                "aspect_mood": summary.aspect_mood.name(),
                "centers": summary.centers.iter().map(|b| b.name()).collect::<Vec<_>>(),
                "tension_ratio": summary.tension_ratio.map(round2),
                "intensity": tightest.map(|a| round2(a.strength())),
                "retrograde_count": summary.retrograde_count,
                "planet_count": chart.planets.len(),
            }),
        );

        let planets: Vec<Value> = chart.planets.iter().map(planet_entry).collect();
        for (planet, entry) in chart.planets.iter().zip(&planets) {
            root.insert(planet.name().name().to_lowercase(), entry.clone());
        }
        root.insert("planets".to_string(), Value::Array(planets));

        root.insert(
            "top_aspect".to_string(),
            tightest.map(|a| aspect_entry(chart, a)).unwrap_or(Value::Null),
        );
        root.insert(
            "aspects".to_string(),
            Value::Array(chart.aspects.iter().map(|a| aspect_entry(chart, a)).collect()),
        );

        Self { value: Value::Object(root) }
    }

    /// Payload for a chart with nothing resolved: only the subject is known
    pub fn empty(subject: &BirthSubject) -> Self {
        Self {
            value: json!({
                "subject": { "name": subject.name },
                "summary": { "planet_count": 0 },
                "planets": [],
                "top_aspect": null,
                "aspects": [],
            }),
        }
    }

    /// Narrow the payload onto one planet under `focus`
    pub fn with_focus(mut self, body: Body) -> Self {
        let entry = self.value.get(body.name().to_lowercase()).cloned().unwrap_or(Value::Null);
        if let Some(root) = self.value.as_object_mut() {
            root.insert("focus".to_string(), entry);
        }
        self
    }

    /// Narrow the payload onto one aspect under `focus_aspect`
    pub fn with_aspect_focus(mut self, index: usize) -> Self {
        let entry = self
            .value
            .get("aspects")
            .and_then(|a| a.get(index))
            .cloned()
            .unwrap_or(Value::Null);
        if let Some(root) = self.value.as_object_mut() {
            root.insert("focus_aspect".to_string(), entry);
        }
        self
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Value> for ChartPayload {
    fn from(value: Value) -> Self {
        Self { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{enrich, RawAspect, RawChart, RawHouse, RawPlanet};
    use crate::core::diagnostics::NullSink;
    use crate::registry::Registry;

    fn raw_chart() -> RawChart {
        let planet = |name: &str, sign: &str, house_id: i32, degree: f64, retrograde: bool| RawPlanet {
            name: name.to_string(),
            sign: sign.to_string(),
            house_id,
            degree,
            retrograde,
        };
        RawChart {
            planets: vec![
                planet("Sun", "Aries", 1, 5.0, false),
                planet("Moon", "Cancer", 4, 95.0, false),
                planet("Mars", "Aries", 1, 12.5, true),
            ],
            houses: (1..=12)
                .map(|id| RawHouse {
                    id,
                    sign: String::new(),
                    cusp_degree: f64::from(id - 1) * 30.0,
                })
                .collect(),
            aspects: vec![
                RawAspect {
                    p1_name: "Sun".to_string(),
                    p2_name: "Moon".to_string(),
                    kind: "Square".to_string(),
                    orb: 2.0,
                    exact: false,
                    applying: true,
                },
                RawAspect {
                    p1_name: "Sun".to_string(),
                    p2_name: "Mars".to_string(),
                    kind: "Conjunction".to_string(),
                    orb: 7.5,
                    exact: false,
                    applying: false,
                },
            ],
        }
    }

    #[test]
    fn test_payload_shape() {
        let registry = Registry::bundled().unwrap();
        let chart = enrich(&raw_chart(), BirthSubject::named("Ada"), &registry, &NullSink);
        let summary = chart.summary().unwrap();
        let payload = ChartPayload::build(&chart, &summary);
        let v = payload.as_value();

        assert_eq!(v["subject"]["name"], "Ada");
        assert_eq!(v["summary"]["dominant_element"], "Fire");
        assert_eq!(v["summary"]["primary_house"]["id"], 1);
        assert_eq!(v["summary"]["centers"], json!(["Sun", "Mars"]));
        assert_eq!(v["summary"]["signature"]["name"], "Sun");
        assert_eq!(v["summary"]["intensity"], json!(0.8));
        assert_eq!(v["summary"]["retrograde_count"], 1);
        assert_eq!(v["summary"]["tension_ratio"], json!(0.5));
        assert_eq!(v["sun"]["house"], 1);
        assert_eq!(v["mars"]["degree_in_sign"], json!(12.5));
        assert_eq!(v["top_aspect"]["type"], "Square");
        assert_eq!(v["top_aspect"]["b_house"], 4);
        assert_eq!(v["planets"].as_array().map(Vec::len), Some(3));
        assert!(v.get("venus").is_none());
    }

    #[test]
    fn test_focus_views() {
        let registry = Registry::bundled().unwrap();
        let chart = enrich(&raw_chart(), BirthSubject::named("Ada"), &registry, &NullSink);
        let summary = chart.summary().unwrap();
        let payload = ChartPayload::build(&chart, &summary)
            .with_focus(Body::Moon)
            .with_aspect_focus(1);

        assert_eq!(payload.as_value()["focus"]["sign"], "Cancer");
        assert_eq!(payload.as_value()["focus_aspect"]["type"], "Conjunction");

        let missing = ChartPayload::build(&chart, &summary).with_focus(Body::Pluto);
        assert!(missing.as_value()["focus"].is_null());
    }

    #[test]
    fn test_empty_payload() {
        let payload = ChartPayload::empty(&BirthSubject::named("Nobody"));
        assert_eq!(payload.as_value()["subject"]["name"], "Nobody");
        assert!(payload.as_value()["top_aspect"].is_null());
    }
}
