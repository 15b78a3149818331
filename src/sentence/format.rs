//! Semantic formatting of resolved values
//!
//! Resolved payload values become display text here: name lists, intensity
//! adverbs, tension phrases and aspect nouns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker shown in place of anything that could not be resolved
pub const FALLBACK_MARKER: &str = "\u{2014}";

/// Share above which one side of the hard/soft split names the whole
pub const TENSION_DOMINANCE: f64 = 0.65;

/// Formatting a template variable asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatter {
    /// Join names: "A", "A and B", "A, B, and C"
    List,
    /// Scalar in [0, 1] to an adverb
    Intensity,
    /// Hard share in [0, 1] to a qualitative phrase
    TensionRatio,
    /// Aspect kind to its poetic noun
    AspectNoun,
    Lowercase,
    /// Whole degrees with a degree sign
    Degrees,
}

/// Join names with an Oxford comma; an empty list renders `marker`
pub fn format_centers<S: AsRef<str>>(names: &[S], marker: &str) -> String {
    match names {
        [] => marker.to_string(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(|s| s.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Map an intensity in [0, 1] to an adverb
pub fn format_intensity_adverb(intensity: f64) -> &'static str {
    if intensity >= 0.85 {
        "undeniably"
    } else if intensity >= 0.60 {
        "clearly"
    } else if intensity >= 0.35 {
        "subtly"
    } else {
        "in whispers"
    }
}

/// Describe the hard/soft aspect split from the hard share in [0, 1]
pub fn format_tension_ratio(hard_share: f64) -> String {
    let hard = hard_share.clamp(0.0, 1.0);
    let soft = 1.0 - hard;
    if hard > TENSION_DOMINANCE {
        "toward friction and challenge".to_string()
    } else if soft > TENSION_DOMINANCE {
        "toward flow and ease".to_string()
    } else {
        let hard_pct = (hard * 100.0).round() as u32;
        format!("{}% friction and {}% flow", hard_pct, 100 - hard_pct)
    }
}

/// Poetic noun for an aspect kind; unknown kinds fall back to lower case
pub fn aspect_noun(kind: &str) -> String {
    match kind.trim().to_ascii_lowercase().as_str() {
        "conjunction" => "fusion of forces".to_string(),
        "opposition" => "tug of opposites".to_string(),
        "square" => "engine of friction".to_string(),
        "trine" => "current of ease".to_string(),
        "sextile" => "open doorway".to_string(),
        other => other.to_string(),
    }
}

/// `dominant_element` -> `Dominant Element`
pub fn humanize(segment: &str) -> String {
    segment
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain text for a value when no formatter is requested
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "yes" } else { "no" }.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| {
                    let rounded = (f * 100.0).round() / 100.0;
                    format!("{}", rounded)
                })
            }
        }
        Value::Array(items) => {
            let names: Vec<String> = items.iter().filter_map(display_value).collect();
            (!names.is_empty()).then(|| format_centers(&names, FALLBACK_MARKER))
        }
        Value::Object(map) => map.get("name").and_then(display_value),
    }
}

/// Apply a formatter; `None` when the value does not fit it
pub fn apply_formatter(formatter: Formatter, value: &Value) -> Option<String> {
    match formatter {
        Formatter::List => match value {
            Value::Array(items) => {
                let names: Vec<String> = items.iter().filter_map(display_value).collect();
                (!names.is_empty()).then(|| format_centers(&names, FALLBACK_MARKER))
            }
            other => display_value(other),
        },
        Formatter::Intensity => value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| format_intensity_adverb(f).to_string()),
        Formatter::TensionRatio => value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(format_tension_ratio),
        Formatter::AspectNoun => display_value(value).map(|kind| aspect_noun(&kind)),
        Formatter::Lowercase => display_value(value).map(|s| s.to_lowercase()),
        Formatter::Degrees => value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| format!("{}°", f.floor() as i64)),
    }
}
