//! Typed placeholder paths
//!
//! A placeholder names a value in the payload with a closed grammar:
//!
//! ```text
//! path    := segment ( "." segment )* index?
//! segment := [A-Za-z_][A-Za-z0-9_]*
//! index   := "[" digits "]"
//! ```
//!
//! e.g. `top_aspect.a_planet` or `summary.centers[0]`.

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair},
    IResult, Parser,
};
use serde_json::Value;

/// Rejected placeholder text
#[derive(Debug, Clone, PartialEq)]
pub struct PathError {
    pub path: String,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid placeholder path: '{}'", self.path)
    }
}

impl std::error::Error for PathError {}

/// A parsed placeholder path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    segments: Vec<String>,
    index: Option<usize>,
}

/// Outcome of walking a path through a payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Found(&'a Value),
    Missing,
}

impl<'a> Resolved<'a> {
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolved::Found(v) => Some(v),
            Resolved::Missing => None,
        }
    }
}

fn segment(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    delimited(char('['), map_res(digit1, |d: &str| d.parse::<usize>()), char(']')).parse(input)
}

fn path(input: &str) -> IResult<&str, (Vec<&str>, Option<usize>)> {
    (separated_list1(char('.'), segment), opt(index)).parse(input)
}

impl PathExpr {
    /// Parse placeholder text; surrounding whitespace is ignored
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let (_, (segments, index)) = all_consuming(path)
            .parse(text.trim())
            .map_err(|_| PathError { path: text.to_string() })?;

        Ok(Self {
            segments: segments.into_iter().map(str::to_string).collect(),
            index,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Final named segment (never empty for a parsed path)
    pub fn last_segment(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Walk the payload; `null` counts as missing
    pub fn resolve<'a>(&self, payload: &'a Value) -> Resolved<'a> {
        let mut current = payload;
        for segment in &self.segments {
            match current.as_object().and_then(|map| map.get(segment)) {
                Some(next) => current = next,
                None => return Resolved::Missing,
            }
        }

        if let Some(i) = self.index {
            match current.as_array().and_then(|items| items.get(i)) {
                Some(item) => current = item,
                None => return Resolved::Missing,
            }
        }

        if current.is_null() {
            Resolved::Missing
        } else {
            Resolved::Found(current)
        }
    }
}

impl std::fmt::Display for PathExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))?;
        if let Some(i) = self.index {
            write!(f, "[{}]", i)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dotted_path() {
        let path = PathExpr::parse("top_aspect.a_planet").unwrap();
        assert_eq!(path.segments(), &["top_aspect".to_string(), "a_planet".to_string()]);
        assert_eq!(path.index(), None);
        assert_eq!(path.last_segment(), "a_planet");
    }

    #[test]
    fn test_parse_trailing_index() {
        let path = PathExpr::parse(" summary.centers[2] ").unwrap();
        assert_eq!(path.index(), Some(2));
        assert_eq!(path.to_string(), "summary.centers[2]");
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for bad in ["", "a.", ".a", "a..b", "1abc", "a[1].b", "a[x]", "a b", "a[1][2]", "a-b"] {
            assert!(PathExpr::parse(bad).is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_resolve_found_and_missing() {
        let payload = json!({
            "sun": {"sign": "Leo", "house": 5},
            "summary": {"centers": ["Sun", "Venus"]},
            "nothing": null
        });

        let sign = PathExpr::parse("sun.sign").unwrap();
        assert_eq!(sign.resolve(&payload), Resolved::Found(&json!("Leo")));

        let second = PathExpr::parse("summary.centers[1]").unwrap();
        assert_eq!(second.resolve(&payload).value(), Some(&json!("Venus")));

        for missing in ["moon.sign", "sun.sign.name", "summary.centers[5]", "sun[0]", "nothing"] {
            let path = PathExpr::parse(missing).unwrap();
            assert_eq!(path.resolve(&payload), Resolved::Missing, "{}", missing);
        }
    }
}
