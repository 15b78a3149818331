//! Sentence templates and the template table
//!
//! Templates are authored in `data/templates.toml`:
//!
//! ```toml
//! [[templates]]
//! id = "overview_primary"
//! context = "spiral_overview"
//! text = "Your chart gathers in the {{ summary.primary_house }}."
//! weight = 2.0
//!
//! [[templates.variables]]
//! path = "summary.primary_house"
//! category = "house"
//! ```

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::format::Formatter;
use super::path::PathExpr;
use crate::core::error::RegistryError;

pub const BUNDLED_TEMPLATES: &str = include_str!("../../data/templates.toml");

/// Context matched by every request
pub const WILDCARD_CONTEXT: &str = "any";

/// What kind of registry entity a variable names; drives token color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableCategory {
    Planet,
    Sign,
    House,
    Aspect,
    Element,
    Mode,
}

/// Declared metadata for one placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub path: String,
    #[serde(default)]
    pub category: Option<VariableCategory>,
    #[serde(default)]
    pub format: Option<Formatter>,
    #[serde(default)]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceTemplate {
    pub id: String,
    pub context: String,
    pub text: String,
    pub weight: f64,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

/// A piece of template text
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Placeholder(PathExpr),
    /// Placeholder whose path does not parse
    Invalid(String),
}

/// Split template text on `{{ ... }}`; an unclosed `{{` stays literal
pub fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };

        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }
        let inner = &after_open[..close];
        segments.push(match PathExpr::parse(inner) {
            Ok(path) => Segment::Placeholder(path),
            Err(_) => Segment::Invalid(inner.trim().to_string()),
        });
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    segments
}

impl SentenceTemplate {
    pub fn segments(&self) -> Vec<Segment> {
        parse_segments(&self.text)
    }

    /// Declared metadata for a placeholder path, if any
    pub fn variable(&self, path: &PathExpr) -> Option<&TemplateVariable> {
        let key = path.to_string();
        self.variables.iter().find(|v| v.path.trim() == key)
    }

    pub fn matches(&self, context: &str) -> bool {
        self.context == context || self.context == WILDCARD_CONTEXT
    }

    fn invalid(&self, reason: impl Into<String>) -> RegistryError {
        RegistryError::InvalidTemplate {
            id: self.id.clone(),
            reason: reason.into(),
        }
    }

    /// Weight must be positive, placeholders must parse, and every declared
    /// variable must appear in the text
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.id.trim().is_empty() {
            return Err(self.invalid("empty id"));
        }
        if self.context.trim().is_empty() {
            return Err(self.invalid("empty context"));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(self.invalid(format!("weight must be positive, got {}", self.weight)));
        }

        let mut placeholders = AHashSet::new();
        for segment in self.segments() {
            match segment {
                Segment::Placeholder(path) => {
                    placeholders.insert(path.to_string());
                }
                Segment::Invalid(raw) => {
                    return Err(self.invalid(format!("bad placeholder '{{{{{}}}}}'", raw)));
                }
                Segment::Literal(_) => {}
            }
        }

        for variable in &self.variables {
            let path = PathExpr::parse(&variable.path)
                .map_err(|e| self.invalid(e.to_string()))?;
            if !placeholders.contains(&path.to_string()) {
                return Err(self.invalid(format!("variable '{}' is not used in the text", path)));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<SentenceTemplate>,
}

/// Validated, immutable set of templates
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    templates: Vec<SentenceTemplate>,
}

impl TemplateTable {
    pub fn new(templates: Vec<SentenceTemplate>) -> Result<Self, RegistryError> {
        let mut seen = AHashSet::new();
        for template in &templates {
            template.validate()?;
            if !seen.insert(template.id.as_str()) {
                return Err(RegistryError::DuplicateEntry(format!("template '{}'", template.id)));
            }
        }
        Ok(Self { templates })
    }

    /// The templates compiled into the crate
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_toml_str(BUNDLED_TEMPLATES)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let file: TemplateFile = toml::from_str(content).map_err(|e| RegistryError::Parse {
            source_name: "templates.toml".to_string(),
            message: e.to_string(),
        })?;
        let table = Self::new(file.templates)?;
        tracing::debug!(templates = table.len(), "Loaded sentence templates");
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Templates for a context, in table order, including wildcard ones
    pub fn eligible(&self, context: &str) -> Vec<&SentenceTemplate> {
        self.templates.iter().filter(|t| t.matches(context)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&SentenceTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn templates(&self) -> &[SentenceTemplate] {
        &self.templates
    }

    /// Distinct non-wildcard contexts, in first-seen order
    pub fn contexts(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.templates
            .iter()
            .map(|t| t.context.as_str())
            .filter(|c| *c != WILDCARD_CONTEXT && seen.insert(*c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
