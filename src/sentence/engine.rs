//! Template selection and token rendering

use serde::Serialize;
use serde_json::Value;

use super::format::{apply_formatter, display_value, humanize};
use super::path::{PathExpr, Resolved};
use super::random::{select_weighted, RandomSource};
use super::template::{Segment, SentenceTemplate, TemplateTable, TemplateVariable, VariableCategory};
use super::token::{render_text, Token};
use crate::core::config::EngineConfig;
use crate::core::types::Element;
use crate::registry::Registry;

/// Tokens for one sentence and the template that produced them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedSentence {
    pub tokens: Vec<Token>,
    /// None when no template was eligible
    pub template_id: Option<String>,
}

impl GeneratedSentence {
    pub fn text(&self) -> String {
        render_text(&self.tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub struct SentenceEngine<'r> {
    registry: &'r Registry,
    templates: &'r TemplateTable,
    fallback_marker: String,
    default_color: String,
}

/// Entity name carried by a resolved value: a string, an object's `name`,
/// or the first element of a list
fn entity_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("name").and_then(Value::as_str),
        Value::Array(items) => items.first().and_then(entity_name),
        _ => None,
    }
}

fn house_id(value: &Value) -> Option<u8> {
    let id = match value {
        Value::Object(map) => map.get("id").and_then(Value::as_u64),
        other => other.as_u64(),
    }?;
    u8::try_from(id).ok()
}

impl<'r> SentenceEngine<'r> {
    pub fn new(registry: &'r Registry, templates: &'r TemplateTable, config: &EngineConfig) -> Self {
        Self {
            registry,
            templates,
            fallback_marker: config.fallback_marker.clone(),
            default_color: config.default_variable_color.clone(),
        }
    }

    /// Pick a template for `context` by weight and render it against `payload`
    ///
    /// No eligible template yields an empty sentence, never an error.
    pub fn generate<S>(&self, context: &str, payload: &Value, random: &mut S) -> GeneratedSentence
    where
        S: RandomSource + ?Sized,
    {
        let eligible = self.templates.eligible(context);
        let Some(template) = select_weighted(&eligible, |t| t.weight, random) else {
            tracing::debug!(context, "No eligible sentence template");
            return GeneratedSentence::default();
        };
        tracing::debug!(context, template = %template.id, "Selected sentence template");
        self.render(template, payload)
    }

    /// Render one template by id, bypassing selection
    pub fn generate_variant(&self, template_id: &str, payload: &Value) -> Option<GeneratedSentence> {
        self.templates.get(template_id).map(|t| self.render(t, payload))
    }

    /// Render a template's segments into tokens
    pub fn render(&self, template: &SentenceTemplate, payload: &Value) -> GeneratedSentence {
        let mut tokens = Vec::new();
        for segment in template.segments() {
            match segment {
                Segment::Literal(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        tokens.push(Token::literal(trimmed));
                    }
                }
                Segment::Placeholder(path) => {
                    tokens.push(self.variable_token(template, &path, payload));
                }
                Segment::Invalid(raw) => {
                    tracing::debug!(template = %template.id, placeholder = %raw, "Unparsable placeholder");
                    tokens.push(Token::variable(
                        self.fallback_marker.clone(),
                        self.default_color.clone(),
                        None,
                        None,
                    ));
                }
            }
        }

        GeneratedSentence {
            tokens,
            template_id: Some(template.id.clone()),
        }
    }

    fn variable_token(&self, template: &SentenceTemplate, path: &PathExpr, payload: &Value) -> Token {
        let variable = template.variable(path);
        let category = variable.and_then(|v| v.category);
        let tooltip = variable.and_then(|v| v.tooltip.clone());
        let hover_title = Some(humanize(path.last_segment()));

        let value = match path.resolve(payload) {
            Resolved::Found(value) => value,
            Resolved::Missing => {
                tracing::trace!(template = %template.id, path = %path, "Placeholder unresolved");
                return Token::variable(
                    self.fallback_marker.clone(),
                    self.default_color.clone(),
                    hover_title,
                    tooltip,
                );
            }
        };

        let text = self
            .format_value(variable, value)
            .unwrap_or_else(|| self.fallback_marker.clone());
        let color = category
            .and_then(|c| self.color_for(c, value, payload))
            .unwrap_or_else(|| self.default_color.clone());
        let hover_summary = tooltip.or_else(|| category.and_then(|c| self.summary_for(c, value)));

        Token::variable(text, color, hover_title, hover_summary)
    }

    fn format_value(&self, variable: Option<&TemplateVariable>, value: &Value) -> Option<String> {
        match variable.and_then(|v| v.format) {
            Some(formatter) => apply_formatter(formatter, value),
            None => display_value(value),
        }
    }

    fn color_for(&self, category: VariableCategory, value: &Value, payload: &Value) -> Option<String> {
        match category {
            VariableCategory::Planet => {
                let name = entity_name(value)?;
                // A planet takes the color of the house it occupies
                let occupied = payload
                    .get(name.to_lowercase())
                    .and_then(|entry| entry.get("house"))
                    .and_then(house_id)
                    .and_then(|id| self.registry.house(id));
                match occupied {
                    Some(house) => Some(house.color.clone()),
                    None => self.registry.planet_by_name(name).map(|p| p.color.clone()),
                }
            }
            VariableCategory::Sign => entity_name(value)
                .and_then(|name| self.registry.sign_by_name(name))
                .map(|s| s.color.clone()),
            VariableCategory::House => house_id(value)
                .and_then(|id| self.registry.house(id))
                .map(|h| h.color.clone()),
            VariableCategory::Aspect => entity_name(value)
                .and_then(|name| self.registry.aspect_by_name(name))
                .map(|a| a.color.clone()),
            VariableCategory::Element => entity_name(value)
                .and_then(Element::from_name)
                .map(|e| e.color().to_string()),
            VariableCategory::Mode => None,
        }
    }

    fn summary_for(&self, category: VariableCategory, value: &Value) -> Option<String> {
        match category {
            VariableCategory::Planet => entity_name(value)
                .and_then(|name| self.registry.planet_by_name(name))
                .map(|p| p.essence.clone()),
            VariableCategory::Sign => entity_name(value)
                .and_then(|name| self.registry.sign_by_name(name))
                .map(|s| s.archetype_name.clone()),
            VariableCategory::House => house_id(value)
                .and_then(|id| self.registry.house(id))
                .map(|h| h.essence.clone()),
            VariableCategory::Aspect => entity_name(value)
                .and_then(|name| self.registry.aspect_by_name(name))
                .map(|a| a.quality.clone()),
            VariableCategory::Element | VariableCategory::Mode => None,
        }
    }
}
