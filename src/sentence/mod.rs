//! Sentence generation
//!
//! A context (spiral overview, planet focus, ...) selects eligible templates;
//! one is picked by weight with an injected random source and its
//! placeholders are resolved against the chart payload into colored tokens.

pub mod engine;
pub mod format;
pub mod path;
pub mod payload;
pub mod random;
pub mod template;
pub mod token;

pub use engine::{GeneratedSentence, SentenceEngine};
pub use format::{
    apply_formatter, aspect_noun, format_centers, format_intensity_adverb, format_tension_ratio,
    Formatter, FALLBACK_MARKER,
};
pub use path::{PathError, PathExpr, Resolved};
pub use payload::ChartPayload;
pub use random::{select_weighted, RandomSource, RngSource, ScriptedSource};
pub use template::{SentenceTemplate, TemplateTable, TemplateVariable, VariableCategory};
pub use token::{render_text, Token};
