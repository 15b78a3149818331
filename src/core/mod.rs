pub mod config;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use diagnostics::{DiagnosticEvent, DiagnosticKind, DiagnosticSink, RecordingSink, Severity, TracingSink};
pub use error::{ChartError, ConfigError, NatalError, RegistryError, SourceError};
pub use types::{AspectHarmony, AspectKind, Body, Element, Modality, ZodiacSign, HOUSE_COUNT};
