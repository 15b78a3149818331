use thiserror::Error;

/// Errors surfaced by chart enrichment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// No placement survived registry resolution
    #[error("Empty chart: no planets resolved ({dropped} dropped)")]
    EmptyChart { dropped: usize },
}

/// Errors raised while loading registry or template data
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("TOML parse error in {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Missing registry entry: {0}")]
    MissingEntry(String),

    #[error("Duplicate registry entry: {0}")]
    DuplicateEntry(String),

    #[error("Invalid template {id}: {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors from the external chart source (HTTP provider or files)
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid birth subject: {0}")]
    InvalidSubject(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors from loading or validating engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Crate-level error used by application wiring
#[derive(Error, Debug)]
pub enum NatalError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NatalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chart_display() {
        let err = ChartError::EmptyChart { dropped: 3 };
        assert_eq!(format!("{}", err), "Empty chart: no planets resolved (3 dropped)");
    }

    #[test]
    fn test_chart_error_converts_into_natal_error() {
        let err: NatalError = ChartError::EmptyChart { dropped: 0 }.into();
        assert!(matches!(err, NatalError::Chart(ChartError::EmptyChart { .. })));
    }
}
