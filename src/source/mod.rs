//! Chart sources: the astrology service and saved chart files

pub mod client;
pub mod normalize;

use std::path::Path;

use crate::chart::RawChart;
use crate::core::error::SourceError;

pub use client::{AstroApiClient, ChartRequest, DEFAULT_API_URL};
pub use normalize::{normalize_response, parse_chart_document, parse_response, ProviderResponse, RetroFlag};

/// Load a chart file: either a raw chart or a saved provider response
pub fn load_chart_file(path: &Path) -> Result<RawChart, SourceError> {
    let content = std::fs::read_to_string(path)?;
    parse_chart_document(&content)
}
