//! Async HTTP client for the astrology service
//!
//! One POST per chart: the subject's birth data goes out as JSON with basic
//! auth and the provider's response is normalized into a `RawChart`.

use reqwest::Client;
use serde::Serialize;

use super::normalize::parse_response;
use crate::chart::{BirthSubject, RawChart};
use crate::core::error::SourceError;

pub const DEFAULT_API_URL: &str = "https://json.astrologyapi.com/v1/western_horoscope";

/// Request body the provider expects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRequest {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
    pub min: u32,
    pub lat: f64,
    pub lon: f64,
    pub tzone: f64,
}

impl From<&BirthSubject> for ChartRequest {
    fn from(subject: &BirthSubject) -> Self {
        Self {
            day: subject.day,
            month: subject.month,
            year: subject.year,
            hour: subject.hour,
            min: subject.minute,
            lat: subject.latitude,
            lon: subject.longitude,
            tzone: subject.timezone,
        }
    }
}

pub struct AstroApiClient {
    client: Client,
    user_id: String,
    api_key: String,
    api_url: String,
}

impl AstroApiClient {
    pub fn new(user_id: String, api_key: String, api_url: String) -> Self {
        Self {
            client: Client::new(),
            user_id,
            api_key,
            api_url,
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: ASTRO_API_USER_ID, ASTRO_API_KEY
    /// Optional: ASTRO_API_URL
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SourceError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| SourceError::MissingCredential(format!("{} not set", key)))
        };
        let user_id = required("ASTRO_API_USER_ID")?;
        let api_key = required("ASTRO_API_KEY")?;
        let api_url = lookup("ASTRO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());

        Ok(Self::new(user_id, api_key, api_url))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch and normalize the chart for a subject
    pub async fn fetch_chart(&self, subject: &BirthSubject) -> Result<RawChart, SourceError> {
        subject.validate().map_err(SourceError::InvalidSubject)?;
        let request = ChartRequest::from(subject);

        tracing::info!(subject = %subject.name, url = %self.api_url, "Requesting chart");
        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.user_id, Some(&self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let chart = parse_response(&body)?;
        tracing::debug!(
            planets = chart.planets.len(),
            houses = chart.houses.len(),
            aspects = chart.aspects.len(),
            "Chart received"
        );
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_credentials() {
        let result = AstroApiClient::from_lookup(lookup(&[("ASTRO_API_USER_ID", "42")]));
        match result {
            Err(SourceError::MissingCredential(msg)) => assert!(msg.contains("ASTRO_API_KEY")),
            _ => panic!("expected missing credential"),
        }

        let blank = AstroApiClient::from_lookup(lookup(&[("ASTRO_API_USER_ID", " "), ("ASTRO_API_KEY", "k")]));
        assert!(matches!(blank, Err(SourceError::MissingCredential(_))));
    }

    #[test]
    fn test_default_and_custom_url() {
        let client = AstroApiClient::from_lookup(lookup(&[("ASTRO_API_USER_ID", "42"), ("ASTRO_API_KEY", "k")])).unwrap();
        assert_eq!(client.api_url(), DEFAULT_API_URL);

        let client = AstroApiClient::from_lookup(lookup(&[
            ("ASTRO_API_USER_ID", "42"),
            ("ASTRO_API_KEY", "k"),
            ("ASTRO_API_URL", "http://localhost:9000/chart"),
        ]))
        .unwrap();
        assert_eq!(client.api_url(), "http://localhost:9000/chart");
    }

    #[test]
    fn test_request_body_from_subject() {
        let mut subject = BirthSubject::named("Ada");
        subject.minute = 30;
        subject.timezone = 5.5;

        let body = serde_json::to_value(ChartRequest::from(&subject)).unwrap();
        assert_eq!(body["min"], 30);
        assert_eq!(body["tzone"], 5.5);
        assert_eq!(body["year"], 2000);
    }

    #[tokio::test]
    async fn test_invalid_subject_rejected_before_request() {
        let client = AstroApiClient::new("42".into(), "k".into(), "http://127.0.0.1:1/unused".into());
        let mut subject = BirthSubject::named("Bad");
        subject.month = 13;

        let result = client.fetch_chart(&subject).await;
        assert!(matches!(result, Err(SourceError::InvalidSubject(_))));
    }
}
