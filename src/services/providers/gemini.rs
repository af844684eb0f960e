/// Gemini API backend
///
/// Sends a single-turn `generateContent` request and returns the first
/// candidate's text untouched. Response validation and parsing belong to
/// the suggestion parser, and fallback policy belongs to the pipeline.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::providers::SuggestionBackend,
};

#[derive(Clone)]
pub struct GeminiBackend {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiBackend {
    /// Creates a Gemini backend with a request timeout on every outbound call
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.gemini_api_key.clone(),
            api_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn extract_text(response: GenerateContentResponse) -> AppResult<String> {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AppError::Upstream("Gemini response contained no candidate text".to_string())
            })
    }
}

#[async_trait::async_trait]
impl SuggestionBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("Gemini API key is not configured".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = Self::extract_text(parsed)?;

        tracing::debug!(
            model = %self.model,
            response_len = text.len(),
            "Gemini generation completed"
        );

        Ok(text)
    }

    async fn probe(&self) -> bool {
        match self.generate("Test").await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Gemini API key validation failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
