//! Google Gemini provider implementation.

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{KotobaError, Result};
use crate::word::Enrichment;

use super::prompts;
use super::provider::{EnrichmentProvider, ProviderConfig};

/// Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Gemini `generateContent` provider with a structured response schema.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    config: ProviderConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = ProviderConfig::default().with_model(DEFAULT_MODEL);
        Self::with_config(api_key, DEFAULT_BASE_URL, config)
    }

    /// Create a provider with a custom endpoint and configuration.
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        config: ProviderConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KotobaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Create from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| {
                KotobaError::Config(
                    "GEMINI_API_KEY (or API_KEY) environment variable not set".to_string(),
                )
            })?;
        Self::new(api_key)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, self.config.model
        )
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| KotobaError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    fn build_body(&self, headword: &str) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": prompts::system_prompt() }]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompts::enrichment_prompt(headword, &self.config) }]
                }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "responseMimeType": "application/json",
                "responseSchema": prompts::enrichment_schema()
            }
        })
    }

    fn send_message(&self, headword: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&self.build_body(headword))
            .send()
            .map_err(|e| KotobaError::provider(self.name(), format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(KotobaError::provider(
                self.name(),
                format!("API error ({}): {}", status, error_text),
            ));
        }

        let api_response: GenerateResponse = response.json().map_err(|e| {
            KotobaError::MalformedResponse(format!("Failed to parse API response: {}", e))
        })?;

        candidate_text(api_response)
    }
}

impl EnrichmentProvider for GeminiProvider {
    fn enrich(&self, headword: &str) -> Result<Enrichment> {
        let text = self.send_message(headword)?;
        prompts::parse_enrichment(&text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| KotobaError::MalformedResponse("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(KotobaError::MalformedResponse(
            "Candidate has no text".to_string(),
        ));
    }
    Ok(text)
}

/// `generateContent` response structure.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}
