//! DeepSeek (OpenAI-compatible chat completions) provider implementation.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{KotobaError, Result};
use crate::word::Enrichment;

use super::prompts;
use super::provider::{EnrichmentProvider, ProviderConfig};

/// DeepSeek API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// DeepSeek chat provider.
///
/// Speaks the OpenAI chat completions protocol, so pointing `base_url` at
/// any compatible endpoint works.
pub struct DeepSeekProvider {
    client: Client,
    api_key: String,
    base_url: String,
    config: ProviderConfig,
}

impl DeepSeekProvider {
    /// Create a new DeepSeek provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, DEFAULT_BASE_URL, ProviderConfig::default())
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

    /// Create from the `DEEPSEEK_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY").map_err(|_| {
            KotobaError::Config("DEEPSEEK_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| KotobaError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Request body for one headword.
    fn build_body(&self, headword: &str) -> Value {
        json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": prompts::system_prompt()
                },
                {
                    "role": "user",
                    "content": prompts::enrichment_prompt(headword, &self.config)
                }
            ]
        })
    }

    /// Send one chat request and return the generated text.
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

        let api_response: ChatResponse = response.json().map_err(|e| {
            KotobaError::MalformedResponse(format!("Failed to parse API response: {}", e))
        })?;

        first_choice_text(api_response)
    }
}

impl EnrichmentProvider for DeepSeekProvider {
    fn enrich(&self, headword: &str) -> Result<Enrichment> {
        let text = self.send_message(headword)?;
        prompts::parse_enrichment(&text)
    }

    fn name(&self) -> &str {
        "deepseek"
    }
}

/// Pull the message text out of the first choice.
fn first_choice_text(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| KotobaError::MalformedResponse("No choices in response".to_string()))
}

/// Chat completions response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DeepSeekProvider {
        DeepSeekProvider::with_config(
            "sk-test",
            "https://example.test/v1/",
            ProviderConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(provider().endpoint(), "https://example.test/v1/chat/completions");
    }

    #[test]
    fn test_body_requests_json_object() {
        let body = provider().build_body("猫");

        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][1]["content"].as_str().unwrap().contains("猫"));
    }

    #[test]
    fn test_headers_carry_bearer_key() {
        let headers = provider().build_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
    }

    #[test]
    fn test_first_choice_text() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), r#"{"a":1}"#);

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_choice_text(empty).is_err());
    }
}
