//! Generative rewrite client used to collapse a cluster into one canonical question.
//!
//! Mirrors the embedding adapter: a thin trait over one HTTP call so the merge step can fall
//! back gracefully when the provider misbehaves.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const MAX_NEW_TOKENS: u32 = 120;
const TEMPERATURE: f32 = 0.3;

/// Errors surfaced while requesting a rewritten question.
#[derive(Debug, Error)]
pub enum RewriteClientError {
    /// Provider endpoint could not be reached.
    #[error("Rewrite provider unreachable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate rewrite: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed rewrite response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by generative rewrite providers.
#[async_trait]
pub trait RewriteClient: Send + Sync {
    /// Generate one rewritten question from the assembled prompt.
    async fn rewrite(&self, prompt: &str) -> Result<String, RewriteClientError>;
}

/// Build a rewrite client for the current configuration.
pub fn get_rewrite_client() -> Box<dyn RewriteClient> {
    let config = get_config();
    Box::new(HfRewriteClient::new(
        config.hf_api_url.clone(),
        config.hf_api_key.clone(),
        config.rewrite_model.clone(),
    ))
}

/// Hugging Face text-generation client.
pub struct HfRewriteClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

impl HfRewriteClient {
    /// Construct a client for the given endpoint, optional bearer token, and model.
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        let http = Client::builder()
            .user_agent("quizmerge/rewrite")
            .build()
            .expect("Failed to construct reqwest::Client for rewrites");
        Self {
            http,
            base_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl RewriteClient for HfRewriteClient {
    async fn rewrite(&self, prompt: &str) -> Result<String, RewriteClientError> {
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": MAX_NEW_TOKENS,
                // Low temperature keeps merges close to the source wording.
                "temperature": TEMPERATURE,
                "return_full_text": false,
            }
        });

        let mut request = self.http.post(self.endpoint()).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|error| {
            RewriteClientError::ProviderUnavailable(format!(
                "failed to reach {}: {error}",
                self.base_url
            ))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RewriteClientError::ProviderUnavailable(format!(
                "rewrite endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RewriteClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let mut completions: Vec<GeneratedText> = response.json().await.map_err(|error| {
            RewriteClientError::InvalidResponse(format!(
                "failed to decode rewrite response: {error}"
            ))
        })?;

        match completions.pop() {
            Some(completion) => Ok(completion.generated_text.trim().to_string()),
            None => Err(RewriteClientError::InvalidResponse(
                "provider returned no completions".into(),
            )),
        }
    }
}
