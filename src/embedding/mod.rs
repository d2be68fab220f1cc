//! Embedding client abstraction and the Hugging Face Inference adapter.
//!
//! One request is issued per question unit; the pipeline treats a failed request as a soft
//! failure and substitutes the empty-vector sentinel, so the client itself only reports
//! errors and never decides pipeline policy.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;

/// Errors raised by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingClientError {
    /// Provider endpoint could not be reached.
    #[error("Embedding provider unreachable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate embedding: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed into a vector.
    #[error("Malformed embedding response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by embedding backends.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Produce an embedding vector for one unit of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingClientError>;
}

/// Build an embedding client for the current configuration.
pub fn get_embedding_client() -> Box<dyn EmbeddingClient> {
    let config = get_config();
    Box::new(HfEmbeddingClient::new(
        config.hf_api_url.clone(),
        config.hf_api_key.clone(),
        config.embedding_model.clone(),
    ))
}

/// Hugging Face feature-extraction client issuing one HTTP request per unit.
pub struct HfEmbeddingClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HfEmbeddingClient {
    /// Construct a client for the given endpoint, optional bearer token, and model.
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        let http = Client::builder()
            .user_agent("quizmerge/embed")
            .build()
            .expect("Failed to construct reqwest::Client for embeddings");
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
impl EmbeddingClient for HfEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingClientError> {
        let payload = json!({ "inputs": [text] });

        let mut request = self.http.post(self.endpoint()).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|error| {
            EmbeddingClientError::ProviderUnavailable(format!(
                "failed to reach {}: {error}",
                self.base_url
            ))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EmbeddingClientError::ProviderUnavailable(format!(
                "embedding endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        // The feature-extraction pipeline answers a batched request with one row per input.
        let mut rows: Vec<Vec<f32>> = response.json().await.map_err(|error| {
            EmbeddingClientError::InvalidResponse(format!(
                "failed to decode embedding response: {error}"
            ))
        })?;

        match rows.pop() {
            Some(vector) if !vector.is_empty() => Ok(vector),
            _ => Err(EmbeddingClientError::InvalidResponse(
                "provider returned no embedding rows".into(),
            )),
        }
    }
}
