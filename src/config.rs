use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default Hugging Face Inference API endpoint.
pub const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
/// Default sentence-embedding model used for similarity comparisons.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/distilbert-base-nli-mean-tokens";
/// Default generative model used to rewrite merged questions.
pub const DEFAULT_REWRITE_MODEL: &str = "deepseek-ai/DeepSeek-V3";
/// Default cosine-similarity threshold for cluster membership.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the quizmerge pipeline.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the inference API that serves embeddings and rewrites.
    pub hf_api_url: String,
    /// Optional API token sent as a bearer credential.
    pub hf_api_key: Option<String>,
    /// Embedding model identifier passed to the inference API.
    pub embedding_model: String,
    /// Generative model identifier used for cluster rewrites.
    pub rewrite_model: String,
    /// Cosine-similarity threshold above which units join a cluster.
    pub similarity_threshold: f32,
}

impl Config {
    /// Load configuration from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let similarity_threshold = match load_env_optional("SIMILARITY_THRESHOLD") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SIMILARITY_THRESHOLD".to_string()))?,
            None => DEFAULT_SIMILARITY_THRESHOLD,
        };

        Ok(Self {
            hf_api_url: load_env_optional("HF_API_URL")
                .unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
            hf_api_key: load_env_optional("HF_API_KEY"),
            embedding_model: load_env_optional("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            rewrite_model: load_env_optional("REWRITE_MODEL")
                .unwrap_or_else(|| DEFAULT_REWRITE_MODEL.to_string()),
            similarity_threshold,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        api_url = %config.hf_api_url,
        embedding_model = %config.embedding_model,
        rewrite_model = %config.rewrite_model,
        threshold = config.similarity_threshold,
        has_api_key = config.hf_api_key.is_some(),
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
