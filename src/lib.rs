#![deny(missing_docs)]

//! Core library for the quizmerge question deduplication pipeline.

/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and the Hugging Face adapter.
pub mod embedding;
/// Per-file text extraction dispatched by document type.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Question merging pipeline: clustering, rewriting, orchestration.
pub mod pipeline;
/// Generative rewrite client abstraction and the Hugging Face adapter.
pub mod rewrite;
/// Line-classification segmenter turning raw text into question units.
pub mod segment;
