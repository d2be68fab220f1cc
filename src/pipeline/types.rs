//! Error and outcome types for the merging pipeline.

use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Per-file, per-unit, and per-cluster failures are absorbed and logged inside the pipeline;
/// only total inability to enumerate the input folder surfaces here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input folder was missing or could not be read.
    #[error("Failed to read folder '{path}': {source}")]
    Folder {
        /// Folder path as supplied by the caller.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: walkdir::Error,
    },
}

/// Summary of a completed merge run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Merged question strings in cluster-discovery order.
    pub merged_units: Vec<String>,
    /// Number of source files that contributed text.
    pub source_files: usize,
    /// Question units segmented across all files before deduplication.
    pub input_units: usize,
    /// Units whose embedding request failed and degraded to a singleton.
    pub failed_embeddings: usize,
    /// Multi-member clusters whose rewrite fell back to the first member.
    pub fallback_merges: usize,
}

impl MergeOutcome {
    /// Number of near-duplicate units removed by merging.
    pub fn duplicates_removed(&self) -> usize {
        self.input_units.saturating_sub(self.merged_units.len())
    }
}
