//! Merge service orchestrating extraction, segmentation, embedding, clustering, and rewriting.

use crate::{
    config::get_config,
    embedding::{EmbeddingClient, get_embedding_client},
    extract::extract_text,
    pipeline::{
        cluster::cluster_units,
        merge::{MergeResult, merge_cluster},
        types::{MergeOutcome, PipelineError},
    },
    rewrite::{RewriteClient, get_rewrite_client},
    segment::{SegmentRules, segment_units},
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Coordinates one full merge run over a folder of source documents.
///
/// The service owns the embedding and rewrite clients plus the segmentation rules; every run
/// builds its own unit, embedding, and cluster collections, so a single service can drive
/// any number of independent runs.
pub struct MergeService {
    embedding_client: Box<dyn EmbeddingClient>,
    rewrite_client: Box<dyn RewriteClient>,
    rules: SegmentRules,
    threshold: f32,
}

impl MergeService {
    /// Build a service from the process configuration, honoring an optional threshold override.
    pub fn new(threshold_override: Option<f32>) -> Self {
        let config = get_config();
        Self {
            embedding_client: get_embedding_client(),
            rewrite_client: get_rewrite_client(),
            rules: SegmentRules::default(),
            threshold: threshold_override.unwrap_or(config.similarity_threshold),
        }
    }

    /// Build a service around explicit providers, bypassing the global configuration.
    pub fn with_clients(
        embedding_client: Box<dyn EmbeddingClient>,
        rewrite_client: Box<dyn RewriteClient>,
        threshold: f32,
    ) -> Self {
        Self {
            embedding_client,
            rewrite_client,
            rules: SegmentRules::default(),
            threshold,
        }
    }

    /// Run the full pipeline over one folder and return the merged questions.
    ///
    /// Per-file and per-unit failures are logged and absorbed; the only hard error is an
    /// unreadable folder. An input producing zero units short-circuits before any external
    /// call is made.
    pub async fn merge_folder(&self, folder: &Path) -> Result<MergeOutcome, PipelineError> {
        tracing::info!(folder = %folder.display(), "Starting merge run");

        let files = enumerate_files(folder)?;
        let mut units: Vec<String> = Vec::new();
        let mut source_files = 0;

        for file in &files {
            let text = extract_text(file);
            let file_units = segment_units(&text, &self.rules);
            tracing::debug!(
                file = %file.display(),
                units = file_units.len(),
                "Segmented file"
            );
            if !file_units.is_empty() {
                source_files += 1;
            }
            units.extend(file_units);
        }

        if units.is_empty() {
            tracing::info!(folder = %folder.display(), "No question units found");
            return Ok(MergeOutcome {
                merged_units: Vec::new(),
                source_files,
                input_units: 0,
                failed_embeddings: 0,
                fallback_merges: 0,
            });
        }

        let (embeddings, failed_embeddings) = self.embed_units(&units).await;
        let clusters = cluster_units(&embeddings, self.threshold);
        tracing::info!(
            units = units.len(),
            clusters = clusters.len(),
            threshold = self.threshold,
            "Clustered question units"
        );

        let mut merged_units = Vec::with_capacity(clusters.len());
        let mut fallback_merges = 0;
        for cluster in &clusters {
            let members: Vec<String> = cluster
                .members
                .iter()
                .map(|&index| units[index].clone())
                .collect();
            let result = merge_cluster(self.rewrite_client.as_ref(), &members).await;
            if matches!(result, MergeResult::Fallback(_)) {
                fallback_merges += 1;
            }
            merged_units.push(result.into_text());
        }

        let outcome = MergeOutcome {
            merged_units,
            source_files,
            input_units: units.len(),
            failed_embeddings,
            fallback_merges,
        };
        tracing::info!(
            input_units = outcome.input_units,
            output_units = outcome.merged_units.len(),
            duplicates_removed = outcome.duplicates_removed(),
            failed_embeddings = outcome.failed_embeddings,
            fallback_merges = outcome.fallback_merges,
            "Merge run complete"
        );
        Ok(outcome)
    }

    /// Embed each unit in discovery order, substituting the empty-vector sentinel on failure.
    async fn embed_units(&self, units: &[String]) -> (Vec<Vec<f32>>, usize) {
        let mut embeddings = Vec::with_capacity(units.len());
        let mut failed = 0;
        for unit in units {
            match self.embedding_client.embed(unit).await {
                Ok(vector) => embeddings.push(vector),
                Err(error) => {
                    tracing::warn!(unit = %unit, error = %error, "Embedding failed");
                    failed += 1;
                    embeddings.push(Vec::new());
                }
            }
        }
        (embeddings, failed)
    }
}

/// Enumerate regular files directly inside `folder`, sorted by name.
///
/// Transient artifacts are filtered out; a failure to read the folder itself is the run's
/// one hard error, while per-entry failures are logged and skipped.
fn enumerate_files(folder: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => {
                return Err(PipelineError::Folder {
                    path: folder.display().to_string(),
                    source: error,
                });
            }
            Err(error) => {
                tracing::warn!(error = %error, "Skipping unreadable folder entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_transient_artifact(&name) {
            tracing::debug!(file = %name, "Skipping transient artifact");
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// Recognize lock files and partial uploads that word processors and browsers leave behind.
fn is_transient_artifact(name: &str) -> bool {
    name.starts_with("~$")
        || name.starts_with('.')
        || name.ends_with(".tmp")
        || name.ends_with(".lock")
        || name.ends_with(".part")
}
