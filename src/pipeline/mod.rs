//! Question merging pipeline: similarity clustering, cluster rewriting, and orchestration.

pub mod cluster;
mod merge;
mod service;
pub mod types;

pub use cluster::{Cluster, cluster_units, cosine_similarity};
pub use service::MergeService;
pub use types::{MergeOutcome, PipelineError};
