//! Cluster merging: singleton pass-through and AI-assisted consolidation.

use crate::rewrite::RewriteClient;

/// Result of merging one cluster, including whether the rewrite provider was bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MergeResult {
    /// Singleton cluster returned unchanged; no external call was made.
    PassThrough(String),
    /// Multi-member cluster consolidated by the rewrite provider.
    Rewritten(String),
    /// Rewrite failed or came back empty; first member returned verbatim.
    Fallback(String),
}

impl MergeResult {
    /// Consume the result, yielding the merged question string.
    pub(crate) fn into_text(self) -> String {
        match self {
            Self::PassThrough(text) | Self::Rewritten(text) | Self::Fallback(text) => text,
        }
    }
}

/// Assemble the fixed rewrite instruction around a cluster's member questions.
pub(crate) fn build_merge_prompt(members: &[String]) -> String {
    let mut prompt = String::from(
        "You are merging duplicate or highly similar exam questions.\n\
         \n\
         Rules:\n\
         - Produce ONE clear exam question\n\
         - Keep academic wording\n\
         - Remove repetition\n\
         - Preserve intent and difficulty\n\
         \n\
         Questions:\n",
    );
    for member in members {
        prompt.push_str("- ");
        prompt.push_str(member);
        prompt.push('\n');
    }
    prompt.push_str("\nMerged question:\n");
    prompt
}

/// Collapse one cluster's member strings into a single canonical question.
///
/// Singletons pass through byte-for-byte without touching the provider. For larger clusters
/// a failed or empty rewrite falls back to the first member so the run never stalls here.
pub(crate) async fn merge_cluster(client: &dyn RewriteClient, members: &[String]) -> MergeResult {
    debug_assert!(!members.is_empty(), "clusters are never empty");

    if members.len() == 1 {
        return MergeResult::PassThrough(members[0].clone());
    }

    let prompt = build_merge_prompt(members);
    match client.rewrite(&prompt).await {
        Ok(rewritten) if !rewritten.trim().is_empty() => MergeResult::Rewritten(rewritten),
        Ok(_) => {
            tracing::warn!(
                members = members.len(),
                "Rewrite provider returned empty text; using first member"
            );
            MergeResult::Fallback(members[0].clone())
        }
        Err(error) => {
            tracing::warn!(
                members = members.len(),
                error = %error,
                "Rewrite failed; using first member"
            );
            MergeResult::Fallback(members[0].clone())
        }
    }
}
