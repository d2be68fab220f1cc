//! Greedy first-fit similarity clustering.
//!
//! Each unit is compared against the *founding member* of every existing cluster, in the
//! order the clusters were created, and joins the first one whose cosine similarity strictly
//! exceeds the threshold. Later members are never used as comparison anchors, so the result
//! is order-dependent and deliberately not transitive. Changing the first-match tie-break
//! changes cluster membership; it is part of the contract.

/// A group of unit indices judged near-duplicate.
///
/// `members` always contains `founder` as its first element and preserves discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Index of the first unit assigned to this cluster; sole comparison anchor.
    pub founder: usize,
    /// All member indices in discovery order.
    pub members: Vec<usize>,
}

/// Cosine similarity between two vectors.
///
/// Returns `None` when the similarity is undefined: empty vectors (the embedding-failure
/// sentinel), mismatched dimensions, or a zero-magnitude operand. An undefined similarity
/// never exceeds any threshold, so affected units always found their own cluster.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return None;
    }

    let mut dot = 0.0_f32;
    let mut mag_a = 0.0_f32;
    let mut mag_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let magnitude = mag_a.sqrt() * mag_b.sqrt();
    if magnitude == 0.0 {
        return None;
    }
    Some(dot / magnitude)
}

/// Partition unit indices `0..embeddings.len()` into clusters by greedy first-fit.
///
/// Clusters are returned in founding order; every index appears in exactly one cluster.
pub fn cluster_units(embeddings: &[Vec<f32>], threshold: f32) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for index in 0..embeddings.len() {
        let assigned = clusters.iter_mut().find(|cluster| {
            cosine_similarity(&embeddings[index], &embeddings[cluster.founder])
                .is_some_and(|similarity| similarity > threshold)
        });

        match assigned {
            Some(cluster) => cluster.members.push(index),
            None => clusters.push(Cluster {
                founder: index,
                members: vec![index],
            }),
        }
    }

    clusters
}
