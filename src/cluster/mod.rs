//! Cluster engine
//!
//! Partitions the embedding space into groups of organizationally similar
//! employees without a caller-chosen cluster count: the merge cutoff is a
//! percentile of the pairwise-distance distribution, so the number of
//! clusters scales with how tightly the embeddings naturally group.

use ndarray::Array2;
use panorama_algorithms::{average_linkage_labels, pairwise_distances, percentile};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Clustering errors. Any failure here is fatal for the whole run.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("cannot cluster an empty embedding matrix")]
    EmptyInput,

    #[error("threshold percentile {0} is outside 0..=100")]
    InvalidPercentile(f64),

    #[error("pairwise distances contain non-finite values")]
    NonFiniteDistance,
}

pub type ClusterResult<T> = Result<T, ClusterError>;

/// Threshold policy for the dendrogram cut.
///
/// The percentile cutoff is a tunable heuristic, not a contract: any
/// clustering method that accepts a distance threshold and yields a variable
/// number of groups may stand in for average linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Percentile of the pairwise-distance distribution used as the cutoff
    pub threshold_percentile: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            threshold_percentile: 50.0,
        }
    }
}

/// Assign one cluster label per embedding row.
///
/// Labels are normalized to `0..k` in row order and are deterministic for
/// identical input. With one or two rows the clustering degenerates to
/// singletons or a single pair; downstream code must tolerate clusters of
/// size 1.
pub fn cluster_embeddings(embeddings: &Array2<f32>, config: &ClusterConfig) -> ClusterResult<Vec<usize>> {
    if embeddings.nrows() == 0 {
        return Err(ClusterError::EmptyInput);
    }
    if !(0.0..=100.0).contains(&config.threshold_percentile) {
        return Err(ClusterError::InvalidPercentile(config.threshold_percentile));
    }
    if embeddings.nrows() == 1 {
        return Ok(vec![0]);
    }

    let distances = pairwise_distances(embeddings);
    if distances.iter().any(|d| !d.is_finite()) {
        return Err(ClusterError::NonFiniteDistance);
    }

    let threshold = percentile(&distances, config.threshold_percentile);
    let labels = average_linkage_labels(embeddings, threshold);

    let cluster_count = labels.iter().max().map_or(0, |m| m + 1);
    debug!(
        rows = embeddings.nrows(),
        threshold, clusters = cluster_count, "clustered embeddings"
    );

    Ok(labels)
}

/// Group row indices by cluster label, preserving row order inside each group
pub fn members_by_cluster(labels: &[usize]) -> Vec<Vec<usize>> {
    let cluster_count = labels.iter().max().map_or(0, |m| m + 1);
    let mut members = vec![Vec::new(); cluster_count];
    for (row, &label) in labels.iter().enumerate() {
        members[label].push(row);
    }
    members
}
