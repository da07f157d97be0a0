//! Per-cluster nearest-neighbor index
//!
//! Answers "who are employee X's closest peers inside their cluster". One
//! HNSW index per cluster, built over only that cluster's embedding rows so
//! queries never leak across cluster boundaries.

use crate::cluster::members_by_cluster;
use hnsw_rs::prelude::*;
use ndarray::Array2;
use thiserror::Error;
use tracing::debug;

/// Neighbor-index errors
#[derive(Error, Debug)]
pub enum VectorError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("no index for cluster {0}")]
    UnknownCluster(usize),

    #[error("row {row} is not labeled with cluster {label}")]
    RowNotInCluster { row: usize, label: usize },
}

pub type VectorResult<T> = Result<T, VectorError>;

/// A neighbor hit: embedding row index and Euclidean distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

struct ClusterIndex {
    /// Embedding rows belonging to this cluster, in row order
    members: Vec<usize>,
    hnsw: Hnsw<'static, f32, DistL2>,
}

/// Nearest-neighbor indices scoped per cluster
pub struct ClusterKnnIndex {
    dimension: usize,
    /// Neighbor capacity; a query never returns more than `knn_k` peers
    knn_k: usize,
    indices: Vec<ClusterIndex>,
}

impl std::fmt::Debug for ClusterKnnIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterKnnIndex")
            .field("dimension", &self.dimension)
            .field("clusters", &self.indices.len())
            .finish()
    }
}

impl ClusterKnnIndex {
    /// Build one index per cluster from the full embedding matrix and the
    /// per-row cluster labels. `knn_k` bounds how many neighbors a query asks
    /// for; per cluster the effective capacity is `min(cluster_size, knn_k + 1)`
    /// so the querying row itself is tolerated as the top hit.
    pub fn build(embeddings: &Array2<f32>, labels: &[usize], knn_k: usize) -> VectorResult<Self> {
        let dimension = embeddings.ncols();
        let members = members_by_cluster(labels);
        let mut indices = Vec::with_capacity(members.len());

        for cluster_members in members {
            let max_elements = cluster_members.len().max(1);
            let ef_construction = 200;
            let hnsw = Hnsw::new(16, max_elements, 16, ef_construction, DistL2 {});

            for (local, &row) in cluster_members.iter().enumerate() {
                let vector: Vec<f32> = embeddings.row(row).to_vec();
                hnsw.insert((&vector, local));
            }

            indices.push(ClusterIndex {
                members: cluster_members,
                hnsw,
            });
        }

        debug!(clusters = indices.len(), dimension, "built per-cluster knn indices");
        Ok(Self {
            dimension,
            knn_k,
            indices,
        })
    }

    /// Nearest other members of `row`'s cluster, closest first.
    ///
    /// Returns up to `top_k` rows, excluding `row` itself; ties on distance
    /// resolve by ascending row index. A singleton cluster yields an empty
    /// list.
    pub fn nearest_peers(
        &self,
        row: usize,
        label: usize,
        query: &[f32],
        top_k: usize,
    ) -> VectorResult<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }
        let index = self
            .indices
            .get(label)
            .ok_or(VectorError::UnknownCluster(label))?;
        if !index.members.contains(&row) {
            return Err(VectorError::RowNotInCluster { row, label });
        }
        if index.members.len() <= 1 {
            return Ok(Vec::new());
        }

        // Ask for one extra hit so the querying row can be filtered out.
        let k = (top_k.min(self.knn_k) + 1).min(index.members.len());
        // ef at cluster size makes the search exhaustive within the cluster,
        // so results do not depend on the index's internal layer draws.
        let ef_search = index.members.len().max(16);
        let hits = index.hnsw.search(query, k, ef_search);

        let mut neighbors: Vec<Neighbor> = hits
            .into_iter()
            .map(|hit| Neighbor {
                row: index.members[hit.d_id],
                distance: hit.distance,
            })
            .filter(|neighbor| neighbor.row != row)
            .collect();
        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.row.cmp(&b.row))
        });
        neighbors.truncate(top_k.min(self.knn_k));

        Ok(neighbors)
    }

    /// Number of clusters indexed
    pub fn cluster_count(&self) -> usize {
        self.indices.len()
    }
}
