//! Shared graph topology for the assignment algorithms
//!
//! Provides a read-only, dense-index view of an undirected weighted graph in
//! Compressed Sparse Row (CSR) format.

/// A dense, integer-indexed view of an undirected weighted graph.
///
/// Node identity is positional: callers keep their own mapping from domain
/// identifiers to the dense indices `0..node_count`. Every undirected edge is
/// stored once per endpoint. Parallel edges are allowed and kept distinct.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Offsets into `targets`/`weights`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<usize>,
    /// Edge weights aligned with `targets`
    pub weights: Vec<f64>,
}

impl GraphView {
    /// Build a view from an undirected edge list. Each `(u, v, w)` entry is
    /// materialized in both endpoints' adjacency rows.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(u, v, w) in edges {
            adjacency[u].push((v, w));
            adjacency[v].push((u, w));
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::with_capacity(edges.len() * 2);
        let mut weights = Vec::with_capacity(edges.len() * 2);

        offsets.push(0);
        for row in adjacency {
            for (target, weight) in row {
                targets.push(target);
                weights.push(weight);
            }
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            offsets,
            targets,
            weights,
        }
    }

    /// Get the degree of a node (parallel edges counted individually)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Get the neighbors of a node
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Get the edge weights of a node, aligned with `neighbors`
    pub fn edge_weights(&self, idx: usize) -> &[f64] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.weights[start..end]
    }

    /// Total number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }
}
