//! Weight-biased random-walk sampling
//!
//! Generates the walk corpus consumed by the skip-gram trainer. Each step is
//! drawn proportionally to edge weight, so heavier edges are followed more
//! often.

use crate::common::GraphView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random-walk sampling parameters
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Number of steps per walk, including the start node
    pub walk_length: usize,
    /// Number of walks started from every node
    pub walks_per_node: usize,
    /// Seed for the sampling RNG
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            walk_length: 30,
            walks_per_node: 100,
            seed: 0,
        }
    }
}

/// Generate `walks_per_node` weight-biased walks from every node.
///
/// Walks are emitted in passes over the node range, so the corpus order (and
/// with it the whole sampling sequence) is deterministic for a given seed.
/// A walk that reaches a node with no neighbors ends early; an isolated start
/// node yields a single-element walk.
pub fn generate_walks(view: &GraphView, config: &WalkConfig) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut walks = Vec::with_capacity(view.node_count * config.walks_per_node);

    for _ in 0..config.walks_per_node {
        for start in 0..view.node_count {
            walks.push(sample_walk(view, start, config.walk_length, &mut rng));
        }
    }

    walks
}

fn sample_walk(view: &GraphView, start: usize, length: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut walk = Vec::with_capacity(length);
    walk.push(start);

    let mut current = start;
    for _ in 1..length {
        let neighbors = view.neighbors(current);
        if neighbors.is_empty() {
            break;
        }
        let weights = view.edge_weights(current);

        let total: f64 = weights.iter().sum();
        let mut draw = rng.gen::<f64>() * total;
        let mut next = neighbors[neighbors.len() - 1];
        for (&neighbor, &weight) in neighbors.iter().zip(weights) {
            if draw < weight {
                next = neighbor;
                break;
            }
            draw -= weight;
        }

        walk.push(next);
        current = next;
    }

    walk
}
