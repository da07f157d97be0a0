//! Structural embedding front-end
//!
//! Produces one fixed-length vector per graph node, placing structurally
//! similar employees close together. The engine only depends on the
//! [`GraphEmbedder`] trait, so the default random-walk implementation can be
//! swapped for any other structure-preserving embedding without touching the
//! assembler.

use ndarray::Array2;
use panorama_algorithms::{generate_walks, train_embeddings, GraphView, SkipGramConfig, WalkConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Embedding errors
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Rejected hyperparameters
    #[error("invalid embedding configuration: {0}")]
    InvalidConfig(String),
}

pub type EmbedResult<T> = Result<T, EmbedError>;

/// Hyperparameters of the random-walk embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding dimension
    pub dimension: usize,
    /// Steps per walk, including the start node
    pub walk_length: usize,
    /// Walks started from every node
    pub walks_per_node: usize,
    /// Skip-gram context window radius
    pub window: usize,
    /// Negative samples per positive pair
    pub negative_samples: usize,
    /// Passes over the walk corpus
    pub epochs: usize,
    /// Initial skip-gram learning rate
    pub learning_rate: f64,
    /// Seed for walk sampling and model initialization
    pub seed: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 64,
            walk_length: 30,
            walks_per_node: 100,
            window: 5,
            negative_samples: 5,
            epochs: 5,
            learning_rate: 0.025,
            seed: 0,
        }
    }
}

impl EmbeddingConfig {
    fn validate(&self) -> EmbedResult<()> {
        if self.dimension == 0 {
            return Err(EmbedError::InvalidConfig("dimension must be positive".into()));
        }
        if self.walk_length == 0 || self.walks_per_node == 0 {
            return Err(EmbedError::InvalidConfig(
                "walk length and walks per node must be positive".into(),
            ));
        }
        if self.window == 0 {
            return Err(EmbedError::InvalidConfig("window must be positive".into()));
        }
        Ok(())
    }
}

/// Structure-preserving graph embedding
///
/// Implementations return a `node_count x dimension` matrix whose row `i`
/// embeds node index `i`, or an empty (0-row) matrix when the graph is too
/// small to embed (fewer than 2 nodes). The caller then falls back to
/// hard-rule suggestions only.
pub trait GraphEmbedder: Send + Sync {
    fn embed(&self, view: &GraphView) -> EmbedResult<Array2<f32>>;

    /// Embedding dimension of the produced matrix
    fn dimension(&self) -> usize;
}

/// Default embedder: weight-biased random walks + skip-gram
#[derive(Debug, Clone, Default)]
pub struct RandomWalkEmbedder {
    config: EmbeddingConfig,
}

impl RandomWalkEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }
}

impl GraphEmbedder for RandomWalkEmbedder {
    fn embed(&self, view: &GraphView) -> EmbedResult<Array2<f32>> {
        self.config.validate()?;

        if view.node_count < 2 {
            debug!(nodes = view.node_count, "graph too small to embed");
            return Ok(Array2::zeros((0, self.config.dimension)));
        }

        let walks = generate_walks(
            view,
            &WalkConfig {
                walk_length: self.config.walk_length,
                walks_per_node: self.config.walks_per_node,
                seed: self.config.seed,
            },
        );
        debug!(
            nodes = view.node_count,
            walks = walks.len(),
            "sampled walk corpus"
        );

        let embeddings = train_embeddings(
            &walks,
            view.node_count,
            &SkipGramConfig {
                dimension: self.config.dimension,
                window: self.config.window,
                negative_samples: self.config.negative_samples,
                epochs: self.config.epochs,
                learning_rate: self.config.learning_rate,
                seed: self.config.seed,
            },
        );
        debug!(rows = embeddings.nrows(), "trained embeddings");

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}
