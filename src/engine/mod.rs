//! Suggestion engine facade
//!
//! Runs the whole assignment pipeline for one roster snapshot:
//! graph -> embeddings -> clusters -> per-cluster index -> assembly.
//! Each invocation is a fresh batch computation with no retained state;
//! re-running with the same roster, configuration, and seed reproduces the
//! same suggestion map.

use crate::cluster::{cluster_embeddings, ClusterConfig, ClusterError};
use crate::embed::{EmbedError, EmbeddingConfig, GraphEmbedder, RandomWalkEmbedder};
use crate::graph::{build_org_graph, DEFAULT_DIRECT_WEIGHT, DEFAULT_FUNCTIONAL_WEIGHT};
use crate::roster::Roster;
use crate::suggest::{SoftContext, SuggestionAssembler, SuggestionMap};
use crate::vector::{ClusterKnnIndex, VectorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Engine errors. Any of these fails the whole run; callers must not persist
/// partial output.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("roster is empty, nothing to assign")]
    EmptyRoster,

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("clustering failed: {0}")]
    Clustering(#[from] ClusterError),

    #[error("neighbor index failed: {0}")]
    NeighborIndex(#[from] VectorError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Engine hyperparameters. Every field has a serde default so tenant
/// configuration documents can override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weight of (employee, direct supervisor) edges
    pub direct_weight: f64,
    /// Weight of (employee, functional supervisor) edges
    pub functional_weight: f64,
    /// Random-walk embedding parameters
    pub embedding: EmbeddingConfig,
    /// Percentile of pairwise distances used as the clustering cutoff
    pub threshold_percentile: f64,
    /// Neighbor capacity of the per-cluster index
    pub knn_k: usize,
    /// Maximum suggestions per employee across the supervisor, report, and
    /// peer steps; self-evaluation rides above this cap
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            direct_weight: DEFAULT_DIRECT_WEIGHT,
            functional_weight: DEFAULT_FUNCTIONAL_WEIGHT,
            embedding: EmbeddingConfig::default(),
            threshold_percentile: 50.0,
            knn_k: 5,
            top_k: 3,
        }
    }
}

/// Per-tenant 360-degree suggestion engine.
///
/// Built from an already-materialized roster snapshot; persistence stays
/// entirely outside the algorithmic core.
pub struct SuggestionEngine {
    roster: Roster,
    config: EngineConfig,
    embedder: Box<dyn GraphEmbedder>,
}

impl SuggestionEngine {
    pub fn new(roster: Roster, config: EngineConfig) -> Self {
        let embedder = Box::new(RandomWalkEmbedder::new(config.embedding.clone()));
        Self {
            roster,
            config,
            embedder,
        }
    }

    /// Swap the embedding implementation, keeping the rest of the pipeline
    pub fn with_embedder(mut self, embedder: Box<dyn GraphEmbedder>) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Run the pipeline and produce the per-employee suggestion lists.
    ///
    /// With fewer than 2 employees the soft (embedding/cluster/peer) stages
    /// are skipped and only hard rules apply; every employee still gets at
    /// least its self-evaluation entry.
    pub fn assign_suggestions(&self) -> EngineResult<SuggestionMap> {
        if self.roster.is_empty() {
            return Err(EngineError::EmptyRoster);
        }

        info!(employees = self.roster.len(), "assigning evaluators");
        let view = build_org_graph(
            &self.roster,
            self.config.direct_weight,
            self.config.functional_weight,
        );
        debug!(nodes = view.node_count, edges = view.edge_count(), "built org graph");

        let assembler = SuggestionAssembler::new(&self.roster, self.config.top_k);

        let embeddings = self.embedder.embed(&view)?;
        if embeddings.nrows() < self.roster.len() {
            debug!("embeddings unavailable, falling back to hard rules only");
            return Ok(assembler.assemble(None));
        }

        let labels = cluster_embeddings(
            &embeddings,
            &ClusterConfig {
                threshold_percentile: self.config.threshold_percentile,
            },
        )?;
        let index = ClusterKnnIndex::build(&embeddings, &labels, self.config.knn_k)?;

        let soft = SoftContext {
            embeddings: &embeddings,
            labels: &labels,
            index: &index,
        };
        Ok(assembler.assemble(Some(&soft)))
    }

    /// Cluster labels for the current roster, in roster order. Exposed for
    /// diagnostics and tests; `assign_suggestions` recomputes them.
    pub fn cluster_labels(&self) -> EngineResult<Vec<usize>> {
        if self.roster.is_empty() {
            return Err(EngineError::EmptyRoster);
        }
        let view = build_org_graph(
            &self.roster,
            self.config.direct_weight,
            self.config.functional_weight,
        );
        let embeddings = self.embedder.embed(&view)?;
        if embeddings.nrows() < self.roster.len() {
            return Ok(vec![0; self.roster.len()]);
        }
        let labels = cluster_embeddings(
            &embeddings,
            &ClusterConfig {
                threshold_percentile: self.config.threshold_percentile,
            },
        )?;
        Ok(labels)
    }
}
