//! Panorama evaluator-assignment engine
//!
//! Computes who evaluates whom for a 360-degree survey, given one tenant's
//! employee roster and its reporting-graph structure. The pipeline combines
//! graph construction from organizational relationships, structural
//! embeddings from biased random walks, agglomerative clustering with a
//! dynamically derived cutoff, a per-cluster nearest-neighbor index, and a
//! rule-based assembler that blends graph-derived hard relations (self,
//! supervisor, direct reports) with embedding-derived peer suggestions.
//!
//! The engine is an in-process library invoked synchronously by the
//! survey-creation control flow; it owns no persistence, protocol, or CLI.
//!
//! # Example Usage
//!
//! ```rust
//! use panorama::embed::EmbeddingConfig;
//! use panorama::engine::{EngineConfig, SuggestionEngine};
//! use panorama::roster::{EmployeeRecord, Roster};
//!
//! let roster = Roster::from_records(vec![
//!     EmployeeRecord::new("mgr-1", 100),
//!     EmployeeRecord::new("emp-1", 101).with_direct_supervisor("mgr-1"),
//!     EmployeeRecord::new("emp-2", 102).with_direct_supervisor("mgr-1"),
//! ]);
//!
//! let config = EngineConfig {
//!     embedding: EmbeddingConfig {
//!         dimension: 16,
//!         walk_length: 10,
//!         walks_per_node: 20,
//!         seed: 7,
//!         ..EmbeddingConfig::default()
//!     },
//!     ..EngineConfig::default()
//! };
//! let engine = SuggestionEngine::new(roster, config);
//! let suggestions = engine.assign_suggestions().unwrap();
//! assert_eq!(suggestions.len(), 3);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod cluster;
pub mod embed;
pub mod engine;
pub mod graph;
pub mod roster;
pub mod suggest;
pub mod vector;
pub mod workflow;

// Re-export main types for convenience
pub use cluster::{cluster_embeddings, ClusterConfig, ClusterError, ClusterResult};
pub use embed::{
    EmbedError, EmbedResult, EmbeddingConfig, GraphEmbedder, RandomWalkEmbedder,
};
pub use engine::{EngineConfig, EngineError, EngineResult, SuggestionEngine};
pub use graph::build_org_graph;
pub use roster::{EmployeeId, EmployeeNumber, EmployeeRecord, Roster, SurveyId, TenantId};
pub use suggest::{Relation, Suggestion, SuggestionMap};
pub use vector::{ClusterKnnIndex, Neighbor, VectorError, VectorResult};
pub use workflow::{
    generate_assignments, AssignmentRecord, AssignmentStore, GeneratedAssignments,
    RosterProvider, SurveyType, TargetType, WorkflowError, WorkflowResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
