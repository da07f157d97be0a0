pub mod agglomerative;
pub mod common;
pub mod skipgram;
pub mod walks;

pub use agglomerative::{average_linkage_labels, pairwise_distances, percentile};
pub use common::GraphView;
pub use skipgram::{train_embeddings, SkipGramConfig};
pub use walks::{generate_walks, WalkConfig};
