//! ragline-retrieval
//!
//! Pure merge-and-score stages of the retrieval pipeline: hybrid fusion of
//! vector and lexical result lists, query expansion, and relevance
//! re-scoring with near-duplicate diversification. Store and generator
//! calls stay behind the `ragline-core` traits.

pub mod expansion;
pub mod fusion;
pub mod ranking;

pub use expansion::QueryExpander;
pub use fusion::{auto_vector_weight, fuse};
pub use ranking::rank;
