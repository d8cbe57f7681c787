//! The weighted file graph and its personalized-PageRank ranking.

pub mod builder;
pub mod pagerank;

pub use builder::{build_graph, TagGraph};
pub use pagerank::{rank, RankedTag};
