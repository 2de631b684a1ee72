//! Similarity ranking of retrieved candidates.
//!
//! Scores are clamped cosine similarities in `[0, 1]`, reduced across query
//! texts by a [`Reducer`]. Ranking is infallible: anything that cannot be
//! scored scores zero and keeps its retrieval position among zeros.

pub mod model;
pub mod ranker;
pub mod similarity;


pub use model::{ConnectedNodeBundle, RankedRequirement, Reducer};
pub use ranker::SimilarityRanker;
pub use similarity::clamped_cosine;
