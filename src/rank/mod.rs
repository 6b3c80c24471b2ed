pub mod advice;
pub mod ranker;
pub mod synthetic;

pub use advice::advise;
pub use ranker::{format_percent, rank, top_k, RankedPrediction};
pub use synthetic::synthetic_scores;
