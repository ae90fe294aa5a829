//! # pathline-match
//!
//! The pattern-matching engine: reassignment strategies, sequence padding,
//! pairwise distance matrices, Ward hierarchical clustering, dendrograms,
//! representative selection, statistics, and exports.

pub mod cluster;
pub mod distance;
pub mod engine;
pub mod export;
pub mod padding;
pub mod reassign;
pub mod representative;
pub mod statistics;

pub use engine::{
    ClusterDecision, FixedPrompt, MatchEngine, MatchOutcome, MatchPrompt, MatchSummary,
    ThresholdDecision,
};
