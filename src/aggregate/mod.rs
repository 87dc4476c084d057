//! Event aggregation
//!
//! The core engine: per-match event dispatch into per-(player, season)
//! accumulators, with per-match appearance tracking.

pub mod engine;
pub mod stats;

pub use engine::{EventAggregator, RunReport};
pub use stats::PlayerSeasonStats;
