//! Morris Arena - Games and matches between player drivers
//!
//! This crate provides the orchestrating loop around the rule engine:
//! - Single games between any two drivers (human or AI)
//! - Matches between AI players with colour alternation
//! - JSON-loadable match configuration
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: play_match (phases)
//! - Level 3: GameRunner::play (steps)
//! - Level 4: configuration

mod config;
mod game_runner;
mod match_play;

pub use config::{MatchConfig, PlayerConfig, DEFAULT_PLY_LIMIT};
pub use game_runner::{GameOutcome, GameRunner, DEFAULT_MAX_ILLEGAL};
pub use match_play::{play_match, MatchResult, DEFAULT_MATCH_SEED};
