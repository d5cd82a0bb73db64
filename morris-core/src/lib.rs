//! Morris Core - Rule engine and adversarial search
//!
//! This crate provides the core game logic for Nine Men's Morris:
//! - Board geometry (24 points, adjacency, 16 mills)
//! - Game state, phases and actions
//! - Rule engine: move generation, mills and removals, terminal detection
//! - Position evaluation for depth-limited search
//! - Game-agnostic search (minimax, alpha-beta, cutoff, expectimax, random)
//! - Player drivers for humans and AIs

pub mod ai;
pub mod board;
pub mod error;
pub mod eval;
pub mod game;
pub mod players;
pub mod rules;
pub mod search;

// Re-exports for convenient access
pub use ai::{build_strategy, choose_action, decide, ensure_bounded, SearchConfig, StrategyKind};
pub use board::{Mill, Point, NUM_MILLS, NUM_POINTS};
pub use error::{MorrisError, Result};
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use game::{Action, GameResult, GameState, Phase, Side, MIN_PIECES, PIECES_PER_SIDE};
pub use players::{AiDriver, HumanDriver, PlayerDriver};
pub use rules::{RuleOptions, Rules, Transition};
pub use search::{Decision, Evaluator, Game, StochasticGame, Strategy};
