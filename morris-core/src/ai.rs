//! Strategy selection for the mill game

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MorrisError, Result};
use crate::eval::Heuristics;
use crate::game::{Action, GameState, Side};
use crate::rules::{RuleOptions, Rules};
use crate::search::{
    AlphaBeta, AlphaBetaCutoff, Decision, Expectimax, Game, Minimax, RandomPlayer,
    StochasticGame, Strategy,
};

/// Seed used by the random player when none is configured
pub const DEFAULT_SEED: u64 = 42;

// ============================================================================
// SEARCH CONTRACT
// ============================================================================

impl Game for Rules {
    type State = GameState;
    type Action = Action;
    type Player = Side;

    fn to_move(&self, state: &GameState) -> Side {
        state.to_move()
    }

    fn actions(&self, state: &GameState) -> Vec<Action> {
        self.legal_actions(state)
    }

    fn result(&self, state: &GameState, action: Action) -> GameState {
        self.transition(state, action).state
    }

    fn is_terminal(&self, state: &GameState) -> bool {
        Rules::is_terminal(self, state)
    }

    fn utility(&self, state: &GameState, player: Side) -> f64 {
        Rules::utility(self, state, player) as f64
    }
}

/// The mill game is deterministic: one pseudo-outcome that always happens
impl StochasticGame for Rules {
    type Chance = ();

    fn chances(&self, _state: &GameState) -> Vec<()> {
        vec![()]
    }

    fn outcome(&self, state: &GameState, _chance: &()) -> GameState {
        state.clone()
    }

    fn probability(&self, _chance: &()) -> f64 {
        1.0
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Named search strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Random,
    Minimax,
    AlphaBeta,
    #[serde(rename = "alphabeta-cutoff")]
    AlphaBetaCutoff,
    Expectimax,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Random,
        StrategyKind::Minimax,
        StrategyKind::AlphaBeta,
        StrategyKind::AlphaBetaCutoff,
        StrategyKind::Expectimax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Minimax => "minimax",
            StrategyKind::AlphaBeta => "alphabeta",
            StrategyKind::AlphaBetaCutoff => "alphabeta-cutoff",
            StrategyKind::Expectimax => "expectimax",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = MorrisError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let kind = match key.as_str() {
            "random" => StrategyKind::Random,
            "minimax" | "minmax" => StrategyKind::Minimax,
            "alpha-beta" | "alphabeta" => StrategyKind::AlphaBeta,
            "alpha-beta-cutoff" | "alphabeta-cutoff" | "alphabetacutoff" | "cutoff" => {
                StrategyKind::AlphaBetaCutoff
            }
            "expectimax" | "expect-minmax" => StrategyKind::Expectimax,
            _ => {
                return Err(MorrisError::Configuration(format!(
                    "unknown strategy: {}",
                    s
                )))
            }
        };
        Ok(kind)
    }
}

/// Search options. `depth` and `evaluator` apply to the cutoff strategy only,
/// `seed` to the random player only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies below the root before the evaluator takes over; `None` searches to the end
    pub depth: Option<u32>,
    pub evaluator: Option<Heuristics>,
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Cutoff search at `depth` with default heuristics
    pub fn cutoff(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            evaluator: Some(Heuristics::default()),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.evaluator = Some(heuristics);
        self
    }
}

// ============================================================================
// STRATEGY CONSTRUCTION
// ============================================================================

/// Build a strategy for the mill game, rejecting bad configurations up front
pub fn build_strategy(kind: StrategyKind, config: &SearchConfig) -> Result<Box<dyn Strategy<Rules>>> {
    let strategy: Box<dyn Strategy<Rules>> = match kind {
        StrategyKind::Random => Box::new(RandomPlayer::new(config.seed.unwrap_or(DEFAULT_SEED))),
        StrategyKind::Minimax => Box::new(Minimax),
        StrategyKind::AlphaBeta => Box::new(AlphaBeta),
        StrategyKind::AlphaBetaCutoff => {
            if config.depth == Some(0) {
                return Err(MorrisError::Configuration(
                    "cutoff depth must be at least 1".to_string(),
                ));
            }
            let evaluator = config.evaluator.clone().ok_or_else(|| {
                MorrisError::Configuration("cutoff search needs an evaluator".to_string())
            })?;
            if config.depth.is_none() {
                tracing::warn!("cutoff search without a depth limit explores the full tree");
            }
            Box::new(AlphaBetaCutoff::new(config.depth, evaluator))
        }
        StrategyKind::Expectimax => Box::new(Expectimax),
    };
    Ok(strategy)
}

/// Reject a search that only stops at terminal states when the rules have no ply limit
pub fn ensure_bounded(options: &RuleOptions, strategy: &dyn Strategy<Rules>) -> Result<()> {
    if strategy.is_depth_limited() || options.ply_limit.is_some() {
        return Ok(());
    }
    Err(MorrisError::Configuration(format!(
        "{} searches to the end of the game and needs a ply limit",
        strategy.name()
    )))
}

/// Run one search and report the decision with its statistics
pub fn decide(
    rules: &Rules,
    strategy: &mut dyn Strategy<Rules>,
    state: &GameState,
) -> Result<Decision<Action>> {
    if !rules.is_terminal(state) {
        ensure_bounded(rules.options(), &*strategy)?;
    }

    let decision = strategy
        .choose(rules, state)
        .ok_or(MorrisError::NoMoveAvailable)?;

    tracing::debug!(
        strategy = strategy.name(),
        nodes = decision.nodes,
        value = decision.value,
        "chose {}",
        decision.action
    );

    Ok(decision)
}

/// One-shot action choice for `state`
pub fn choose_action(
    rules: &Rules,
    kind: StrategyKind,
    state: &GameState,
    config: &SearchConfig,
) -> Result<Action> {
    let mut strategy = build_strategy(kind, config)?;
    decide(rules, strategy.as_mut(), state).map(|d| d.action)
}

// ============================================================================
// TESTS
// ============================================================================
