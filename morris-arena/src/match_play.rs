//! Match play - a series of games between two AI players
//!
//! Level 2 - Phase-level implementation

use morris_core::{AiDriver, GameResult, Result, Rules};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{MatchConfig, PlayerConfig};
use crate::game_runner::{GameOutcome, GameRunner};

/// Base seed when the match config has none
pub const DEFAULT_MATCH_SEED: u64 = 42;

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Label of the first player
    pub first: String,
    /// Label of the second player
    pub second: String,
    /// Wins for the first player, either colour
    pub first_wins: u32,
    /// Wins for the second player, either colour
    pub second_wins: u32,
    /// Games won by whoever played white
    pub white_wins: u32,
    /// Games won by whoever played black
    pub black_wins: u32,
    pub draws: u32,
    /// Average game length in plies
    pub avg_plies: f32,
    pub games_played: u32,
    /// Individual game outcomes, in game order
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty(first: String, second: String) -> Self {
        Self {
            first,
            second,
            first_wins: 0,
            second_wins: 0,
            white_wins: 0,
            black_wins: 0,
            draws: 0,
            avg_plies: 0.0,
            games_played: 0,
            game_outcomes: Vec::new(),
        }
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn draw_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.draws as f32 / self.games_played as f32
        }
    }
}

/// Play a match as described by `config` (Level 2 phase)
///
/// Colours alternate each game; the first player takes white in even-numbered games.
pub fn play_match(config: &MatchConfig) -> Result<MatchResult> {
    // Reject bad search settings before any game starts
    AiDriver::new(config.first.strategy, &config.first.search)?.check_rules(&config.rules)?;
    AiDriver::new(config.second.strategy, &config.second.search)?.check_rules(&config.rules)?;

    let first = config.first.label();
    let second = config.second.label();
    if config.games == 0 {
        return Ok(MatchResult::empty(first, second));
    }

    tracing::info!(
        "Match: {} vs {}, {} games{}",
        first,
        second,
        config.games,
        if config.parallel { " (parallel)" } else { "" }
    );

    let rules = Rules::new(config.rules);
    let game_configs = prepare_game_configs(config.games, config.seed.unwrap_or(DEFAULT_MATCH_SEED));
    let outcomes = if config.parallel {
        execute_games_parallel(&rules, config, &game_configs)?
    } else {
        execute_games(&rules, config, &game_configs)?
    };

    Ok(aggregate_results(first, second, outcomes))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy, Debug)]
struct GameConfig {
    /// Whether the first player has white this game
    first_is_white: bool,
    game_index: usize,
    seed: u64,
}

/// Prepare game configurations for a match
fn prepare_game_configs(games: usize, base_seed: u64) -> Vec<GameConfig> {
    (0..games)
        .map(|i| GameConfig {
            first_is_white: i % 2 == 0, // Alternate colors
            game_index: i,
            seed: base_seed.wrapping_add(i as u64),
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(
    rules: &Rules,
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Result<Vec<GameOutcomeWithContext>> {
    game_configs
        .iter()
        .map(|gc| play_single_game(rules, config, gc))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    rules: &Rules,
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Result<Vec<GameOutcomeWithContext>> {
    game_configs
        .par_iter()
        .map(|gc| play_single_game(rules, config, gc))
        .collect()
}

/// Outcome with context about which player had which colour
#[derive(Clone)]
struct GameOutcomeWithContext {
    outcome: GameOutcome,
    first_was_white: bool,
}

/// Build a driver, giving seedless random players the per-game seed
fn driver_for(player: &PlayerConfig, seed: u64) -> Result<AiDriver> {
    let mut search = player.search.clone();
    if search.seed.is_none() {
        search.seed = Some(seed);
    }
    AiDriver::new(player.strategy, &search)
}

/// Play a single game with the given configuration
fn play_single_game(
    rules: &Rules,
    config: &MatchConfig,
    gc: &GameConfig,
) -> Result<GameOutcomeWithContext> {
    let mut first = driver_for(&config.first, gc.seed)?;
    let mut second = driver_for(&config.second, gc.seed.wrapping_add(1 << 32))?;

    let runner = GameRunner::new(rules);
    let outcome = if gc.first_is_white {
        runner.play(&mut first, &mut second)?
    } else {
        runner.play(&mut second, &mut first)?
    };

    tracing::info!(
        "Game {}: {:?} in {} plies",
        gc.game_index + 1,
        outcome.result,
        outcome.plies
    );

    Ok(GameOutcomeWithContext {
        outcome,
        first_was_white: gc.first_is_white,
    })
}

/// Aggregate game outcomes into a match result
fn aggregate_results(
    first: String,
    second: String,
    outcomes: Vec<GameOutcomeWithContext>,
) -> MatchResult {
    let mut result = MatchResult::empty(first, second);
    let mut total_plies = 0u32;

    for owc in outcomes {
        total_plies += owc.outcome.plies;

        // Attribute wins based on who was playing which colour
        match owc.outcome.result {
            GameResult::WhiteWins => {
                result.white_wins += 1;
                if owc.first_was_white {
                    result.first_wins += 1;
                } else {
                    result.second_wins += 1;
                }
            }
            GameResult::BlackWins => {
                result.black_wins += 1;
                if owc.first_was_white {
                    result.second_wins += 1;
                } else {
                    result.first_wins += 1;
                }
            }
            GameResult::Draw | GameResult::Ongoing => {
                result.draws += 1;
            }
        }
        result.game_outcomes.push(owc.outcome);
    }

    result.games_played = result.game_outcomes.len() as u32;
    if result.games_played > 0 {
        result.avg_plies = total_plies as f32 / result.games_played as f32;
    }
    result
}
