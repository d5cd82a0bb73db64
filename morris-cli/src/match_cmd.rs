//! Match command - play games between two AI players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), report_results()
//! - Level 3: player_config()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use morris_arena::{play_match, MatchConfig, MatchResult, PlayerConfig};
use morris_core::{SearchConfig, StrategyKind};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Match config JSON file (overrides the player flags)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Strategy of the first player (white in games 1, 3, ...)
    #[arg(long, default_value = "alphabeta-cutoff")]
    pub first: StrategyKind,

    /// Strategy of the second player
    #[arg(long, default_value = "random")]
    pub second: StrategyKind,

    /// Cutoff depth for the first player
    #[arg(long, default_value = "2")]
    pub first_depth: u32,

    /// Cutoff depth for the second player
    #[arg(long, default_value = "2")]
    pub second_depth: u32,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Declare a draw after this many plies
    #[arg(long, default_value = "200")]
    pub ply_limit: u32,

    /// Run games one after another
    #[arg(long)]
    pub sequential: bool,

    /// Write the effective match config to this file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build the match config from flags or a file
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    if let Some(path) = &args.save_config {
        config.save(path)?;
        tracing::info!("Saved match config to {}", path.display());
    }

    let results = play_match(&config).context("Match failed")?;

    report_results(&results, args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => {
            let mut config = MatchConfig::new(
                player_config(args.first, args.first_depth),
                player_config(args.second, args.second_depth),
                args.games,
            );
            config.rules = config.rules.with_ply_limit(Some(args.ply_limit));
            config
        }
    };

    if args.sequential {
        config.parallel = false;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

fn report_results(results: &MatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Search settings for a strategy given on the command line
fn player_config(strategy: StrategyKind, depth: u32) -> PlayerConfig {
    match strategy {
        StrategyKind::AlphaBetaCutoff => PlayerConfig::cutoff(depth),
        other => PlayerConfig {
            strategy: other,
            search: SearchConfig::default(),
        },
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: u32, total: u32) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as text
fn print_text_results(results: &MatchResult) {
    let total = results.games_played;

    println!("\n=== Match Results ===");
    println!("{} vs {}", results.first, results.second);
    println!("Total games: {}", total);
    println!(
        "{:<12} {} ({:.1}%)",
        format!("{}:", results.first),
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "{:<12} {} ({:.1}%)",
        format!("{}:", results.second),
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!(
        "White/Black: {} / {}",
        results.white_wins, results.black_wins
    );
    println!("Avg plies:   {:.1}", results.avg_plies);
    println!(
        "Score:       {:.1} - {:.1}",
        results.score_for_first(),
        results.score_for_second()
    );

    println!("\nGame details:");
    for (i, game) in results.game_outcomes.iter().enumerate() {
        println!("  Game {}: {:?} in {} plies", i + 1, game.result, game.plies);
    }
}

// ============================================================================
// TESTS
// ============================================================================
