//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use anyhow::Context;
use morris_core::{Heuristics, RuleOptions, SearchConfig, StrategyKind};
use serde::{Deserialize, Serialize};

/// Ply limit applied to arena games unless configured otherwise
pub const DEFAULT_PLY_LIMIT: u32 = 200;

/// One AI participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub strategy: StrategyKind,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::cutoff(2)
    }
}

impl PlayerConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            search: SearchConfig::default(),
        }
    }

    /// Alpha-beta cutoff at `depth` with default heuristics
    pub fn cutoff(depth: u32) -> Self {
        Self {
            strategy: StrategyKind::AlphaBetaCutoff,
            search: SearchConfig::cutoff(depth),
        }
    }

    pub fn random() -> Self {
        Self::new(StrategyKind::Random)
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.search.evaluator = Some(heuristics);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.seed = Some(seed);
        self
    }

    /// Short name for reports, e.g. `alphabeta-cutoff(d=2)`
    pub fn label(&self) -> String {
        match (self.strategy, self.search.depth) {
            (StrategyKind::AlphaBetaCutoff, Some(d)) => format!("{}(d={})", self.strategy, d),
            _ => self.strategy.to_string(),
        }
    }
}

/// A series of games between two players
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Plays white in even-numbered games
    pub first: PlayerConfig,
    /// Plays white in odd-numbered games
    pub second: PlayerConfig,
    /// Number of games (should be even for colour balance)
    pub games: usize,
    pub rules: RuleOptions,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed; game `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            first: PlayerConfig::cutoff(2),
            second: PlayerConfig::random(),
            games: 10,
            rules: RuleOptions::classic().with_ply_limit(Some(DEFAULT_PLY_LIMIT)),
            parallel: true,
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn new(first: PlayerConfig, second: PlayerConfig, games: usize) -> Self {
        Self {
            first,
            second,
            games,
            ..Default::default()
        }
    }

    pub fn with_rules(mut self, rules: RuleOptions) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write match config: {}", path.display()))?;
        Ok(())
    }
}
