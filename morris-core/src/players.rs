//! Player drivers: who picks the next action

use crate::ai::{build_strategy, decide, ensure_bounded, SearchConfig, StrategyKind};
use crate::error::{MorrisError, Result};
use crate::game::{Action, GameState};
use crate::rules::{RuleOptions, Rules};
use crate::search::{Decision, Strategy};

/// Source of actions for one side of a game
pub trait PlayerDriver {
    fn name(&self) -> &str;

    /// Pick an action for `state`. Returns `IllegalAction` for a choice the rules reject,
    /// after which the caller may simply ask again.
    fn choose(&mut self, rules: &Rules, state: &GameState) -> Result<Action>;
}

// ============================================================================
// HUMAN
// ============================================================================

/// Forwards actions supplied from outside (console, UI). The source receives the
/// state and its legal actions and returns `None` when the player gives up.
pub struct HumanDriver<F> {
    name: String,
    source: F,
}

impl<F> HumanDriver<F>
where
    F: FnMut(&GameState, &[Action]) -> Option<Action>,
{
    pub fn new(name: impl Into<String>, source: F) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

impl<F> PlayerDriver for HumanDriver<F>
where
    F: FnMut(&GameState, &[Action]) -> Option<Action>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, rules: &Rules, state: &GameState) -> Result<Action> {
        let legal = rules.legal_actions(state);
        if legal.is_empty() {
            return Err(MorrisError::NoMoveAvailable);
        }

        let action = (self.source)(state, &legal).ok_or(MorrisError::NoMoveAvailable)?;
        if !legal.contains(&action) {
            return Err(MorrisError::IllegalAction { action });
        }
        Ok(action)
    }
}

// ============================================================================
// AI
// ============================================================================

/// Runs one search strategy per turn
pub struct AiDriver {
    kind: StrategyKind,
    strategy: Box<dyn Strategy<Rules>>,
    last: Option<Decision<Action>>,
}

impl AiDriver {
    pub fn new(kind: StrategyKind, config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            kind,
            strategy: build_strategy(kind, config)?,
            last: None,
        })
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Fails with `Configuration` when this search cannot terminate under `options`
    pub fn check_rules(&self, options: &RuleOptions) -> Result<()> {
        ensure_bounded(options, self.strategy.as_ref())
    }

    /// Statistics of the most recent search
    pub fn last_decision(&self) -> Option<&Decision<Action>> {
        self.last.as_ref()
    }
}

impl PlayerDriver for AiDriver {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn choose(&mut self, rules: &Rules, state: &GameState) -> Result<Action> {
        let decision = decide(rules, self.strategy.as_mut(), state)?;
        self.last = Some(decision);
        Ok(decision.action)
    }
}

// ============================================================================
// TESTS
// ============================================================================
