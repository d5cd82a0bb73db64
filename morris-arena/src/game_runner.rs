//! Game runner - plays a single game between two drivers
//!
//! Level 3 - Step-level implementation

use morris_core::{
    Action, GameResult, GameState, MorrisError, PlayerDriver, Result, Rules, Side, Transition,
};
use serde::Serialize;

/// Illegal choices tolerated from one driver within a single turn
pub const DEFAULT_MAX_ILLEGAL: usize = 3;

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// Final game result
    pub result: GameResult,
    /// Actions applied, including removals
    pub plies: u32,
    /// Action history
    pub actions: Vec<Action>,
    /// Side that gave up instead of moving
    pub resigned: Option<Side>,
}

impl GameOutcome {
    pub fn white_wins(&self) -> bool {
        self.result == GameResult::WhiteWins
    }

    pub fn black_wins(&self) -> bool {
        self.result == GameResult::BlackWins
    }

    pub fn is_draw(&self) -> bool {
        self.result == GameResult::Draw
    }

    /// Get winner (None for draw)
    pub fn winner(&self) -> Option<Side> {
        self.result.winner()
    }
}

/// Alternates two drivers until the game is over
pub struct GameRunner<'a> {
    rules: &'a Rules,
    max_illegal: usize,
}

impl<'a> GameRunner<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        Self {
            rules,
            max_illegal: DEFAULT_MAX_ILLEGAL,
        }
    }

    /// How many illegal choices a driver may make per turn before the game aborts
    pub fn with_max_illegal(mut self, max_illegal: usize) -> Self {
        self.max_illegal = max_illegal;
        self
    }

    pub fn rules(&self) -> &Rules {
        self.rules
    }

    /// Play from the initial position
    pub fn play(
        &self,
        white: &mut dyn PlayerDriver,
        black: &mut dyn PlayerDriver,
    ) -> Result<GameOutcome> {
        self.play_from(self.rules.initial_state(), white, black, |_, _, _| {})
    }

    /// Play from `state`, calling `observe` after every applied action
    pub fn play_from(
        &self,
        mut state: GameState,
        white: &mut dyn PlayerDriver,
        black: &mut dyn PlayerDriver,
        mut observe: impl FnMut(Side, Action, &Transition),
    ) -> Result<GameOutcome> {
        let mut actions = Vec::new();

        while !self.rules.is_terminal(&state) {
            let side = state.to_move();
            let turn = match side {
                Side::White => self.take_turn(white, &state),
                Side::Black => self.take_turn(black, &state),
            };

            let (action, transition) = match turn {
                Ok(t) => t,
                Err(MorrisError::NoMoveAvailable) => {
                    tracing::info!("{} resigned at ply {}", side, state.ply());
                    return Ok(GameOutcome {
                        result: GameResult::win_for(side.opponent()),
                        plies: state.ply(),
                        actions,
                        resigned: Some(side),
                    });
                }
                Err(e) => return Err(e),
            };

            tracing::debug!(ply = transition.state.ply(), side = %side, action = %action);
            observe(side, action, &transition);
            actions.push(action);
            state = transition.state;
        }

        Ok(GameOutcome {
            result: self.rules.result(&state),
            plies: state.ply(),
            actions,
            resigned: None,
        })
    }

    /// Ask `driver` for an action, re-asking after illegal choices
    fn take_turn(
        &self,
        driver: &mut dyn PlayerDriver,
        state: &GameState,
    ) -> Result<(Action, Transition)> {
        let mut illegal = 0;
        loop {
            let attempt = driver.choose(self.rules, state).and_then(|action| {
                self.rules
                    .apply_with_report(state, action)
                    .map(|t| (action, t))
            });
            match attempt {
                Err(MorrisError::IllegalAction { action }) => {
                    illegal += 1;
                    tracing::warn!("{} chose illegal action {}", driver.name(), action);
                    if illegal >= self.max_illegal {
                        return Err(MorrisError::IllegalAction { action });
                    }
                }
                other => return other,
            }
        }
    }
}
