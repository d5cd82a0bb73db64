//! Rule engine: legal action generation, transitions, mills and terminal detection

use serde::{Deserialize, Serialize};

use crate::board::{Mill, Point, NUM_POINTS};
use crate::error::{MorrisError, Result};
use crate::game::{Action, GameResult, GameState, Phase, Side, PIECES_PER_SIDE};

// ============================================================================
// OPTIONS
// ============================================================================

/// Rule variations. The classic game has both protection and flying enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Pieces standing in a closed mill may only be removed when every piece is
    pub mill_protection: bool,
    /// A side reduced to three pieces may jump to any empty point
    pub flying: bool,
    /// Game is drawn once this many actions have been applied
    pub ply_limit: Option<u32>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self::classic()
    }
}

impl RuleOptions {
    pub fn classic() -> Self {
        Self {
            mill_protection: true,
            flying: true,
            ply_limit: None,
        }
    }

    pub fn with_mill_protection(mut self, enabled: bool) -> Self {
        self.mill_protection = enabled;
        self
    }

    pub fn with_flying(mut self, enabled: bool) -> Self {
        self.flying = enabled;
        self
    }

    pub fn with_ply_limit(mut self, limit: Option<u32>) -> Self {
        self.ply_limit = limit;
        self
    }
}

/// Successor state plus what happened on the way
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    /// Every mill the action closed (at most two)
    pub mills: Vec<Mill>,
    /// Point emptied by a removal
    pub removed: Option<Point>,
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct Rules {
    options: RuleOptions,
}

impl Rules {
    pub fn new(options: RuleOptions) -> Self {
        Self { options }
    }

    pub fn classic() -> Self {
        Self::new(RuleOptions::classic())
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    pub fn initial_state(&self) -> GameState {
        GameState::new()
    }

    /// Build a mid-game position with no removal pending
    pub fn setup(
        &self,
        to_move: Side,
        white: &[Point],
        black: &[Point],
        unplaced: [u8; 2],
    ) -> Result<GameState> {
        let mut state = GameState::new();
        state.to_move = to_move;
        state.unplaced = unplaced;

        for (side, points) in [(Side::White, white), (Side::Black, black)] {
            if points.len() + unplaced[side.index()] as usize > PIECES_PER_SIDE as usize {
                return Err(MorrisError::InvalidPosition(format!(
                    "{} has more than {} pieces",
                    side, PIECES_PER_SIDE
                )));
            }
            for &point in points {
                if state.board.insert(point, side).is_some() {
                    return Err(MorrisError::InvalidPosition(format!(
                        "point {} occupied twice",
                        point
                    )));
                }
            }
        }

        self.refresh_phases(&mut state);
        Ok(state)
    }

    // ========================================================================
    // ACTION GENERATION
    // ========================================================================

    /// Legal actions in point order; empty once the game is over
    pub fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if self.result(state).is_over() {
            return Vec::new();
        }
        self.generate(state)
    }

    pub fn is_legal(&self, state: &GameState, action: Action) -> bool {
        self.legal_actions(state).contains(&action)
    }

    fn generate(&self, state: &GameState) -> Vec<Action> {
        if let Some(victim) = state.pending_removal {
            return self
                .removable_pieces(state, victim)
                .into_iter()
                .map(Action::Remove)
                .collect();
        }

        let mut actions = Vec::new();
        self.generate_moves(state, state.to_move, &mut actions);
        actions
    }

    /// Placements, slides or flights for `side`, regardless of whose turn it is
    fn generate_moves(&self, state: &GameState, side: Side, actions: &mut Vec<Action>) {
        match state.phase(side) {
            Phase::Placement => {
                actions.extend(state.empty_points().map(Action::Place));
            }
            Phase::Movement => {
                for from in state.pieces(side) {
                    for to in from.neighbors() {
                        if state.is_empty(to) {
                            actions.push(Action::Move { from, to });
                        }
                    }
                }
            }
            Phase::Flying => {
                let empty: Vec<Point> = state.empty_points().collect();
                for from in state.pieces(side) {
                    actions.extend(empty.iter().map(|&to| Action::Move { from, to }));
                }
            }
        }
    }

    fn has_any_action(&self, state: &GameState) -> bool {
        if let Some(victim) = state.pending_removal {
            return state.on_board(victim) > 0;
        }
        let side = state.to_move;
        match state.phase(side) {
            Phase::Placement | Phase::Flying => state.occupied() < NUM_POINTS,
            Phase::Movement => state
                .pieces(side)
                .any(|from| from.neighbors().any(|to| state.is_empty(to))),
        }
    }

    /// Opponent pieces that may be taken, honouring mill protection
    pub fn removable_pieces(&self, state: &GameState, victim: Side) -> Vec<Point> {
        let pieces: Vec<Point> = state.pieces(victim).collect();
        if !self.options.mill_protection {
            return pieces;
        }

        let unprotected: Vec<Point> = pieces
            .iter()
            .copied()
            .filter(|&p| !in_mill(state, p))
            .collect();

        // Everything is in a mill: any piece may go
        if unprotected.is_empty() {
            pieces
        } else {
            unprotected
        }
    }

    /// Number of moves `side` would have if it were to move (no pending removal)
    pub fn mobility(&self, state: &GameState, side: Side) -> usize {
        let mut actions = Vec::new();
        self.generate_moves(state, side, &mut actions);
        actions.len()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Apply a legal action, returning the successor. `state` is never modified.
    pub fn apply(&self, state: &GameState, action: Action) -> Result<GameState> {
        self.apply_with_report(state, action).map(|t| t.state)
    }

    pub fn apply_with_report(&self, state: &GameState, action: Action) -> Result<Transition> {
        if !self.is_legal(state, action) {
            return Err(MorrisError::IllegalAction { action });
        }
        Ok(self.transition(state, action))
    }

    /// Successor of a known-legal action
    pub(crate) fn transition(&self, state: &GameState, action: Action) -> Transition {
        let mover = state.to_move;
        let mut next = state.clone();
        next.ply += 1;

        let mut mills = Vec::new();
        let mut removed = None;

        match action {
            Action::Place(point) => {
                next.unplaced[mover.index()] -= 1;
                next.board.insert(point, mover);
                mills = closed_mills_at(&next, point, mover);
            }
            Action::Move { from, to } => {
                next.board.remove(&from);
                next.board.insert(to, mover);
                mills = closed_mills_at(&next, to, mover);
            }
            Action::Remove(point) => {
                next.board.remove(&point);
                next.pending_removal = None;
                next.to_move = mover.opponent();
                removed = Some(point);
            }
        }

        if action.destination().is_some() {
            let victim = mover.opponent();
            // One removal per action no matter how many mills closed
            if !mills.is_empty() && next.on_board(victim) > 0 {
                next.pending_removal = Some(victim);
            } else {
                next.to_move = victim;
            }
            next.mill_count[mover.index()] += mills.len() as u32;
        }

        self.refresh_phases(&mut next);

        Transition {
            state: next,
            mills,
            removed,
        }
    }

    fn refresh_phases(&self, state: &mut GameState) {
        for side in [Side::White, Side::Black] {
            state.phase[side.index()] = Phase::for_material(
                state.unplaced(side),
                state.on_board(side),
                self.options.flying,
            );
        }
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    pub fn result(&self, state: &GameState) -> GameResult {
        for side in [state.to_move, state.to_move.opponent()] {
            if state.is_out_of_material(side) {
                return GameResult::win_for(side.opponent());
            }
        }

        if !self.has_any_action(state) {
            return GameResult::win_for(state.to_move.opponent());
        }

        // A pending removal is finished before the ply limit applies
        match self.options.ply_limit {
            Some(limit) if state.ply >= limit && state.pending_removal().is_none() => {
                GameResult::Draw
            }
            _ => GameResult::Ongoing,
        }
    }

    pub fn is_terminal(&self, state: &GameState) -> bool {
        self.result(state).is_over()
    }

    /// Winning side; `None` while ongoing or after a draw
    pub fn winner(&self, state: &GameState) -> Option<Side> {
        self.result(state).winner()
    }

    /// +1 if `side` has won, -1 if it has lost, 0 otherwise
    pub fn utility(&self, state: &GameState, side: Side) -> i32 {
        match self.winner(state) {
            Some(w) if w == side => 1,
            Some(_) => -1,
            None => 0,
        }
    }
}

// ============================================================================
// MILL HELPERS
// ============================================================================

/// Mills through `point` that are fully owned by `side`
pub fn closed_mills_at(state: &GameState, point: Point, side: Side) -> Vec<Mill> {
    point
        .mills()
        .into_iter()
        .filter(|m| m.points().iter().all(|&q| state.piece_at(q) == Some(side)))
        .collect()
}

/// Whether the piece on `point` currently stands in a closed mill
pub fn in_mill(state: &GameState, point: Point) -> bool {
    match state.piece_at(point) {
        Some(owner) => !closed_mills_at(state, point, owner).is_empty(),
        None => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
