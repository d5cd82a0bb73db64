//! Game state, actions and phases

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::Point;
use crate::error::MorrisError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Tokens each side starts with in hand
pub const PIECES_PER_SIDE: u8 = 9;

/// Below this many pieces (after placement) a side has lost
pub const MIN_PIECES: usize = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player colour. White moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Board symbol used by the text renderer
    pub fn symbol(self) -> char {
        match self {
            Side::White => 'W',
            Side::Black => 'B',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// Which kind of move a side makes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Tokens still in hand
    Placement,
    /// Slide to an adjacent empty point
    Movement,
    /// Down to three pieces: jump to any empty point
    Flying,
}

impl Phase {
    /// Phase implied by a side's material
    pub fn for_material(unplaced: u8, on_board: usize, flying: bool) -> Self {
        if unplaced > 0 {
            Phase::Placement
        } else if flying && on_board == MIN_PIECES {
            Phase::Flying
        } else {
            Phase::Movement
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    /// Ply limit reached with no winner
    Draw,
}

impl GameResult {
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::White => GameResult::WhiteWins,
            Side::Black => GameResult::BlackWins,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::WhiteWins => Some(Side::White),
            GameResult::BlackWins => Some(Side::Black),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }

    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }
}

/// A single action. Exactly one shape is legal in any phase / pending-removal combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Put a token from hand on an empty point
    Place(Point),
    /// Slide (or fly) an own piece
    Move { from: Point, to: Point },
    /// Take an opponent piece after closing a mill
    Remove(Point),
}

impl Action {
    /// Point that ends up occupied, if any
    pub fn destination(self) -> Option<Point> {
        match self {
            Action::Place(p) => Some(p),
            Action::Move { to, .. } => Some(to),
            Action::Remove(_) => None,
        }
    }
}

/// Notation: `d2` places, `a1-a4` moves, `xg7` removes
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(p) => write!(f, "{}", p),
            Action::Move { from, to } => write!(f, "{}-{}", from, to),
            Action::Remove(p) => write!(f, "x{}", p),
        }
    }
}

impl FromStr for Action {
    type Err = MorrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(target) = s.strip_prefix(['x', 'X']) {
            return Ok(Action::Remove(target.parse()?));
        }
        match s.split_once('-') {
            Some((from, to)) => Ok(Action::Move {
                from: from.parse()?,
                to: to.parse()?,
            }),
            None => Ok(Action::Place(s.parse()?)),
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable snapshot of a game. Successors are produced by [`crate::Rules::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Occupied points only (sparse)
    pub(crate) board: FxHashMap<Point, Side>,

    pub(crate) to_move: Side,

    /// Tokens still in hand, indexed by side
    pub(crate) unplaced: [u8; 2],

    pub(crate) phase: [Phase; 2],

    /// Side whose piece must be removed next
    pub(crate) pending_removal: Option<Side>,

    /// Mills closed so far, indexed by side
    pub(crate) mill_count: [u32; 2],

    /// Actions applied since the initial state
    pub(crate) ply: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, nine tokens in each hand, white to move
    pub fn new() -> Self {
        Self {
            board: FxHashMap::default(),
            to_move: Side::White,
            unplaced: [PIECES_PER_SIDE; 2],
            phase: [Phase::Placement; 2],
            pending_removal: None,
            mill_count: [0; 2],
            ply: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn piece_at(&self, point: Point) -> Option<Side> {
        self.board.get(&point).copied()
    }

    pub fn is_empty(&self, point: Point) -> bool {
        !self.board.contains_key(&point)
    }

    /// Points occupied by `side`, in point order
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Point> + '_ {
        Point::all().filter(move |p| self.piece_at(*p) == Some(side))
    }

    /// Empty points in point order
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        Point::all().filter(move |p| self.is_empty(*p))
    }

    pub fn on_board(&self, side: Side) -> usize {
        self.board.values().filter(|&&s| s == side).count()
    }

    pub fn occupied(&self) -> usize {
        self.board.len()
    }

    pub fn unplaced(&self, side: Side) -> u8 {
        self.unplaced[side.index()]
    }

    /// Pieces of `side` taken off the board so far
    pub fn removed(&self, side: Side) -> usize {
        PIECES_PER_SIDE as usize - self.unplaced(side) as usize - self.on_board(side)
    }

    pub fn phase(&self, side: Side) -> Phase {
        self.phase[side.index()]
    }

    pub fn pending_removal(&self) -> Option<Side> {
        self.pending_removal
    }

    pub fn mill_count(&self, side: Side) -> u32 {
        self.mill_count[side.index()]
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// Placement finished and fewer than three pieces left
    pub fn is_out_of_material(&self, side: Side) -> bool {
        self.unplaced(side) == 0 && self.on_board(side) < MIN_PIECES
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Plain-text board diagram
    pub fn render(&self) -> String {
        const TEMPLATE: [&str; 14] = [
            "7 *-----*-----*",
            "  |     |     |",
            "6 | *---*---* |",
            "  | |   |   | |",
            "5 | | *-*-* | |",
            "  | | |   | | |",
            "4 *-*-*   *-*-*",
            "  | | |   | | |",
            "3 | | *-*-* | |",
            "  | |   |   | |",
            "2 | *---*---* |",
            "  |     |     |",
            "1 *-----*-----*",
            "  a b c d e f g",
        ];

        // Template markers appear in point order
        let mut points = Point::all();
        let mut out = String::new();
        for line in TEMPLATE {
            for c in line.chars() {
                if c == '*' {
                    let symbol = points
                        .next()
                        .and_then(|p| self.piece_at(p))
                        .map_or('.', Side::symbol);
                    out.push(symbol);
                } else {
                    out.push(c);
                }
            }
            out.push('\n');
        }
        out
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Point {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.to_move(), Side::White);
        assert_eq!(state.unplaced(Side::White), 9);
        assert_eq!(state.unplaced(Side::Black), 9);
        assert_eq!(state.phase(Side::White), Phase::Placement);
        assert_eq!(state.pending_removal(), None);
        assert_eq!(state.occupied(), 0);
        assert_eq!(state.empty_points().count(), 24);
    }

    #[test]
    fn test_phase_for_material() {
        assert_eq!(Phase::for_material(1, 8, true), Phase::Placement);
        assert_eq!(Phase::for_material(0, 4, true), Phase::Movement);
        assert_eq!(Phase::for_material(0, 3, true), Phase::Flying);
        assert_eq!(Phase::for_material(0, 3, false), Phase::Movement);
    }

    #[test]
    fn test_action_notation() {
        assert_eq!("d2".parse::<Action>().unwrap(), Action::Place(p("d2")));
        assert_eq!(
            "a1-a4".parse::<Action>().unwrap(),
            Action::Move { from: p("a1"), to: p("a4") }
        );
        assert_eq!("xg7".parse::<Action>().unwrap(), Action::Remove(p("g7")));
        assert_eq!(Action::Move { from: p("b6"), to: p("d6") }.to_string(), "b6-d6");
        assert!("a1-".parse::<Action>().is_err());
        assert!("x".parse::<Action>().is_err());
        assert!("move d2".parse::<Action>().is_err());
    }

    #[test]
    fn test_result_winner() {
        assert_eq!(GameResult::win_for(Side::Black).winner(), Some(Side::Black));
        assert_eq!(GameResult::Draw.winner(), None);
        assert!(GameResult::Draw.is_over());
        assert!(!GameResult::Ongoing.is_over());
    }

    #[test]
    fn test_render_marks_pieces() {
        let mut state = GameState::new();
        state.board.insert(p("a7"), Side::White);
        state.board.insert(p("g1"), Side::Black);
        let text = state.render();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("7 W"));
        assert!(lines[12].ends_with('B'));
        assert_eq!(text.matches('.').count(), 22);
    }
}
