//! Position evaluation for depth-limited search

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Mill, Point};
use crate::game::{GameResult, GameState, Phase, Side};
use crate::rules::Rules;
use crate::search::Evaluator;

/// Score of a won position. Non-terminal scores stay strictly inside this bound.
pub const WIN_VALUE: f64 = 1000.0;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Per piece on the board or in hand
    pub material: f64,
    /// Per legal move
    pub mobility: f64,
    /// Per two-in-a-row whose third point can be filled next turn
    pub open_mills: f64,
    /// Per closed mill on the board
    pub closed_mills: f64,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            material: 10.0,
            mobility: 0.5,
            open_mills: 3.0,
            closed_mills: 2.0,
        }
    }
}

impl Heuristics {
    /// Load weights from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let heuristics = serde_json::from_str(&content)?;
        Ok(heuristics)
    }

    /// Save weights to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Evaluate `state` from `side`'s perspective
pub fn evaluate(rules: &Rules, state: &GameState, side: Side, heuristics: &Heuristics) -> f64 {
    match rules.result(state) {
        GameResult::Ongoing => {}
        GameResult::Draw => return 0.0,
        result => {
            return if result.winner() == Some(side) {
                WIN_VALUE
            } else {
                -WIN_VALUE
            };
        }
    }

    let opponent = side.opponent();

    let material = |s: Side| (state.on_board(s) + state.unplaced(s) as usize) as f64;
    let mut score = heuristics.material * (material(side) - material(opponent));

    if heuristics.mobility != 0.0 {
        let mine = rules.mobility(state, side) as f64;
        let theirs = rules.mobility(state, opponent) as f64;
        score += heuristics.mobility * (mine - theirs);
    }

    score += heuristics.open_mills
        * (open_mills(state, side) as f64 - open_mills(state, opponent) as f64);
    score += heuristics.closed_mills
        * (closed_mills(state, side) as f64 - closed_mills(state, opponent) as f64);

    score.clamp(-WIN_VALUE + 1.0, WIN_VALUE - 1.0)
}

/// Two own pieces on a line with the third point empty and fillable by `side`
pub fn open_mills(state: &GameState, side: Side) -> usize {
    Mill::all()
        .filter(|m| {
            let points = m.points();
            let own = points.iter().filter(|&&p| state.piece_at(p) == Some(side)).count();
            let gap = points.iter().copied().find(|&p| state.is_empty(p));
            match gap {
                Some(gap) if own == 2 => can_reach(state, side, *m, gap),
                _ => false,
            }
        })
        .count()
}

fn can_reach(state: &GameState, side: Side, mill: Mill, gap: Point) -> bool {
    match state.phase(side) {
        Phase::Placement | Phase::Flying => true,
        Phase::Movement => gap
            .neighbors()
            .any(|n| state.piece_at(n) == Some(side) && !mill.contains(n)),
    }
}

/// Mills fully owned by `side`
pub fn closed_mills(state: &GameState, side: Side) -> usize {
    Mill::all()
        .filter(|m| m.points().iter().all(|&p| state.piece_at(p) == Some(side)))
        .count()
}

impl Evaluator<Rules> for Heuristics {
    fn evaluate(&self, game: &Rules, state: &GameState, player: Side) -> f64 {
        evaluate(game, state, player, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(names: &[&str]) -> Vec<Point> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn test_evaluate_symmetric() {
        let rules = Rules::classic();
        let state = rules.initial_state();
        let h = Heuristics::default();
        assert_eq!(evaluate(&rules, &state, Side::White, &h), 0.0);
        assert_eq!(evaluate(&rules, &state, Side::Black, &h), 0.0);
    }

    #[test]
    fn test_material_advantage() {
        let rules = Rules::classic();
        let h = Heuristics::default();
        let even = rules
            .setup(Side::White, &pts(&["a7", "g1"]), &pts(&["a1", "g7"]), [7, 7])
            .unwrap();
        let ahead = rules
            .setup(Side::White, &pts(&["a7", "g1"]), &pts(&["a1"]), [7, 7])
            .unwrap();
        let e = evaluate(&rules, &even, Side::White, &h);
        let a = evaluate(&rules, &ahead, Side::White, &h);
        assert!(a > e, "{} should beat {}", a, e);
        assert!(evaluate(&rules, &ahead, Side::Black, &h) < 0.0);
    }

    #[test]
    fn test_open_mill_counts() {
        let rules = Rules::classic();
        let state = rules
            .setup(Side::Black, &pts(&["a7", "d7"]), &pts(&["a1"]), [7, 8])
            .unwrap();
        assert_eq!(open_mills(&state, Side::White), 1);
        assert_eq!(open_mills(&state, Side::Black), 0);
        assert!(evaluate(&rules, &state, Side::White, &Heuristics::default()) > 0.0);
    }

    #[test]
    fn test_open_mill_needs_reachable_gap_when_sliding() {
        let rules = Rules::classic();
        // a7-d7 open at g7; nothing of white next to g7
        let blocked = rules
            .setup(
                Side::White,
                &pts(&["a7", "d7", "c3", "e3"]),
                &pts(&["a1", "d1", "g1", "b2"]),
                [0, 0],
            )
            .unwrap();
        assert_eq!(open_mills(&blocked, Side::White), 0);

        let reachable = rules
            .setup(
                Side::White,
                &pts(&["a7", "d7", "g4", "e3"]),
                &pts(&["a1", "d1", "b2", "c3"]),
                [0, 0],
            )
            .unwrap();
        assert_eq!(open_mills(&reachable, Side::White), 1);
    }

    #[test]
    fn test_terminal_matches_utility() {
        let rules = Rules::classic();
        let h = Heuristics::default();
        // Black is blocked in the corners
        let state = rules
            .setup(
                Side::Black,
                &pts(&["d7", "a4", "g4", "d1"]),
                &pts(&["a7", "g7", "a1", "g1"]),
                [0, 0],
            )
            .unwrap();
        assert_eq!(evaluate(&rules, &state, Side::White, &h), WIN_VALUE);
        assert_eq!(evaluate(&rules, &state, Side::Black, &h), -WIN_VALUE);
    }

    #[test]
    fn test_default_heuristics() {
        let h = Heuristics::default();
        assert!(h.material > h.mobility);
        assert!(h.open_mills > 0.0);
    }
}
