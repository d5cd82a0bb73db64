//! Game-agnostic adversarial search
//!
//! Any two-player game implementing [`Game`] can be searched with:
//! - [`Minimax`]: full tree, no pruning
//! - [`AlphaBeta`]: full tree with alpha/beta bounds
//! - [`AlphaBetaCutoff`]: alpha-beta bounded by depth, scored by an [`Evaluator`]
//! - [`Expectimax`]: full tree with a chance node after every move ([`StochasticGame`])
//! - [`RandomPlayer`]: uniform choice among legal actions
//!
//! Max and min nodes are chosen by whose turn it is, not by ply parity, so games
//! where a side moves twice in a row are searched correctly.

use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// GAME CONTRACT
// ============================================================================

pub trait Game {
    type State: Clone;
    type Action: Copy + PartialEq + Debug;
    type Player: Copy + PartialEq;

    fn to_move(&self, state: &Self::State) -> Self::Player;

    /// Legal actions; empty for terminal states
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor of a legal action. Must not alter `state`.
    fn result(&self, state: &Self::State, action: Self::Action) -> Self::State;

    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Payoff of a state for `player`
    fn utility(&self, state: &Self::State, player: Self::Player) -> f64;
}

/// A game whose moves are followed by a random event
pub trait StochasticGame: Game {
    type Chance;

    /// Possible outcomes after a move has been made
    fn chances(&self, state: &Self::State) -> Vec<Self::Chance>;

    fn outcome(&self, state: &Self::State, chance: &Self::Chance) -> Self::State;

    fn probability(&self, chance: &Self::Chance) -> f64;
}

/// Static scoring of non-terminal positions for depth-limited search
pub trait Evaluator<G: Game> {
    /// Higher is better for `player`. Must agree in sign with `utility` on terminal states.
    fn evaluate(&self, game: &G, state: &G::State, player: G::Player) -> f64;
}

/// Chosen action plus search statistics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision<A> {
    pub action: A,
    /// Backed-up value from the root mover's perspective (0 for random play)
    pub value: f64,
    /// States visited below the root
    pub nodes: u64,
}

/// Common interface of all search strategies
pub trait Strategy<G: Game> {
    fn name(&self) -> &'static str;

    /// `false` when the search only stops at terminal states
    fn is_depth_limited(&self) -> bool {
        true
    }

    /// `None` when the root state offers no action
    fn choose(&mut self, game: &G, state: &G::State) -> Option<Decision<G::Action>>;
}

/// Keep the first action with the highest value (enumeration order breaks ties)
fn pick_best<A: Copy>(
    actions: Vec<A>,
    mut score: impl FnMut(A, f64) -> f64,
) -> Option<(A, f64)> {
    let mut best: Option<(A, f64)> = None;
    for action in actions {
        let bound = best.map_or(f64::NEG_INFINITY, |(_, v)| v);
        let value = score(action, bound);
        if best.is_none() || value > bound {
            best = Some((action, value));
        }
    }
    best
}

fn root_actions<G: Game>(game: &G, state: &G::State) -> Option<Vec<G::Action>> {
    if game.is_terminal(state) {
        return None;
    }
    let actions = game.actions(state);
    (!actions.is_empty()).then_some(actions)
}

// ============================================================================
// MINIMAX
// ============================================================================

/// Exhaustive minimax to terminal states
#[derive(Clone, Copy, Debug, Default)]
pub struct Minimax;

struct MinimaxSearch<'a, G: Game> {
    game: &'a G,
    player: G::Player,
    nodes: u64,
}

impl<G: Game> MinimaxSearch<'_, G> {
    fn value(&mut self, state: &G::State) -> f64 {
        self.nodes += 1;
        let actions = self.game.actions(state);
        if self.game.is_terminal(state) || actions.is_empty() {
            return self.game.utility(state, self.player);
        }

        let maximizing = self.game.to_move(state) == self.player;
        let mut best = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };
        for a in actions {
            let child = self.game.result(state, a);
            let v = self.value(&child);
            best = if maximizing { best.max(v) } else { best.min(v) };
        }
        best
    }
}

impl<G: Game> Strategy<G> for Minimax {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn is_depth_limited(&self) -> bool {
        false
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Option<Decision<G::Action>> {
        let actions = root_actions(game, state)?;
        let mut search = MinimaxSearch {
            game,
            player: game.to_move(state),
            nodes: 0,
        };
        let (action, value) =
            pick_best(actions, |a, _| search.value(&game.result(state, a)))?;
        Some(Decision {
            action,
            value,
            nodes: search.nodes,
        })
    }
}

// ============================================================================
// ALPHA-BETA (with optional depth cutoff)
// ============================================================================

/// Exhaustive alpha-beta; picks the same action as [`Minimax`]
#[derive(Clone, Copy, Debug, Default)]
pub struct AlphaBeta;

/// Alpha-beta stopping at `depth` plies below the root, where `evaluator` scores the frontier.
/// With `depth = None` it searches to terminal states.
#[derive(Clone, Debug)]
pub struct AlphaBetaCutoff<E> {
    pub depth: Option<u32>,
    pub evaluator: E,
}

impl<E> AlphaBetaCutoff<E> {
    pub fn new(depth: Option<u32>, evaluator: E) -> Self {
        Self { depth, evaluator }
    }
}

/// Leaf scoring of an alpha-beta walk
enum Leaf<'e, E> {
    Utility,
    Cutoff { depth: Option<u32>, evaluator: &'e E },
}

struct AlphaBetaSearch<'a, G: Game, E> {
    game: &'a G,
    player: G::Player,
    leaf: Leaf<'a, E>,
    nodes: u64,
}

impl<G: Game, E: Evaluator<G>> AlphaBetaSearch<'_, G, E> {
    fn leaf_value(&self, state: &G::State, depth: u32) -> Option<f64> {
        match &self.leaf {
            Leaf::Utility => self
                .game
                .is_terminal(state)
                .then(|| self.game.utility(state, self.player)),
            Leaf::Cutoff { depth: limit, evaluator } => {
                let cut = limit.is_some_and(|d| depth > d) || self.game.is_terminal(state);
                cut.then(|| evaluator.evaluate(self.game, state, self.player))
            }
        }
    }

    fn value(&mut self, state: &G::State, mut alpha: f64, mut beta: f64, depth: u32) -> f64 {
        self.nodes += 1;
        if let Some(v) = self.leaf_value(state, depth) {
            return v;
        }
        let actions = self.game.actions(state);
        if actions.is_empty() {
            return self.game.utility(state, self.player);
        }

        if self.game.to_move(state) == self.player {
            let mut v = f64::NEG_INFINITY;
            for a in actions {
                let child = self.game.result(state, a);
                v = v.max(self.value(&child, alpha, beta, depth + 1));
                if v >= beta {
                    return v;
                }
                alpha = alpha.max(v);
            }
            v
        } else {
            let mut v = f64::INFINITY;
            for a in actions {
                let child = self.game.result(state, a);
                v = v.min(self.value(&child, alpha, beta, depth + 1));
                if v <= alpha {
                    return v;
                }
                beta = beta.min(v);
            }
            v
        }
    }

    /// Root is a max node; children start at depth 1
    fn decide(&mut self, state: &G::State) -> Option<Decision<G::Action>> {
        let actions = root_actions(self.game, state)?;
        let game = self.game;
        let (action, value) = pick_best(actions, |a, best| {
            self.value(&game.result(state, a), best, f64::INFINITY, 1)
        })?;
        Some(Decision {
            action,
            value,
            nodes: self.nodes,
        })
    }
}

/// Placeholder evaluator type for the exhaustive variant; never called
struct NoEval;

impl<G: Game> Evaluator<G> for NoEval {
    fn evaluate(&self, game: &G, state: &G::State, player: G::Player) -> f64 {
        game.utility(state, player)
    }
}

impl<G: Game> Strategy<G> for AlphaBeta {
    fn name(&self) -> &'static str {
        "alphabeta"
    }

    fn is_depth_limited(&self) -> bool {
        false
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Option<Decision<G::Action>> {
        AlphaBetaSearch::<G, NoEval> {
            game,
            player: game.to_move(state),
            leaf: Leaf::Utility,
            nodes: 0,
        }
        .decide(state)
    }
}

impl<G: Game, E: Evaluator<G>> Strategy<G> for AlphaBetaCutoff<E> {
    fn name(&self) -> &'static str {
        "alphabeta-cutoff"
    }

    fn is_depth_limited(&self) -> bool {
        self.depth.is_some()
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Option<Decision<G::Action>> {
        AlphaBetaSearch {
            game,
            player: game.to_move(state),
            leaf: Leaf::Cutoff {
                depth: self.depth,
                evaluator: &self.evaluator,
            },
            nodes: 0,
        }
        .decide(state)
    }
}

// ============================================================================
// EXPECTIMAX
// ============================================================================

/// Max/min search with a probability-weighted chance node after each move
#[derive(Clone, Copy, Debug, Default)]
pub struct Expectimax;

struct ExpectimaxSearch<'a, G: StochasticGame> {
    game: &'a G,
    player: G::Player,
    nodes: u64,
}

impl<G: StochasticGame> ExpectimaxSearch<'_, G> {
    /// Expected value of making `action` in `state`
    fn chance_value(&mut self, state: &G::State, action: G::Action) -> f64 {
        let after = self.game.result(state, action);
        let chances = self.game.chances(&after);
        if chances.is_empty() {
            return self.value(&after);
        }

        let mut expected = 0.0;
        for chance in &chances {
            let outcome = self.game.outcome(&after, chance);
            expected += self.game.probability(chance) * self.value(&outcome);
        }
        expected
    }

    fn value(&mut self, state: &G::State) -> f64 {
        self.nodes += 1;
        let actions = self.game.actions(state);
        if self.game.is_terminal(state) || actions.is_empty() {
            return self.game.utility(state, self.player);
        }

        let maximizing = self.game.to_move(state) == self.player;
        let mut best = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };
        for a in actions {
            let v = self.chance_value(state, a);
            best = if maximizing { best.max(v) } else { best.min(v) };
        }
        best
    }
}

impl<G: StochasticGame> Strategy<G> for Expectimax {
    fn name(&self) -> &'static str {
        "expectimax"
    }

    fn is_depth_limited(&self) -> bool {
        false
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Option<Decision<G::Action>> {
        let actions = root_actions(game, state)?;
        let mut search = ExpectimaxSearch {
            game,
            player: game.to_move(state),
            nodes: 0,
        };
        let (action, value) = pick_best(actions, |a, _| search.chance_value(state, a))?;
        Some(Decision {
            action,
            value,
            nodes: search.nodes,
        })
    }
}

// ============================================================================
// RANDOM
// ============================================================================

/// Uniform random choice among legal actions. Weak by construction.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<G: Game> Strategy<G> for RandomPlayer {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Option<Decision<G::Action>> {
        let actions = root_actions(game, state)?;
        let action = *actions.choose(&mut self.rng)?;
        Some(Decision {
            action,
            value: 0.0,
            nodes: 0,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Take 1 or 2 from a pile; whoever takes the last stone wins
    struct Nim;

    impl Game for Nim {
        type State = (u8, u8); // (stones, player to move)
        type Action = u8;
        type Player = u8;

        fn to_move(&self, state: &(u8, u8)) -> u8 {
            state.1
        }

        fn actions(&self, state: &(u8, u8)) -> Vec<u8> {
            (1..=2).filter(|&n| n <= state.0).collect()
        }

        fn result(&self, state: &(u8, u8), take: u8) -> (u8, u8) {
            (state.0 - take, 1 - state.1)
        }

        fn is_terminal(&self, state: &(u8, u8)) -> bool {
            state.0 == 0
        }

        fn utility(&self, state: &(u8, u8), player: u8) -> f64 {
            // The player to move at zero stones did not take the last one
            if state.1 == player {
                -1.0
            } else {
                1.0
            }
        }
    }

    #[test]
    fn test_minimax_finds_winning_take() {
        // From 4 stones take 1, leaving a multiple of three
        let d = Minimax.choose(&Nim, &(4, 0)).unwrap();
        assert_eq!(d.action, 1);
        assert_eq!(d.value, 1.0);

        let d = Minimax.choose(&Nim, &(5, 0)).unwrap();
        assert_eq!(d.action, 2);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        for stones in 1..12 {
            let m = Minimax.choose(&Nim, &(stones, 0)).unwrap();
            let ab = AlphaBeta.choose(&Nim, &(stones, 0)).unwrap();
            assert_eq!(m.action, ab.action, "stones={}", stones);
            assert_eq!(m.value, ab.value);
            assert!(ab.nodes <= m.nodes);
        }
    }

    #[test]
    fn test_terminal_root_has_no_decision() {
        assert!(Minimax.choose(&Nim, &(0, 0)).is_none());
        assert!(AlphaBeta.choose(&Nim, &(0, 1)).is_none());
        assert!(RandomPlayer::new(1).choose(&Nim, &(0, 0)).is_none());
    }

    #[test]
    fn test_random_player_is_seeded() {
        let a: Vec<u8> = (0..10)
            .map(|_| RandomPlayer::new(9).choose(&Nim, &(7, 0)).unwrap().action)
            .collect();
        assert!(a.iter().all(|&x| x == a[0]));
    }
}
