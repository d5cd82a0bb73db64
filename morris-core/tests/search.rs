//! Search strategies on small hand-built games

use morris_core::search::{AlphaBeta, AlphaBetaCutoff, Expectimax, Minimax, RandomPlayer};
use morris_core::{
    choose_action, Action, Evaluator, Game, Heuristics, MorrisError, Point, RuleOptions, Rules,
    SearchConfig, Side, StochasticGame, Strategy, StrategyKind, WIN_VALUE,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// Explicit game tree. Utilities and heuristics are from player 0's point of view.
struct Tree {
    nodes: Vec<Node>,
}

struct Node {
    player: u8,
    children: Vec<usize>,
    utility: f64,
    heuristic: f64,
}

impl Tree {
    fn inner(player: u8, children: &[usize], heuristic: f64) -> Node {
        Node {
            player,
            children: children.to_vec(),
            utility: 0.0,
            heuristic,
        }
    }

    fn leaf(utility: f64) -> Node {
        Node {
            player: 0,
            children: Vec::new(),
            utility,
            heuristic: utility,
        }
    }

    /// Max root over three min nodes with leaves 3,12,8 / 2,4,6 / 14,5,2
    fn textbook() -> Self {
        let mut nodes = vec![
            Tree::inner(0, &[1, 2, 3], 0.0),
            Tree::inner(1, &[4, 5, 6], 0.0),
            Tree::inner(1, &[7, 8, 9], 0.0),
            Tree::inner(1, &[10, 11, 12], 0.0),
        ];
        for u in [3.0, 12.0, 8.0, 2.0, 4.0, 6.0, 14.0, 5.0, 2.0] {
            nodes.push(Tree::leaf(u));
        }
        Tree { nodes }
    }

    /// Left line looks good two plies down but loses; right line looks bad but wins
    fn trap() -> Self {
        Tree {
            nodes: vec![
                Tree::inner(0, &[1, 2], 0.0),
                Tree::inner(1, &[3], 0.0),
                Tree::inner(1, &[4], 0.0),
                Tree::inner(0, &[5], 5.0),
                Tree::inner(0, &[6], -5.0),
                Tree::leaf(-1.0),
                Tree::leaf(1.0),
            ],
        }
    }
}

impl Game for Tree {
    type State = usize;
    type Action = usize;
    type Player = u8;

    fn to_move(&self, state: &usize) -> u8 {
        self.nodes[*state].player
    }

    fn actions(&self, state: &usize) -> Vec<usize> {
        self.nodes[*state].children.clone()
    }

    fn result(&self, _state: &usize, action: usize) -> usize {
        action
    }

    fn is_terminal(&self, state: &usize) -> bool {
        self.nodes[*state].children.is_empty()
    }

    fn utility(&self, state: &usize, player: u8) -> f64 {
        let u = self.nodes[*state].utility;
        if player == 0 {
            u
        } else {
            -u
        }
    }
}

struct TreeHeuristic;

impl Evaluator<Tree> for TreeHeuristic {
    fn evaluate(&self, game: &Tree, state: &usize, player: u8) -> f64 {
        let h = game.nodes[*state].heuristic;
        if player == 0 {
            h
        } else {
            -h
        }
    }
}

/// Take a sure payoff or flip a biased coin for +1 / -1
struct Coin {
    p_heads: f64,
    sure: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Start,
    Sure,
    Flip,
    Heads,
    Tails,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Bet {
    Sure,
    Gamble,
}

impl Game for Coin {
    type State = Stage;
    type Action = Bet;
    type Player = u8;

    fn to_move(&self, _state: &Stage) -> u8 {
        0
    }

    fn actions(&self, state: &Stage) -> Vec<Bet> {
        match state {
            Stage::Start => vec![Bet::Sure, Bet::Gamble],
            _ => Vec::new(),
        }
    }

    fn result(&self, _state: &Stage, action: Bet) -> Stage {
        match action {
            Bet::Sure => Stage::Sure,
            Bet::Gamble => Stage::Flip,
        }
    }

    fn is_terminal(&self, state: &Stage) -> bool {
        !matches!(state, Stage::Start | Stage::Flip)
    }

    fn utility(&self, state: &Stage, _player: u8) -> f64 {
        match state {
            Stage::Sure => self.sure,
            Stage::Heads => 1.0,
            Stage::Tails => -1.0,
            Stage::Start | Stage::Flip => 0.0,
        }
    }
}

impl StochasticGame for Coin {
    type Chance = bool;

    fn chances(&self, state: &Stage) -> Vec<bool> {
        match state {
            Stage::Flip => vec![true, false],
            _ => Vec::new(),
        }
    }

    fn outcome(&self, _state: &Stage, heads: &bool) -> Stage {
        if *heads {
            Stage::Heads
        } else {
            Stage::Tails
        }
    }

    fn probability(&self, heads: &bool) -> f64 {
        if *heads {
            self.p_heads
        } else {
            1.0 - self.p_heads
        }
    }
}

fn pts(names: &[&str]) -> Vec<Point> {
    names.iter().map(|n| n.parse().unwrap()).collect()
}

// ============================================================================
// TREE GAMES
// ============================================================================

#[test]
fn test_textbook_tree() {
    let game = Tree::textbook();

    let m = Minimax.choose(&game, &0).unwrap();
    assert_eq!(m.action, 1);
    assert_eq!(m.value, 3.0);

    let ab = AlphaBeta.choose(&game, &0).unwrap();
    assert_eq!(ab.action, m.action);
    assert_eq!(ab.value, m.value);
    assert!(ab.nodes < m.nodes, "{} vs {}", ab.nodes, m.nodes);
}

#[test]
fn test_cutoff_depth_bounds_recursion() {
    let game = Tree::trap();

    let shallow = AlphaBetaCutoff::new(Some(1), TreeHeuristic).choose(&game, &0).unwrap();
    assert_eq!(shallow.action, 1);
    assert_eq!(shallow.value, 5.0);

    let deep = AlphaBetaCutoff::new(None, TreeHeuristic).choose(&game, &0).unwrap();
    assert_eq!(deep.action, 2);
    assert_eq!(deep.value, 1.0);
    assert_eq!(deep.action, AlphaBeta.choose(&game, &0).unwrap().action);

    assert!(shallow.nodes < deep.nodes);
}

#[test]
fn test_ties_keep_first_action() {
    let game = Tree {
        nodes: vec![Tree::inner(0, &[1, 2, 3], 0.0), Tree::leaf(0.0), Tree::leaf(1.0), Tree::leaf(1.0)],
    };
    assert_eq!(Minimax.choose(&game, &0).unwrap().action, 2);
    assert_eq!(AlphaBeta.choose(&game, &0).unwrap().action, 2);
    assert_eq!(
        AlphaBetaCutoff::new(Some(3), TreeHeuristic).choose(&game, &0).unwrap().action,
        2
    );
}

#[test]
fn test_empty_root_has_no_decision() {
    let game = Tree {
        nodes: vec![Tree::leaf(1.0)],
    };
    assert!(Minimax.choose(&game, &0).is_none());
    assert!(AlphaBeta.choose(&game, &0).is_none());
    assert!(AlphaBetaCutoff::new(Some(2), TreeHeuristic).choose(&game, &0).is_none());
    assert!(RandomPlayer::new(5).choose(&game, &0).is_none());
}

#[test]
fn test_expectimax_weighs_outcomes() {
    let fair = Coin { p_heads: 0.5, sure: 0.4 };
    let d = Expectimax.choose(&fair, &Stage::Start).unwrap();
    assert_eq!(d.action, Bet::Sure);
    assert!((d.value - 0.4).abs() < 1e-9);

    let loaded = Coin { p_heads: 0.8, sure: 0.4 };
    let d = Expectimax.choose(&loaded, &Stage::Start).unwrap();
    assert_eq!(d.action, Bet::Gamble);
    assert!((d.value - 0.6).abs() < 1e-9);
}

// ============================================================================
// MILL GAME
// ============================================================================

#[test]
fn test_mill_game_strategies_agree() {
    let rules = Rules::new(RuleOptions::classic().with_ply_limit(Some(2)));
    let state = rules
        .setup(Side::White, &pts(&["a7", "b4", "a1"]), &pts(&["d5", "e4", "d2"]), [0, 0])
        .unwrap();

    let ab = AlphaBeta.choose(&rules, &state).unwrap();
    let unbounded = choose_action(
        &rules,
        StrategyKind::AlphaBetaCutoff,
        &state,
        &SearchConfig { depth: None, ..SearchConfig::cutoff(1) },
    )
    .unwrap();
    assert_eq!(unbounded, ab.action);
    assert_eq!(ab.action.to_string(), "b4-a4");

    // Two plies later the game is won
    let state = rules.apply(&state, ab.action).unwrap();
    assert_eq!(state.to_move(), Side::White);
    let removal = choose_action(&rules, StrategyKind::Minimax, &state, &SearchConfig::default()).unwrap();
    let state = rules.apply(&state, removal).unwrap();
    assert_eq!(rules.winner(&state), Some(Side::White));

    for kind in StrategyKind::ALL {
        assert_eq!(
            choose_action(&rules, kind, &state, &SearchConfig::cutoff(2)),
            Err(MorrisError::NoMoveAvailable)
        );
    }
}

#[test]
fn test_cutoff_depth_hides_mill_two_plies_away() {
    // c4-b4 then b4-a4 closes the a-file; black cannot reach a4 in between
    let rules = Rules::new(RuleOptions::classic().with_flying(false).with_ply_limit(Some(4)));
    let state = rules
        .setup(Side::White, &pts(&["a7", "a1", "c4"]), &pts(&["f6", "e3", "g1"]), [0, 0])
        .unwrap();
    let winning = Action::Move { from: pts(&["c4"])[0], to: pts(&["b4"])[0] };

    let shallow = AlphaBetaCutoff::new(Some(1), Heuristics::default())
        .choose(&rules, &state)
        .unwrap();
    let deep = AlphaBetaCutoff::new(None, Heuristics::default())
        .choose(&rules, &state)
        .unwrap();

    assert!(shallow.value < WIN_VALUE, "{:?}", shallow);
    assert_eq!(deep.value, WIN_VALUE);
    assert_eq!(deep.action, winning);

    let exact = AlphaBeta.choose(&rules, &state).unwrap();
    assert_eq!(exact.action, winning);
    assert_eq!(exact.value, 1.0);
}

#[test]
fn test_random_player_on_mill_game() {
    let rules = Rules::classic();
    let mut state = rules.initial_state();
    let mut player = RandomPlayer::new(11);
    for _ in 0..30 {
        if rules.is_terminal(&state) {
            break;
        }
        let d = player.choose(&rules, &state).unwrap();
        assert!(rules.is_legal(&state, d.action));
        state = rules.apply(&state, d.action).unwrap();
    }
    assert!(state.ply() > 0);
}
