//! Play command - human against an AI on the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_rules(), play_game(), report_outcome()
//! - Level 3: prompt_action(), describe_transition()
//! - Level 4: argument types

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use morris_arena::{GameOutcome, GameRunner, DEFAULT_PLY_LIMIT};
use morris_core::{
    Action, AiDriver, GameState, HumanDriver, RuleOptions, Rules, SearchConfig, Side,
    StrategyKind, Transition,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Colour {
    White,
    Black,
}

impl From<Colour> for Side {
    fn from(colour: Colour) -> Self {
        match colour {
            Colour::White => Side::White,
            Colour::Black => Side::Black,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// Colour the human plays
    #[arg(long, value_enum, default_value = "white")]
    pub side: Colour,

    /// AI strategy (random, minimax, alphabeta, alphabeta-cutoff, expectimax)
    #[arg(long, default_value = "alphabeta-cutoff")]
    pub ai: StrategyKind,

    /// Search depth for alphabeta-cutoff
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Heuristics JSON file for alphabeta-cutoff
    #[arg(long, value_name = "FILE")]
    pub heuristics: Option<std::path::PathBuf>,

    /// Declare a draw after this many plies (minimax, alphabeta and expectimax default to 200)
    #[arg(long)]
    pub ply_limit: Option<u32>,

    /// Disable flying with three pieces
    #[arg(long)]
    pub no_flying: bool,

    /// Allow removing pieces that stand in a mill
    #[arg(long)]
    pub no_mill_protection: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the rules and the AI opponent
/// 2. Play the game, prompting the human on stdin
/// 3. Report the outcome
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let rules = build_rules(&args);
    let mut ai = build_ai(&args, seed)?;
    ai.check_rules(rules.options())
        .context("Invalid AI configuration")?;

    tracing::info!(
        "Starting game: human plays {}, AI is {}",
        Side::from(args.side),
        ai.kind()
    );
    println!("Enter actions as d2 (place), a1-a4 (move) or xg7 (remove); 'quit' resigns.\n");

    let outcome = play_game(&rules, &mut ai, args.side.into())?;
    report_outcome(&outcome, args.side.into());

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_rules(args: &PlayArgs) -> Rules {
    let ply_limit = match args.ply_limit {
        None if is_exhaustive(args.ai) => {
            tracing::info!(
                "{} searches to the end of the game; limiting to {} plies",
                args.ai,
                DEFAULT_PLY_LIMIT
            );
            Some(DEFAULT_PLY_LIMIT)
        }
        limit => limit,
    };
    Rules::new(
        RuleOptions::classic()
            .with_flying(!args.no_flying)
            .with_mill_protection(!args.no_mill_protection)
            .with_ply_limit(ply_limit),
    )
}

fn build_ai(args: &PlayArgs, seed: Option<u64>) -> Result<AiDriver> {
    let mut search = SearchConfig::cutoff(args.depth);
    if let Some(path) = &args.heuristics {
        let heuristics = morris_core::Heuristics::load(path)
            .with_context(|| format!("Failed to load heuristics: {}", path.display()))?;
        search = search.with_heuristics(heuristics);
    }
    search.seed = seed;

    AiDriver::new(args.ai, &search).context("Invalid AI configuration")
}

fn play_game(rules: &Rules, ai: &mut AiDriver, human_side: Side) -> Result<GameOutcome> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut human = HumanDriver::new("human", |state: &GameState, legal: &[Action]| {
        prompt_action(&mut input, &mut io::stdout(), state, legal)
    });

    let runner = GameRunner::new(rules);
    let state = rules.initial_state();
    let observe = |side: Side, action: Action, t: &Transition| {
        println!("{}", describe_transition(side, action, t));
    };

    let outcome = match human_side {
        Side::White => runner.play_from(state, &mut human, ai, observe),
        Side::Black => runner.play_from(state, ai, &mut human, observe),
    };
    Ok(outcome?)
}

fn report_outcome(outcome: &GameOutcome, human_side: Side) {
    println!("\n=== Game Over ===");
    match outcome.winner() {
        Some(side) if side == human_side => println!("You win ({})", side),
        Some(side) => println!("{} wins", side),
        None => println!("Draw"),
    }
    if outcome.resigned == Some(human_side) {
        println!("You resigned");
    }
    println!("Plies: {}", outcome.plies);
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Show the board and read actions until a legal one is entered.
/// Returns `None` on "quit", end of input or a failed write.
pub fn prompt_action(
    input: &mut impl BufRead,
    output: &mut impl Write,
    state: &GameState,
    legal: &[Action],
) -> Option<Action> {
    match read_action(input, output, state, legal) {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!("Terminal I/O failed: {}", e);
            None
        }
    }
}

fn read_action(
    input: &mut impl BufRead,
    output: &mut impl Write,
    state: &GameState,
    legal: &[Action],
) -> io::Result<Option<Action>> {
    write!(output, "\n{}", state.render())?;
    writeln!(
        output,
        "{} to move, {} in hand, {} on board",
        state.to_move(),
        state.unplaced(state.to_move()),
        state.on_board(state.to_move())
    )?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let text = line.trim();
        if text.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        if text == "?" {
            let names: Vec<String> = legal.iter().map(|a| a.to_string()).collect();
            writeln!(output, "{}", names.join(" "))?;
            continue;
        }

        match text.parse::<Action>() {
            Ok(action) if legal.contains(&action) => return Ok(Some(action)),
            Ok(action) => {
                writeln!(output, "{} is not legal here ('?' lists legal actions)", action)?;
            }
            Err(e) => writeln!(output, "{}", e)?,
        }
    }
}

/// Strategies that only stop at terminal states
fn is_exhaustive(kind: StrategyKind) -> bool {
    matches!(
        kind,
        StrategyKind::Minimax | StrategyKind::AlphaBeta | StrategyKind::Expectimax
    )
}

/// One-line summary of an applied action
fn describe_transition(side: Side, action: Action, t: &Transition) -> String {
    let mut line = format!("{}: {}", side, action);
    match t.mills.len() {
        0 => {}
        1 => line.push_str(" (mill)"),
        n => line.push_str(&format!(" ({} mills)", n)),
    }
    if let Some(point) = t.removed {
        line.push_str(&format!(", {} removed", point));
    }
    line
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_skips_bad_input() {
        let rules = Rules::classic();
        let state = rules.initial_state();
        let legal = rules.legal_actions(&state);

        let mut input = Cursor::new("zz9\na1-a4\n?\nd2\n");
        let mut output = Vec::new();
        let action = prompt_action(&mut input, &mut output, &state, &legal);
        assert_eq!(action, Some(Action::Place("d2".parse().unwrap())));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("a1-a4 is not legal"));
        assert!(text.contains("a7 d7 g7"));
    }

    #[test]
    fn test_prompt_quit_and_eof() {
        let rules = Rules::classic();
        let state = rules.initial_state();
        let legal = rules.legal_actions(&state);

        let mut quit = Cursor::new("quit\n");
        assert_eq!(prompt_action(&mut quit, &mut Vec::new(), &state, &legal), None);

        let mut eof = Cursor::new("");
        assert_eq!(prompt_action(&mut eof, &mut Vec::new(), &state, &legal), None);
    }

    /// Output sink that rejects every write
    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_prompt_gives_up_on_write_error() {
        let rules = Rules::classic();
        let state = rules.initial_state();
        let legal = rules.legal_actions(&state);

        let mut input = Cursor::new("d2\n");
        assert_eq!(prompt_action(&mut input, &mut ClosedOutput, &state, &legal), None);
    }

    fn play_args(ai: StrategyKind, ply_limit: Option<u32>) -> PlayArgs {
        PlayArgs {
            side: Colour::White,
            ai,
            depth: 2,
            heuristics: None,
            ply_limit,
            no_flying: false,
            no_mill_protection: false,
        }
    }

    #[test]
    fn test_exhaustive_ai_gets_ply_limit() {
        let rules = build_rules(&play_args(StrategyKind::Minimax, None));
        assert_eq!(rules.options().ply_limit, Some(DEFAULT_PLY_LIMIT));

        let rules = build_rules(&play_args(StrategyKind::AlphaBeta, Some(12)));
        assert_eq!(rules.options().ply_limit, Some(12));

        let rules = build_rules(&play_args(StrategyKind::AlphaBetaCutoff, None));
        assert_eq!(rules.options().ply_limit, None);

        let args = play_args(StrategyKind::Expectimax, None);
        let ai = build_ai(&args, None).unwrap();
        assert!(ai.check_rules(build_rules(&args).options()).is_ok());
    }

    #[test]
    fn test_describe_transition() {
        let rules = Rules::classic();
        let state = rules
            .setup(
                Side::White,
                &["a7".parse().unwrap(), "d7".parse().unwrap()],
                &["a1".parse().unwrap()],
                [7, 8],
            )
            .unwrap();
        let place = Action::Place("g7".parse().unwrap());
        let t = rules.apply_with_report(&state, place).unwrap();
        assert_eq!(describe_transition(Side::White, place, &t), "white: g7 (mill)");

        let remove = Action::Remove("a1".parse().unwrap());
        let t = rules.apply_with_report(&t.state, remove).unwrap();
        assert_eq!(describe_transition(Side::White, remove, &t), "white: xa1, a1 removed");
    }
}
