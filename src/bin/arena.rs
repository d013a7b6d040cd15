//! Arena CLI: run bot-vs-bot experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 1000 --p1 hard --p2 easy
//!   cargo run --release --bin arena -- --games 200 --p1 minimax --p2 heuristic --p1-tie-break first_in_order

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tictactoe_engine::engine::arena::{run_arena, ArenaPlayer};
use tictactoe_engine::engine::bot_strategy::{build_strategy, StrategyKind};
use tictactoe_engine::engine::config::{load_config, load_default_config, EngineConfig};
use tictactoe_engine::engine::minimax::{MinimaxParams, TieBreak};

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for tic-tac-toe")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Base random seed; game i uses seed + i
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Alternate who moves first between games
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    alternate_seats: bool,

    /// Path to tictactoe.toml, for difficulty tiers and minimax settings
    #[arg(long, env = "TICTACTOE_CONFIG")]
    config: Option<PathBuf>,

    /// P1 strategy or difficulty tier
    #[arg(long, default_value = "minimax")]
    p1: String,

    /// P1 display name (defaults to the strategy name)
    #[arg(long)]
    p1_name: Option<String>,

    /// P1 minimax tie-break: "shuffle" or "first_in_order"
    #[arg(long)]
    p1_tie_break: Option<String>,

    /// P2 strategy or difficulty tier
    #[arg(long, default_value = "random")]
    p2: String,

    /// P2 display name (defaults to the strategy name)
    #[arg(long)]
    p2_name: Option<String>,

    /// P2 minimax tie-break
    #[arg(long)]
    p2_tie_break: Option<String>,
}

fn parse_tie_break(raw: &str) -> Result<TieBreak, String> {
    match raw {
        "shuffle" => Ok(TieBreak::Shuffle),
        "first_in_order" | "first" => Ok(TieBreak::FirstInOrder),
        other => Err(format!("unknown tie-break '{}', expected shuffle or first_in_order", other)),
    }
}

fn build_player(
    config: &EngineConfig,
    strategy: &str,
    name: Option<&str>,
    tie_break: Option<&str>,
) -> Result<(ArenaPlayer, StrategyKind, MinimaxParams), String> {
    let kind = config.resolve_strategy(strategy).map_err(|e| e.to_string())?;
    let mut params = config.minimax.clone();
    if let Some(tb) = tie_break {
        params.tie_break = parse_tie_break(tb)?;
    }
    let name = name.unwrap_or(kind.as_str()).to_string();
    Ok((ArenaPlayer::new(name, build_strategy(kind, &params)), kind, params))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path).map_err(|e| format!("Error loading config: {}", e))?,
        None => load_default_config(),
    };

    let (mut p1, p1_kind, p1_params) =
        build_player(&config, &cli.p1, cli.p1_name.as_deref(), cli.p1_tie_break.as_deref())?;
    let (mut p2, p2_kind, p2_params) =
        build_player(&config, &cli.p2, cli.p2_name.as_deref(), cli.p2_tie_break.as_deref())?;
    // Results are keyed by name, so mirror matches need distinct names.
    if p1.name == p2.name {
        p1.name.push_str("_1");
        p2.name.push_str("_2");
    }

    eprintln!("Arena: {} games, seed={}, alternate_seats={}", cli.games, cli.seed, cli.alternate_seats);
    eprintln!("  {}: strategy={}, tie_break={:?}", p1.name, p1_kind, p1_params.tie_break);
    eprintln!("  {}: strategy={}, tie_break={:?}", p2.name, p2_kind, p2_params.tie_break);
    eprintln!();

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        if done % 50 == 0 || done == total {
            eprint!("\r  [{}/{}] games completed", done, total);
        }
    };

    let players = [p1, p2];
    let result = run_arena(&players, cli.games, cli.seed, cli.alternate_seats, Some(&progress_cb));

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
    Ok(())
}
