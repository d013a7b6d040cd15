use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use tictactoe_engine::console::{self, Command, Response, HELP};
use tictactoe_engine::engine::config::{load_config, load_default_config, EngineConfig};
use tictactoe_engine::engine::driver::GameDriver;
use tictactoe_engine::engine::models::{MoveReport, Slot};
use tictactoe_engine::engine::session::Session;

#[derive(Parser)]
#[command(name = "tictactoe", about = "Play tic-tac-toe in the terminal")]
struct Cli {
    /// Path to tictactoe.toml (default: auto-discover)
    #[arg(long, env = "TICTACTOE_CONFIG")]
    config: Option<PathBuf>,

    /// "pvp" or "pvc"
    #[arg(long, env = "TICTACTOE_MODE")]
    mode: Option<String>,

    /// Slot played by the computer in pvc mode (1 or 2)
    #[arg(long)]
    computer_slot: Option<u8>,

    /// easy | medium | hard | random | heuristic | minimax
    #[arg(short, long, env = "TICTACTOE_DIFFICULTY")]
    difficulty: Option<String>,

    #[arg(long)]
    p1_marker: Option<String>,

    #[arg(long)]
    p2_marker: Option<String>,

    /// Pause before the computer moves, in milliseconds
    #[arg(long, env = "TICTACTOE_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Print each move as a JSON line instead of redrawing the board
    #[arg(long)]
    json: bool,
}

fn apply_overrides(cli: &Cli, config: &mut EngineConfig) -> Result<(), String> {
    let s = &mut config.session;
    if let Some(ref m) = cli.p1_marker {
        s.player1_marker = m.clone();
    }
    if let Some(ref m) = cli.p2_marker {
        s.player2_marker = m.clone();
    }
    if let Some(ref d) = cli.difficulty {
        s.strategy = d.clone();
    }
    if let Some(ms) = cli.delay_ms {
        s.computer_delay_ms = ms;
    }
    if cli.seed.is_some() {
        s.seed = cli.seed;
    }
    let slot = match cli.computer_slot {
        None => None,
        Some(1) => Some(Slot::One),
        Some(2) => Some(Slot::Two),
        Some(other) => return Err(format!("no player slot {}, expected 1 or 2", other)),
    };
    match cli.mode.as_deref() {
        None => {
            if slot.is_some() {
                s.computer_slot = slot;
            }
        }
        Some("pvp") => s.computer_slot = None,
        Some("pvc") => s.computer_slot = slot.or(s.computer_slot).or(Some(Slot::Two)),
        Some(other) => return Err(format!("unknown mode '{}', expected pvp or pvc", other)),
    }
    Ok(())
}

fn print_report(report: &MoveReport, driver: &GameDriver, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, "failed to encode move report"),
        }
    } else {
        println!("{}", console::render(driver.session()));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => load_config(path).map_err(|e| format!("Failed to load config: {}", e))?,
        None => load_default_config(),
    };
    apply_overrides(&cli, &mut config)?;

    let session = Session::new(config.to_session_config()?)?;
    let delay = Duration::from_millis(config.session.computer_delay_ms);
    let (mut driver, mut computer_turns) = GameDriver::new(session, delay);

    if !cli.json {
        println!("{}", console::render_mode(driver.session()));
        println!("Type 'help' for commands.");
    }
    driver.start();
    if !cli.json {
        println!("{}", console::render(driver.session()));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let result = line
                    .parse::<Command>()
                    .and_then(|cmd| console::execute(&mut driver, &config, cmd));
                match result {
                    Ok(Response::Moved(report)) => print_report(&report, &driver, cli.json),
                    Ok(Response::Restarted) => {
                        if !cli.json {
                            println!("{}", console::render_mode(driver.session()));
                            println!("{}", console::render(driver.session()));
                        }
                    }
                    Ok(Response::Scores) => {
                        let text = console::render_scores(driver.session());
                        console::write_text(cli.json, &mut io::stdout(), &mut io::stderr(), &text)?;
                    }
                    Ok(Response::Help) => {
                        console::write_text(cli.json, &mut io::stdout(), &mut io::stderr(), HELP)?;
                    }
                    Ok(Response::Quit) => break,
                    Err(e) => {
                        console::write_text(cli.json, &mut io::stdout(), &mut io::stderr(), &e.to_string())?;
                    }
                }
            }
            Some(turn) = computer_turns.recv() => {
                match driver.on_timer(turn) {
                    Some(Ok(report)) => print_report(&report, &driver, cli.json),
                    Some(Err(e)) => tracing::warn!(error = %e, "computer move failed"),
                    None => {}
                }
            }
        }
    }

    tracing::info!(scores = ?driver.session().scores(), "session finished");
    Ok(())
}
