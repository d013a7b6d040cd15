//! Line-oriented terminal front end: command parsing, execution and rendering.

use std::io::{self, Write};
use std::str::FromStr;

use crate::engine::config::EngineConfig;
use crate::engine::driver::GameDriver;
use crate::engine::error::{ConfigError, MoveError};
use crate::engine::minimax::{MinimaxParams, TieBreak};
use crate::engine::models::{MoveReport, PlayMode, Slot};
use crate::engine::session::Session;

pub const HELP: &str = "\
Commands:
  0-8                      place your marker on a cell
  restart                  start a new game (scores are kept)
  mode pvp                 two human players
  mode pvc [1|2]           play against the computer (it takes slot 2 unless given)
  difficulty <level>       easy | medium | hard | random | heuristic | minimax
  markers <p1> <p2>        change both markers and restart
  tiebreak shuffle|first   how the hard computer picks between equal moves
  scores                   show the scoreboard
  reset-scores             zero the scoreboard
  help                     show this help
  quit                     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(usize),
    Restart,
    Mode(PlayMode),
    Difficulty(String),
    Markers(String, String),
    TieBreak(TieBreak),
    Scores,
    ResetScores,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Parse("empty command".into()));
        };
        let args: Vec<&str> = words.collect();

        if let Ok(index) = head.parse::<usize>() {
            return match args.as_slice() {
                [] => Ok(Command::Move(index)),
                _ => Err(CommandError::Parse("a move is a single cell number".into())),
            };
        }

        let cmd = match (head.to_lowercase().as_str(), args.as_slice()) {
            ("restart" | "new", []) => Command::Restart,
            ("mode", ["pvp"]) => Command::Mode(PlayMode::HumanVsHuman),
            ("mode", ["pvc"]) => Command::Mode(PlayMode::HumanVsComputer { computer: Slot::Two }),
            ("mode", ["pvc", slot]) => Command::Mode(PlayMode::HumanVsComputer {
                computer: parse_slot(slot)?,
            }),
            ("difficulty", [level]) => Command::Difficulty(level.to_string()),
            ("markers", [p1, p2]) => Command::Markers(p1.to_string(), p2.to_string()),
            ("tiebreak", ["shuffle"]) => Command::TieBreak(TieBreak::Shuffle),
            ("tiebreak", ["first" | "first_in_order"]) => Command::TieBreak(TieBreak::FirstInOrder),
            ("tiebreak", _) => return Err(CommandError::Parse("usage: tiebreak shuffle|first".into())),
            ("scores", []) => Command::Scores,
            ("reset-scores", []) => Command::ResetScores,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            ("markers", _) => {
                return Err(CommandError::Parse("usage: markers <p1> <p2>".into()));
            }
            ("mode", _) => return Err(CommandError::Parse("usage: mode pvp | mode pvc [1|2]".into())),
            _ => {
                return Err(CommandError::Parse(format!(
                    "unrecognised command '{}', type 'help' for a list",
                    line.trim()
                )))
            }
        };
        Ok(cmd)
    }
}

fn parse_slot(raw: &str) -> Result<Slot, CommandError> {
    match raw {
        "1" => Ok(Slot::One),
        "2" => Ok(Slot::Two),
        other => Err(CommandError::Parse(format!("no player slot '{}', expected 1 or 2", other))),
    }
}

/// What the front end should show after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Moved(MoveReport),
    /// The game was restarted or reconfigured.
    Restarted,
    Scores,
    Help,
    Quit,
}

/// Run a parsed command against the driver.
pub fn execute(
    driver: &mut GameDriver,
    config: &EngineConfig,
    cmd: Command,
) -> Result<Response, CommandError> {
    let response = match cmd {
        Command::Move(index) => Response::Moved(driver.submit_move(index)?),
        Command::Restart => {
            driver.restart();
            Response::Restarted
        }
        Command::Mode(mode) => {
            driver.set_mode(mode);
            Response::Restarted
        }
        Command::Difficulty(level) => {
            driver.set_strategy(config.resolve_strategy(&level)?);
            Response::Restarted
        }
        Command::Markers(p1, p2) => {
            driver.apply_markers(&p1, &p2)?;
            Response::Restarted
        }
        Command::TieBreak(tie_break) => {
            driver.set_minimax_params(MinimaxParams { tie_break });
            Response::Restarted
        }
        Command::Scores => Response::Scores,
        Command::ResetScores => {
            driver.reset_scores();
            Response::Scores
        }
        Command::Help => Response::Help,
        Command::Quit => Response::Quit,
    };
    Ok(response)
}

pub fn render_scores(session: &Session) -> String {
    let scores = session.scores();
    format!(
        "{} (player 1): {}  |  {} (player 2): {}  |  Draws: {}",
        session.marker(Slot::One),
        scores.slot_one_wins,
        session.marker(Slot::Two),
        scores.slot_two_wins,
        scores.draws,
    )
}

pub fn render_mode(session: &Session) -> String {
    match session.mode() {
        PlayMode::HumanVsHuman => "Player vs player".to_string(),
        PlayMode::HumanVsComputer { computer } => format!(
            "Player vs computer ({} is the computer, difficulty {})",
            computer,
            session.strategy_kind().difficulty()
        ),
    }
}

/// Write a line of plain text. In JSON mode stdout carries only
/// `MoveReport` lines, so text goes to `err` instead.
pub fn write_text<O: Write, E: Write>(json: bool, out: &mut O, err: &mut E, text: &str) -> io::Result<()> {
    if json {
        writeln!(err, "{}", text)
    } else {
        writeln!(out, "{}", text)
    }
}

/// Board, status line and scoreboard.
pub fn render(session: &Session) -> String {
    format!(
        "\n{}\n{}\n{}",
        session.board(),
        session.status_message(),
        render_scores(session)
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::bot_strategy::StrategyKind;
    use crate::engine::session::SessionConfig;

    fn driver() -> GameDriver {
        let session = Session::new(SessionConfig { seed: Some(5), ..Default::default() }).unwrap();
        let (mut driver, _rx) = GameDriver::new(session, Duration::from_millis(700));
        driver.start();
        driver
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!("4".parse::<Command>(), Ok(Command::Move(4)));
        assert_eq!("  0 ".parse::<Command>(), Ok(Command::Move(0)));
        // Range checking happens when the move is applied.
        assert_eq!("12".parse::<Command>(), Ok(Command::Move(12)));
        assert!("4 5".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("restart".parse::<Command>(), Ok(Command::Restart));
        assert_eq!("mode pvp".parse::<Command>(), Ok(Command::Mode(PlayMode::HumanVsHuman)));
        assert_eq!(
            "mode pvc".parse::<Command>(),
            Ok(Command::Mode(PlayMode::HumanVsComputer { computer: Slot::Two }))
        );
        assert_eq!(
            "MODE pvc 1".parse::<Command>(),
            Ok(Command::Mode(PlayMode::HumanVsComputer { computer: Slot::One }))
        );
        assert!("mode pvc 3".parse::<Command>().is_err());
        assert_eq!("difficulty hard".parse::<Command>(), Ok(Command::Difficulty("hard".into())));
        assert_eq!(
            "markers a b".parse::<Command>(),
            Ok(Command::Markers("a".into(), "b".into()))
        );
        assert!("markers a".parse::<Command>().is_err());
        assert_eq!("tiebreak first".parse::<Command>(), Ok(Command::TieBreak(TieBreak::FirstInOrder)));
        assert_eq!("tiebreak shuffle".parse::<Command>(), Ok(Command::TieBreak(TieBreak::Shuffle)));
        assert!("tiebreak random".parse::<Command>().is_err());
        assert_eq!("reset-scores".parse::<Command>(), Ok(Command::ResetScores));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
        assert!(matches!("dance".parse::<Command>(), Err(CommandError::Parse(m)) if m.contains("dance")));
    }

    #[test]
    fn test_execute_moves_and_errors() {
        let mut d = driver();
        let config = EngineConfig::default();
        let resp = execute(&mut d, &config, Command::Move(4)).unwrap();
        assert!(matches!(resp, Response::Moved(r) if r.index == 4));
        assert_eq!(
            execute(&mut d, &config, Command::Move(4)),
            Err(CommandError::Move(MoveError::Occupied(4)))
        );
        assert_eq!(
            execute(&mut d, &config, Command::Move(9)),
            Err(CommandError::Move(MoveError::OutOfRange(9)))
        );
    }

    #[test]
    fn test_execute_markers_and_scores() {
        let mut d = driver();
        let config = EngineConfig::default();
        let err = execute(&mut d, &config, Command::Markers("z".into(), "Z".into())).unwrap_err();
        assert!(err.to_string().contains("cannot be the same"));

        execute(&mut d, &config, Command::Markers("a".into(), "b".into())).unwrap();
        assert_eq!(d.session().status_message(), "It's A's turn");
        assert_eq!(render_scores(d.session()), "A (player 1): 0  |  B (player 2): 0  |  Draws: 0");

        for cell in [0, 3, 1, 4, 2] {
            execute(&mut d, &config, Command::Move(cell)).unwrap();
        }
        assert!(render(d.session()).contains("Player A has won!"));
        assert_eq!(d.session().scores().slot_one_wins, 1);
        assert_eq!(execute(&mut d, &config, Command::ResetScores), Ok(Response::Scores));
        assert_eq!(d.session().scores().games(), 0);
    }

    #[test]
    fn test_execute_difficulty() {
        let mut d = driver();
        let config = EngineConfig::default();
        execute(&mut d, &config, Command::Difficulty("medium".into())).unwrap();
        assert_eq!(d.session().strategy_kind(), StrategyKind::Heuristic);
        assert!(matches!(
            execute(&mut d, &config, Command::Difficulty("godlike".into())),
            Err(CommandError::Config(ConfigError::UnknownStrategy(_)))
        ));
        assert_eq!(render_mode(d.session()), "Player vs player");
    }

    #[test]
    fn test_json_mode_keeps_text_off_stdout() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let text = CommandError::Move(MoveError::Occupied(4)).to_string();

        write_text(true, &mut out, &mut err, &text).unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "cell 4 is already occupied\n");

        let mut err = Vec::new();
        write_text(false, &mut out, &mut err, &text).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "cell 4 is already occupied\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_execute_tie_break_restarts() {
        let mut d = driver();
        let config = EngineConfig::default();
        execute(&mut d, &config, Command::Move(4)).unwrap();
        let resp = execute(&mut d, &config, Command::TieBreak(TieBreak::FirstInOrder)).unwrap();
        assert_eq!(resp, Response::Restarted);
        assert_eq!(d.session().minimax_params().tie_break, TieBreak::FirstInOrder);
        assert_eq!(d.session().board().move_count(), 0);
    }
}
