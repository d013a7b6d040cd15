//! Error types for session setup and move handling.

use std::path::PathBuf;

use crate::engine::models::Slot;

/// Setup was rejected; the previous configuration stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("please enter a marker for both players")]
    EmptyMarker,
    #[error("player 1 and player 2 markers cannot be the same ({0})")]
    DuplicateMarker(String),
    #[error("unknown strategy '{0}' (expected random, heuristic, minimax, easy, medium or hard)")]
    UnknownStrategy(String),
    #[error("failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    /// The file parsed but holds settings a session can't use.
    #[error("invalid settings in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

/// A move request that was not applied. Non-fatal: game state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell {0} is not on the board")]
    OutOfRange(usize),
    #[error("cell {0} is already occupied")]
    Occupied(usize),
    #[error("no game in progress")]
    NotInProgress,
    #[error("it is not a human player's turn ({0} is computer-controlled)")]
    NotHumanTurn(Slot),
    #[error("it is not the computer's turn")]
    NotComputerTurn,
    #[error("computer turn ticket is stale (game {game}, move {move_number})")]
    StaleTicket { game: u64, move_number: usize },
    #[error("no empty cell left")]
    NoEmptyCell,
}
