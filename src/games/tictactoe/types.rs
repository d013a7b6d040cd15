//! Core tic-tac-toe value types: markers, winning lines and game outcomes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::error::ConfigError;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Three board indices that win the game when uniformly occupied.
pub type WinningLine = [usize; 3];

/// All winning lines in fixed evaluation order: rows, columns, diagonals.
pub const WIN_LINES: [WinningLine; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // cols
    [0, 4, 8], [2, 4, 6],             // diagonals
];

pub const CENTER: usize = 4;

/// Corner cells in the order the heuristic tries them.
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// A player-chosen symbol identifying one side.
///
/// Markers are trimmed and upper-cased on construction so that "x" and " X "
/// name the same side. Cloning is cheap (shared string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Marker(Arc<str>);

impl Marker {
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(Self(Arc::from(normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default marker for the first slot.
    pub fn x() -> Self {
        Self(Arc::from("X"))
    }

    /// Default marker for the second slot.
    pub fn o() -> Self {
        Self(Arc::from("O"))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Marker> for String {
    fn from(m: Marker) -> Self {
        m.0.to_string()
    }
}

impl TryFrom<String> for Marker {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Marker::new(&value)
    }
}

/// Result of evaluating a board. Recomputed after every move, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameOutcome {
    InProgress,
    Win { marker: Marker, line: WinningLine },
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(&self) -> Option<&Marker> {
        match self {
            GameOutcome::Win { marker, .. } => Some(marker),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_normalization() {
        let m = Marker::new("  x ").unwrap();
        assert_eq!(m, Marker::x());
        assert_eq!(m.as_str(), "X");
        assert_eq!(Marker::new("ab").unwrap().as_str(), "AB");
    }

    #[test]
    fn test_empty_marker_rejected() {
        assert_eq!(Marker::new("   "), Err(ConfigError::EmptyMarker));
        assert_eq!(Marker::new(""), Err(ConfigError::EmptyMarker));
    }

    #[test]
    fn test_marker_serde_validates() {
        let m: Marker = serde_json::from_str("\"o\"").unwrap();
        assert_eq!(m, Marker::o());
        assert!(serde_json::from_str::<Marker>("\" \"").is_err());
        assert_eq!(serde_json::to_string(&Marker::x()).unwrap(), "\"X\"");
    }

    #[test]
    fn test_outcome_json_shape() {
        let win = GameOutcome::Win { marker: Marker::x(), line: [0, 4, 8] };
        let json = serde_json::to_value(&win).unwrap();
        assert_eq!(json["status"], "win");
        assert_eq!(json["marker"], "X");
        assert_eq!(json["line"], serde_json::json!([0, 4, 8]));
        assert!(win.is_terminal());
        assert!(!GameOutcome::InProgress.is_terminal());
    }

    #[test]
    fn test_win_lines_cover_every_cell() {
        for cell in 0..CELL_COUNT {
            assert!(WIN_LINES.iter().any(|l| l.contains(&cell)));
        }
    }
}
