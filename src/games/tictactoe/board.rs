//! Board state for a 3x3 game.
//!
//! Cells are indexed 0..9 row-major. A cell, once occupied, stays occupied for
//! the rest of the game; the only way back to empty is [`Board::clear`] (used by
//! search to undo speculative moves) or [`Board::reset`] at game start.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::types::{Marker, CELL_COUNT};
use crate::engine::error::MoveError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    /// None = empty, Some(marker) = occupied.
    cells: [Option<Marker>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from per-cell strings; "" (or whitespace) is empty.
    pub fn from_cells(cells: [&str; CELL_COUNT]) -> Result<Self, MoveError> {
        let mut board = Self::new();
        for (i, raw) in cells.iter().enumerate() {
            let Ok(marker) = Marker::new(raw) else { continue };
            board.place(i, marker)?;
        }
        Ok(board)
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.cells.get(index).and_then(|c| c.as_ref())
    }

    pub fn cells(&self) -> &[Option<Marker>; CELL_COUNT] {
        &self.cells
    }

    /// True when `index` is on the board and unoccupied.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i].is_none()).collect()
    }

    pub fn move_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Occupy an empty cell. Leaves the board untouched on error.
    pub fn place(&mut self, index: usize, marker: Marker) -> Result<(), MoveError> {
        let cell = self.cells.get_mut(index).ok_or(MoveError::OutOfRange(index))?;
        if cell.is_some() {
            return Err(MoveError::Occupied(index));
        }
        *cell = Some(marker);
        Ok(())
    }

    /// Return a cell to empty. Out-of-range indices are ignored.
    pub fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = None;
        }
    }

    pub fn reset(&mut self) {
        self.cells = Default::default();
    }

    /// Place `marker` at `index` for the lifetime of the returned guard.
    ///
    /// The cell is cleared again when the guard drops, on every exit path.
    /// Returns `None` if the cell is not empty.
    pub fn speculate(&mut self, index: usize, marker: Marker) -> Option<SpeculativeMove<'_>> {
        self.place(index, marker).ok()?;
        Some(SpeculativeMove { board: self, index })
    }
}

/// A move that is undone when dropped.
pub struct SpeculativeMove<'a> {
    board: &'a mut Board,
    index: usize,
}

impl Deref for SpeculativeMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for SpeculativeMove<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for SpeculativeMove<'_> {
    fn drop(&mut self) {
        self.board.clear(self.index);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            for col in 0..3 {
                let i = row * 3 + col;
                let label = match &self.cells[i] {
                    Some(m) => m.to_string(),
                    None => i.to_string(),
                };
                if col > 0 {
                    f.write_str("|")?;
                }
                write!(f, "{:^3}", label)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_query() {
        let mut board = Board::new();
        assert!(board.is_empty(4));
        board.place(4, Marker::x()).unwrap();
        assert!(!board.is_empty(4));
        assert_eq!(board.get(4), Some(&Marker::x()));
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.empty_cells(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let mut board = Board::new();
        board.place(0, Marker::x()).unwrap();
        assert_eq!(board.place(0, Marker::o()), Err(MoveError::Occupied(0)));
        assert_eq!(board.get(0), Some(&Marker::x()));
        assert_eq!(board.place(9, Marker::o()), Err(MoveError::OutOfRange(9)));
        assert!(!board.is_empty(9));
        assert!(!board.is_empty(usize::MAX));
    }

    #[test]
    fn test_full_board() {
        let board = Board::from_cells(["X", "O", "X", "O", "X", "O", "O", "X", "O"]).unwrap();
        assert!(board.is_full());
        assert!(board.empty_cells().is_empty());
    }

    #[test]
    fn test_speculative_move_undone_on_drop() {
        let mut board = Board::from_cells(["X", "", "", "", "O", "", "", "", ""]).unwrap();
        let before = board.clone();
        {
            let next = board.speculate(2, Marker::x()).unwrap();
            assert_eq!(next.get(2), Some(&Marker::x()));
        }
        assert_eq!(board, before);
        assert!(board.speculate(0, Marker::o()).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_and_reset() {
        let mut board = Board::new();
        board.place(3, Marker::o()).unwrap();
        board.clear(3);
        assert!(board.is_empty(3));
        board.place(5, Marker::o()).unwrap();
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_display_labels_empty_cells() {
        let board = Board::from_cells(["X", "", "", "", "O", "", "", "", ""]).unwrap();
        let text = board.to_string();
        assert!(text.starts_with(" X | 1 | 2 "));
        assert!(text.contains(" 3 | O | 5 "));
    }
}
