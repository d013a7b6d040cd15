//! Tic-tac-toe board model and rules.
//!
//! Cells are indexed 0..9 in row-major order:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```

pub mod board;
pub mod rules;
pub mod types;

pub use board::Board;
pub use rules::{check_winner, evaluate, find_winning_move, is_draw};
pub use types::{GameOutcome, Marker};
