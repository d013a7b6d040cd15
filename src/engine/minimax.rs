//! Exhaustive minimax search for optimal play.
//!
//! No pruning: a 3x3 board is bounded at 9! leaves, which is cheap enough to
//! search fully on every computer move. Scores are taken from the searching
//! player's point of view: `10 - depth` for a win, `depth - 10` for a loss and
//! 0 for a draw, so faster wins and slower losses are preferred.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::games::tictactoe::board::Board;
use crate::games::tictactoe::rules::evaluate;
use crate::games::tictactoe::types::{GameOutcome, Marker};

const WIN_SCORE: i32 = 10;

/// How equally-scored root moves are ordered before the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Shuffle root candidates with the caller's rng, so repeated play from
    /// the same board varies between equally good moves.
    #[default]
    Shuffle,
    /// Scan root candidates in ascending index order; the lowest index wins ties.
    FirstInOrder,
}

/// Minimax search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimaxParams {
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Counters from one search, for logging and benchmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, root children included.
    pub nodes: u64,
    /// Score of the chosen move; None if there was nothing to search.
    pub best_score: Option<i32>,
}

/// Pick the best cell for `me`. Returns `(None, stats)` when the board is full.
///
/// The board is borrowed mutably for in-place speculation; every speculative
/// move is undone before returning, so the board is unchanged afterwards.
pub fn minimax_search(
    board: &mut Board,
    me: &Marker,
    opponent: &Marker,
    params: &MinimaxParams,
    rng: &mut dyn RngCore,
) -> (Option<usize>, SearchStats) {
    let mut candidates = board.empty_cells();
    if params.tie_break == TieBreak::Shuffle {
        candidates.shuffle(rng);
    }

    let mut stats = SearchStats::default();
    let mut best: Option<(usize, i32)> = None;

    for cell in candidates {
        let Some(mut next) = board.speculate(cell, me.clone()) else {
            continue;
        };
        let score = minimax(&mut next, 0, false, me, opponent, &mut stats.nodes);
        drop(next);

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((cell, score));
        }
    }

    stats.best_score = best.map(|(_, s)| s);
    tracing::debug!(
        nodes = stats.nodes,
        best_cell = ?best.map(|(c, _)| c),
        best_score = ?stats.best_score,
        "minimax search finished"
    );
    (best.map(|(c, _)| c), stats)
}

/// Score the position for `me`. `depth` counts plies below the root move.
fn minimax(
    board: &mut Board,
    depth: i32,
    maximizing: bool,
    me: &Marker,
    opponent: &Marker,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    match evaluate(board) {
        GameOutcome::Win { marker, .. } if &marker == me => return WIN_SCORE - depth,
        GameOutcome::Win { .. } => return depth - WIN_SCORE,
        GameOutcome::Draw => return 0,
        GameOutcome::InProgress => {}
    }

    let mover = if maximizing { me } else { opponent };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for cell in board.empty_cells() {
        let Some(mut next) = board.speculate(cell, mover.clone()) else {
            continue;
        };
        let score = minimax(&mut next, depth + 1, !maximizing, me, opponent, nodes);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }

    best
}
