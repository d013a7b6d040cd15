//! Computer move strategies.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::engine::error::ConfigError;
use crate::engine::minimax::{minimax_search, MinimaxParams};
use crate::games::tictactoe::board::Board;
use crate::games::tictactoe::rules::find_winning_move;
use crate::games::tictactoe::types::{Marker, CENTER, CORNERS};

/// A strategy picks an empty cell for `me` given the current board.
///
/// Returns `None` only when the board has no empty cell.
pub trait MoveStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn choose_move(
        &self,
        board: &Board,
        me: &Marker,
        opponent: &Marker,
        rng: &mut dyn RngCore,
    ) -> Option<usize>;
}

/// Picks a uniformly random empty cell.
pub struct RandomStrategy;

impl MoveStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(
        &self,
        board: &Board,
        _me: &Marker,
        _opponent: &Marker,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        board.empty_cells().choose(rng).copied()
    }
}

/// Rule-based play: win, block, center, corner, then random.
pub struct HeuristicStrategy;

impl MoveStrategy for HeuristicStrategy {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn choose_move(
        &self,
        board: &Board,
        me: &Marker,
        opponent: &Marker,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        if let Some(cell) = find_winning_move(board, me) {
            return Some(cell);
        }
        if let Some(cell) = find_winning_move(board, opponent) {
            return Some(cell);
        }
        if board.is_empty(CENTER) {
            return Some(CENTER);
        }
        if let Some(&corner) = CORNERS.iter().find(|&&c| board.is_empty(c)) {
            return Some(corner);
        }
        RandomStrategy.choose_move(board, me, opponent, rng)
    }
}

/// Wraps the minimax search as a strategy. Searches a copy of the board.
#[derive(Default)]
pub struct MinimaxStrategy {
    pub params: MinimaxParams,
}

impl MinimaxStrategy {
    pub fn new(params: MinimaxParams) -> Self {
        Self { params }
    }
}

impl MoveStrategy for MinimaxStrategy {
    fn name(&self) -> &str {
        "minimax"
    }

    fn choose_move(
        &self,
        board: &Board,
        me: &Marker,
        opponent: &Marker,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let mut scratch = board.clone();
        let (cell, _stats) = minimax_search(&mut scratch, me, opponent, &self.params, rng);
        cell
    }
}

/// Selectable computer strength. `easy`/`medium`/`hard` are accepted as aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    #[serde(alias = "easy")]
    Random,
    #[serde(alias = "medium")]
    Heuristic,
    #[serde(alias = "hard")]
    Minimax,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Heuristic => "heuristic",
            StrategyKind::Minimax => "minimax",
        }
    }

    /// Difficulty label shown to players.
    pub fn difficulty(&self) -> &'static str {
        match self {
            StrategyKind::Random => "easy",
            StrategyKind::Heuristic => "medium",
            StrategyKind::Minimax => "hard",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" | "easy" => Ok(StrategyKind::Random),
            "heuristic" | "medium" => Ok(StrategyKind::Heuristic),
            "minimax" | "hard" => Ok(StrategyKind::Minimax),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

pub fn build_strategy(kind: StrategyKind, minimax: &MinimaxParams) -> Box<dyn MoveStrategy> {
    match kind {
        StrategyKind::Random => Box::new(RandomStrategy),
        StrategyKind::Heuristic => Box::new(HeuristicStrategy),
        StrategyKind::Minimax => Box::new(MinimaxStrategy::new(minimax.clone())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::minimax::TieBreak;

    fn board(cells: [&str; 9]) -> Board {
        Board::from_cells(cells).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_random_reaches_every_empty_cell() {
        let b = board(["X", "", "O", "", "X", "", "", "O", ""]);
        let mut rng = rng();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let cell = RandomStrategy
                .choose_move(&b, &Marker::x(), &Marker::o(), &mut rng)
                .unwrap();
            assert!(b.is_empty(cell));
            seen.insert(cell);
        }
        let expected: HashSet<usize> = b.empty_cells().into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_random_on_full_board() {
        let b = board(["X", "O", "X", "O", "X", "O", "O", "X", "O"]);
        assert_eq!(RandomStrategy.choose_move(&b, &Marker::x(), &Marker::o(), &mut rng()), None);
    }

    #[test]
    fn test_heuristic_blocks_threat() {
        let b = board(["X", "X", "", "", "O", "", "", "", ""]);
        let cell = HeuristicStrategy.choose_move(&b, &Marker::o(), &Marker::x(), &mut rng());
        assert_eq!(cell, Some(2));
    }

    #[test]
    fn test_heuristic_prefers_win_over_block() {
        // O can win at 5 (row 1); X threatens 2 (row 0).
        let b = board(["X", "X", "", "O", "O", "", "", "", "X"]);
        let cell = HeuristicStrategy.choose_move(&b, &Marker::o(), &Marker::x(), &mut rng());
        assert_eq!(cell, Some(5));
    }

    #[test]
    fn test_heuristic_center_then_corners() {
        let empty = Board::new();
        assert_eq!(
            HeuristicStrategy.choose_move(&empty, &Marker::o(), &Marker::x(), &mut rng()),
            Some(4)
        );

        let b = board(["", "", "", "", "X", "", "", "", ""]);
        assert_eq!(
            HeuristicStrategy.choose_move(&b, &Marker::o(), &Marker::x(), &mut rng()),
            Some(0)
        );

        let b = board(["X", "", "", "", "O", "", "", "", ""]);
        assert_eq!(
            HeuristicStrategy.choose_move(&b, &Marker::x(), &Marker::o(), &mut rng()),
            Some(2)
        );
    }

    #[test]
    fn test_heuristic_uses_fixed_line_order() {
        // X threatens 7 (row 2) and 3 (column 0); rows are checked first.
        let b = board(["X", "", "O", "", "O", "", "X", "", "X"]);
        let cell = HeuristicStrategy.choose_move(&b, &Marker::o(), &Marker::x(), &mut rng());
        assert_eq!(cell, Some(7));

        let b = board(["X", "O", "X", "", "O", "", "O", "X", "X"]);
        let cell = HeuristicStrategy.choose_move(&b, &Marker::x(), &Marker::o(), &mut rng());
        assert_eq!(cell, Some(5));
    }

    #[test]
    fn test_heuristic_falls_back_to_random_edge() {
        // No win or block, center and all corners taken: only edges 3 and 5 remain.
        let b = board(["O", "X", "O", "", "X", "", "X", "O", "X"]);
        let mut seen = HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cell = HeuristicStrategy
                .choose_move(&b, &Marker::o(), &Marker::x(), &mut rng)
                .unwrap();
            assert!(cell == 3 || cell == 5, "unexpected cell {}", cell);
            seen.insert(cell);
        }
        assert_eq!(seen, HashSet::from([3, 5]));
    }

    #[test]
    fn test_minimax_strategy_leaves_board_untouched() {
        let b = board(["X", "", "", "", "", "", "", "", ""]);
        let before = b.clone();
        let strategy = MinimaxStrategy::new(MinimaxParams { tie_break: TieBreak::FirstInOrder });
        let cell = strategy.choose_move(&b, &Marker::o(), &Marker::x(), &mut rng()).unwrap();
        assert_eq!(b, before);
        // The only non-losing reply to a corner opening is the center.
        assert_eq!(cell, 4);
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("easy".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
        assert_eq!("Medium".parse::<StrategyKind>().unwrap(), StrategyKind::Heuristic);
        assert_eq!("minimax".parse::<StrategyKind>().unwrap(), StrategyKind::Minimax);
        assert_eq!(
            "expert".parse::<StrategyKind>(),
            Err(ConfigError::UnknownStrategy("expert".into()))
        );
        assert_eq!(StrategyKind::Minimax.difficulty(), "hard");
    }

    #[test]
    fn test_build_strategy_names() {
        let params = MinimaxParams::default();
        for kind in [StrategyKind::Random, StrategyKind::Heuristic, StrategyKind::Minimax] {
            assert_eq!(build_strategy(kind, &params).name(), kind.as_str());
        }
    }
}
