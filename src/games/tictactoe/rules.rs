//! Win and draw detection.

use super::board::Board;
use super::types::{GameOutcome, Marker, WinningLine, WIN_LINES};

/// Return the first winning line (in [`WIN_LINES`] order) and its owner.
pub fn check_winner(board: &Board) -> Option<(&Marker, WinningLine)> {
    for line in WIN_LINES {
        let a = board.get(line[0]);
        if a.is_some() && a == board.get(line[1]) && a == board.get(line[2]) {
            return a.map(|m| (m, line));
        }
    }
    None
}

pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}

/// Evaluate the board. Pure: never mutates `board`.
pub fn evaluate(board: &Board) -> GameOutcome {
    if let Some((marker, line)) = check_winner(board) {
        return GameOutcome::Win { marker: marker.clone(), line };
    }
    if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}

/// If `marker` can complete a line with one move, return that cell.
///
/// Lines are scanned in fixed order; a line qualifies when it has exactly one
/// empty cell and the other two already hold `marker`.
pub fn find_winning_move(board: &Board, marker: &Marker) -> Option<usize> {
    WIN_LINES.iter().find_map(|line| {
        let mut empty = None;
        let mut owned = 0;
        for &i in line {
            match board.get(i) {
                None => empty = Some(i),
                Some(m) if m == marker => owned += 1,
                Some(_) => return None,
            }
        }
        if owned == 2 {
            empty
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: [&str; 9]) -> Board {
        Board::from_cells(cells).unwrap()
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), GameOutcome::InProgress);
    }

    #[test]
    fn test_row_column_diagonal_wins() {
        let b = board(["X", "X", "X", "O", "O", "", "", "", ""]);
        assert_eq!(evaluate(&b), GameOutcome::Win { marker: Marker::x(), line: [0, 1, 2] });

        let b = board(["X", "O", "X", "", "O", "X", "", "O", ""]);
        assert_eq!(evaluate(&b), GameOutcome::Win { marker: Marker::o(), line: [1, 4, 7] });

        let b = board(["O", "X", "X", "", "X", "O", "X", "", "O"]);
        assert_eq!(evaluate(&b), GameOutcome::Win { marker: Marker::x(), line: [2, 4, 6] });
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let b = board(["X", "O", "X", "O", "X", "O", "O", "X", "O"]);
        assert_eq!(evaluate(&b), GameOutcome::Draw);
        assert!(is_draw(&b));
    }

    #[test]
    fn test_full_board_with_line_is_win() {
        let b = board(["X", "X", "X", "O", "O", "X", "X", "O", "O"]);
        assert_eq!(evaluate(&b), GameOutcome::Win { marker: Marker::x(), line: [0, 1, 2] });
        assert!(!is_draw(&b));
    }

    #[test]
    fn test_first_line_in_fixed_order_reported() {
        // Row 0 and column 0 both complete; the row comes first.
        let b = board(["X", "X", "X", "X", "O", "O", "X", "O", "O"]);
        assert_eq!(evaluate(&b), GameOutcome::Win { marker: Marker::x(), line: [0, 1, 2] });
    }

    #[test]
    fn test_evaluate_idempotent() {
        let b = board(["X", "O", "", "", "X", "", "", "", "O"]);
        let before = b.clone();
        let first = evaluate(&b);
        let second = evaluate(&b);
        assert_eq!(first, second);
        assert_eq!(b, before);
    }

    #[test]
    fn test_find_winning_move() {
        let b = board(["X", "X", "", "", "O", "", "", "", ""]);
        assert_eq!(find_winning_move(&b, &Marker::x()), Some(2));
        assert_eq!(find_winning_move(&b, &Marker::o()), None);

        let b = board(["O", "X", "", "", "O", "X", "", "", ""]);
        assert_eq!(find_winning_move(&b, &Marker::o()), Some(8));
    }

    #[test]
    fn test_find_winning_move_ignores_blocked_lines() {
        let b = board(["X", "X", "O", "", "", "", "", "", ""]);
        assert_eq!(find_winning_move(&b, &Marker::x()), None);
    }

    #[test]
    fn test_find_winning_move_prefers_first_line() {
        // X threatens both row 0 (cell 2) and column 0 (cell 6).
        let b = board(["X", "X", "", "X", "O", "O", "", "", "O"]);
        assert_eq!(find_winning_move(&b, &Marker::x()), Some(2));
    }
}
