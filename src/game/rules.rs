//! Pure rules engine: win detection, draw detection, and move legality.
//!
//! All functions here operate on a board snapshot and have no side effects.

use derive_more::{Display, Error};
use tracing::instrument;

use super::types::{Board, Cell, Symbol};

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A move rejected by the rules engine or the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game has already reached a terminal state.
    #[display("Game already finished")]
    GameFinished,
    /// The submitting player is not the one to move.
    #[display("It is {_0}'s turn")]
    WrongTurn(#[error(not(source))] Symbol),
    /// Position outside the 0-8 range.
    #[display("Position must be between 0 and 8")]
    OutOfRange,
    /// The target cell is already claimed.
    #[display("Position already occupied")]
    CellOccupied,
}

/// Checks the board for a winner.
///
/// Lines are evaluated in fixed order and the first uniform, non-empty line
/// decides. A board reached through the state machine can never hold two
/// distinct winning symbols at once.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Symbol> {
    for [a, b, c] in LINES {
        let cell = board.get(a);
        if let Some(Cell::Occupied(symbol)) = cell {
            if cell == board.get(b) && cell == board.get(c) {
                return Some(symbol);
            }
        }
    }
    None
}

/// Checks whether the game is drawn: every cell occupied and no winner.
///
/// A full board with a completed line is a win, not a draw, so this must
/// consult [`check_winner`] rather than fullness alone.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}

/// Validates that `position` is in range and targets an empty cell.
///
/// Returns the validated board index on success; the board is never mutated.
///
/// # Errors
///
/// Returns [`MoveError::OutOfRange`] or [`MoveError::CellOccupied`].
#[instrument]
pub fn validate_move(board: &Board, position: i32) -> Result<usize, MoveError> {
    if !(0..=8).contains(&position) {
        return Err(MoveError::OutOfRange);
    }
    let index = position as usize;
    if !board.is_empty(index) {
        return Err(MoveError::CellOccupied);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(s: &str) -> Board {
        Board::decode(s).expect("valid board string")
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_from("XXX OO   ");
        assert_eq!(check_winner(&board), Some(Symbol::X));
    }

    #[test]
    fn test_winner_column() {
        let board = board_from("OX OX O X");
        assert_eq!(check_winner(&board), Some(Symbol::O));
    }

    #[test]
    fn test_winner_diagonal() {
        let board = board_from("X OO X  X");
        assert_eq!(check_winner(&board), Some(Symbol::X));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_from("XXO O O X");
        assert_eq!(check_winner(&board), Some(Symbol::O));
    }

    #[test]
    fn test_no_winner_incomplete_line() {
        let board = board_from("XX  O    ");
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_draw_full_board_no_line() {
        // X: 0,4,5,7  O: 1,2,3,6,8 - no uniform line
        let board = board_from("XOOOXXOXO");
        assert_eq!(check_winner(&board), None);
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_winner_is_not_draw() {
        let board = board_from("XXXOOXOXO");
        assert_eq!(check_winner(&board), Some(Symbol::X));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_partial_board_is_not_draw() {
        let board = board_from("XO       ");
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_validate_move_ok() {
        let board = Board::new();
        assert_eq!(validate_move(&board, 0), Ok(0));
        assert_eq!(validate_move(&board, 8), Ok(8));
    }

    #[test]
    fn test_validate_move_out_of_range() {
        let board = Board::new();
        assert_eq!(validate_move(&board, 9), Err(MoveError::OutOfRange));
        assert_eq!(validate_move(&board, -1), Err(MoveError::OutOfRange));
    }

    #[test]
    fn test_validate_move_occupied() {
        let mut board = Board::new();
        board.set(3, Cell::Occupied(Symbol::X));
        assert_eq!(validate_move(&board, 3), Err(MoveError::CellOccupied));
    }

    #[test]
    fn test_validate_move_does_not_mutate() {
        let board = Board::new();
        let before = board;
        let _ = validate_move(&board, 4);
        assert_eq!(board, before);
    }
}
