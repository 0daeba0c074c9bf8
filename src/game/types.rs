//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// A player marker, X or O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// X (goes first).
    X,
    /// O (goes second).
    O,
}

impl Symbol {
    /// Returns the other symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// The single character stored in the database for this symbol.
    pub fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }

    /// Parses a symbol from its stored character. Returns `None` for
    /// anything other than `'X'` or `'O'`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Symbol::X),
            'O' => Some(Symbol::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Unclaimed cell.
    Empty,
    /// Cell claimed by a player.
    Occupied(Symbol),
}

impl Cell {
    /// The character stored in the database: `' '`, `'X'`, or `'O'`.
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Occupied(s) => s.as_char(),
        }
    }

    /// Parses a cell from its stored character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Cell::Empty),
            _ => Symbol::from_char(c).map(Cell::Occupied),
        }
    }
}

/// 3x3 tic-tac-toe board, cells in row-major order (0-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Sets the cell at the given index. Out-of-bounds writes are ignored;
    /// callers go through [`rules::validate_move`](super::rules::validate_move)
    /// first.
    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        if let Some(c) = self.cells.get_mut(index) {
            *c = cell;
        }
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Encodes the board as the 9-character string stored in the database.
    pub fn encode(&self) -> String {
        self.cells.iter().map(|c| c.as_char()).collect()
    }

    /// Decodes a board from its stored 9-character string. Returns `None`
    /// if the string is not exactly 9 valid cell characters.
    pub fn decode(s: &str) -> Option<Self> {
        let mut cells = [Cell::Empty; 9];
        let mut chars = s.chars();
        for cell in &mut cells {
            *cell = Cell::from_char(chars.next()?)?;
        }
        if chars.next().is_some() {
            return None;
        }
        Some(Self { cells })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with a winner.
    Won,
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// The string stored in the database for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Draw => "draw",
        }
    }

    /// Parses a status from its stored string.
    pub fn from_str_db(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(GameStatus::InProgress),
            "won" => Some(GameStatus::Won),
            "draw" => Some(GameStatus::Draw),
            _ => None,
        }
    }
}

/// A move that has been applied to a game, in the order it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    /// Symbol that made the move.
    pub symbol: Symbol,
    /// Board index 0-8.
    pub position: usize,
    /// Sequential move number starting at 1, no gaps.
    pub move_number: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_encode_decode_round_trip() {
        let mut board = Board::new();
        board.set(0, Cell::Occupied(Symbol::X));
        board.set(4, Cell::Occupied(Symbol::O));
        let encoded = board.encode();
        assert_eq!(encoded, "X   O    ");
        assert_eq!(Board::decode(&encoded), Some(board));
    }

    #[test]
    fn test_board_decode_rejects_bad_length() {
        assert_eq!(Board::decode("XO"), None);
        assert_eq!(Board::decode("XOXOXOXOX "), None);
    }

    #[test]
    fn test_board_decode_rejects_bad_char() {
        assert_eq!(Board::decode("Z        "), None);
    }

    #[test]
    fn test_symbol_opponent() {
        assert_eq!(Symbol::X.opponent(), Symbol::O);
        assert_eq!(Symbol::O.opponent(), Symbol::X);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [GameStatus::InProgress, GameStatus::Won, GameStatus::Draw] {
            assert_eq!(GameStatus::from_str_db(status.as_str()), Some(status));
        }
        assert_eq!(GameStatus::from_str_db("finished"), None);
    }
}
