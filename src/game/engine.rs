//! Game state machine: applies validated moves and drives the
//! in_progress -> won | draw lifecycle.

use tracing::{debug, instrument};

use super::rules::{self, MoveError};
use super::types::{AppliedMove, Board, Cell, GameStatus, Symbol};

/// In-memory state of a single game.
///
/// Built fresh for a new game or rebuilt from a persisted row plus its move
/// history. The repository is responsible for writing a transitioned state
/// back atomically together with the move that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    next_player: Symbol,
    status: GameStatus,
    winner: Option<Symbol>,
    history: Vec<AppliedMove>,
}

impl GameState {
    /// Creates a fresh game: empty board, X to move, in progress.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            next_player: Symbol::X,
            status: GameStatus::InProgress,
            winner: None,
            history: Vec::new(),
        }
    }

    /// Reassembles a state from persisted parts.
    pub fn from_parts(
        board: Board,
        next_player: Symbol,
        status: GameStatus,
        winner: Option<Symbol>,
        history: Vec<AppliedMove>,
    ) -> Self {
        Self {
            board,
            next_player,
            status,
            winner,
            history,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is. Stale once the game is over.
    pub fn next_player(&self) -> Symbol {
        self.next_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the winner, set exactly when the status is [`GameStatus::Won`].
    pub fn winner(&self) -> Option<Symbol> {
        self.winner
    }

    /// Returns the moves applied so far, in play order.
    pub fn history(&self) -> &[AppliedMove] {
        &self.history
    }

    /// Submits a move for `symbol` at `position`.
    ///
    /// Validates game status, turn order, and cell legality, then writes the
    /// cell, appends the move to the history, and recomputes the status
    /// against the post-move board. When the move wins the game,
    /// `next_player` keeps its last value rather than flipping; it only
    /// advances while the game continues.
    ///
    /// On error the state is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameFinished`], [`MoveError::WrongTurn`],
    /// [`MoveError::OutOfRange`], or [`MoveError::CellOccupied`].
    #[instrument(skip(self), fields(status = ?self.status, next = %self.next_player))]
    pub fn submit_move(
        &mut self,
        symbol: Symbol,
        position: i32,
    ) -> Result<AppliedMove, MoveError> {
        if self.status != GameStatus::InProgress {
            return Err(MoveError::GameFinished);
        }
        if symbol != self.next_player {
            return Err(MoveError::WrongTurn(self.next_player));
        }
        let index = rules::validate_move(&self.board, position)?;

        self.board.set(index, Cell::Occupied(symbol));
        let move_number = self.history.last().map_or(1, |m| m.move_number + 1);
        let mv = AppliedMove {
            symbol,
            position: index,
            move_number,
        };
        self.history.push(mv);

        if let Some(winner) = rules::check_winner(&self.board) {
            self.status = GameStatus::Won;
            self.winner = Some(winner);
        } else if rules::is_draw(&self.board) {
            self.status = GameStatus::Draw;
            self.winner = None;
        } else {
            self.next_player = self.next_player.opponent();
        }

        debug!(
            move_number = mv.move_number,
            position = mv.position,
            status = ?self.status,
            "Move applied"
        );
        Ok(mv)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
