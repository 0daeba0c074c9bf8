//! Database models for players, games, and moves.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::{DbError, schema};
use crate::game::{AppliedMove, Board, GameState, GameStatus, Symbol};

/// Player database model. Players are created once and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: i32,
    name: String,
    created_at: NaiveDateTime,
}

/// Insertable player model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    name: String,
}

/// Game database model.
///
/// The board is stored as a 9-character string over `' '`/`'X'`/`'O'`,
/// status as `in_progress`/`won`/`draw`, symbols as `X`/`O`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct Game {
    id: i32,
    board: String,
    next_player: String,
    status: String,
    winner: Option<String>,
    player_x_id: Option<i32>,
    player_o_id: Option<i32>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Game {
    /// Rebuilds the in-memory [`GameState`] from this row and its ordered
    /// move rows.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any stored field fails to parse, which means
    /// the row was written by something other than this backend.
    pub fn to_state(&self, moves: &[Move]) -> Result<GameState, DbError> {
        let board = Board::decode(&self.board)
            .ok_or_else(|| DbError::new(format!("Invalid board string: '{}'", self.board)))?;
        let next_player = parse_symbol(&self.next_player)?;
        let status = GameStatus::from_str_db(&self.status)
            .ok_or_else(|| DbError::new(format!("Invalid status: '{}'", self.status)))?;
        let winner = self.winner.as_deref().map(parse_symbol).transpose()?;

        let mut history = Vec::with_capacity(moves.len());
        for mv in moves {
            history.push(AppliedMove {
                symbol: parse_symbol(&mv.player_symbol)?,
                position: usize::try_from(mv.position)
                    .map_err(|_| DbError::new(format!("Invalid position: {}", mv.position)))?,
                move_number: mv.move_number,
            });
        }

        Ok(GameState::from_parts(board, next_player, status, winner, history))
    }
}

/// Insertable game model. Board, turn, and status come from the schema
/// defaults (empty board, X to move, in progress).
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    player_x_id: Option<i32>,
    player_o_id: Option<i32>,
}

/// Move database model. Moves are immutable once created.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Associations, Selectable, Getters,
)]
#[diesel(table_name = schema::moves)]
#[diesel(belongs_to(Game))]
pub struct Move {
    id: i32,
    game_id: i32,
    player_symbol: String,
    position: i32,
    move_number: i32,
    created_at: NaiveDateTime,
}

/// Insertable move model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMove {
    game_id: i32,
    player_symbol: String,
    position: i32,
    move_number: i32,
}

impl NewMove {
    /// Builds the insertable row for a move the state machine just applied.
    pub fn from_applied(game_id: i32, mv: &AppliedMove) -> Self {
        Self::new(
            game_id,
            mv.symbol.as_char().to_string(),
            mv.position as i32,
            mv.move_number,
        )
    }
}

/// A game row together with its ordered moves and player references.
#[derive(Debug, Clone, Getters, new)]
pub struct GameRecord {
    game: Game,
    moves: Vec<Move>,
    player_x: Option<Player>,
    player_o: Option<Player>,
}

fn parse_symbol(s: &str) -> Result<Symbol, DbError> {
    let mut chars = s.chars();
    match (chars.next().and_then(Symbol::from_char), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(DbError::new(format!("Invalid symbol: '{}'", s))),
    }
}
