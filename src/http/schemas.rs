//! Request and response bodies for the HTTP API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::{DbError, GameRecord, Player};
use crate::game::{GameStatus, Symbol};

/// Request body for creating a player.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCreate {
    /// Unique display name, 1-100 characters.
    pub name: String,
}

/// Request body for starting a game. Missing players are created by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameCreate {
    /// Optional player X name.
    #[serde(default)]
    pub player_x_name: Option<String>,
    /// Optional player O name.
    #[serde(default)]
    pub player_o_name: Option<String>,
}

/// Request body for submitting a move.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveCreate {
    /// Board position 0-8.
    pub position: i32,
    /// Symbol of the player making the move.
    pub player: Symbol,
}

/// Player details.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerOut {
    /// Player id.
    pub id: i32,
    /// Player name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

impl PlayerOut {
    fn from_player(player: &Player) -> Self {
        Self {
            id: *player.id(),
            name: player.name().clone(),
            created_at: *player.created_at(),
        }
    }

    fn from_optional(player: Option<&Player>) -> Option<Self> {
        player.map(Self::from_player)
    }
}

/// One recorded move.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOut {
    /// Sequential move number starting at 1.
    pub move_number: i32,
    /// Board position 0-8.
    pub position: i32,
    /// Player symbol.
    pub player: Symbol,
    /// Timestamp when the move was recorded.
    pub created_at: NaiveDateTime,
}

/// Full game state including board, players, and move history.
#[derive(Debug, Clone, Serialize)]
pub struct GameOut {
    /// Game id.
    pub id: i32,
    /// Board as a 9-element list of `" "`, `"X"`, or `"O"`.
    pub board: Vec<String>,
    /// Next player to move. Retains its last value once the game is over.
    pub next_player: Symbol,
    /// Game status.
    pub status: GameStatus,
    /// Winner symbol, present exactly when status is `won`.
    pub winner: Option<Symbol>,
    /// Player X details, if assigned.
    pub player_x: Option<PlayerOut>,
    /// Player O details, if assigned.
    pub player_o: Option<PlayerOut>,
    /// Chronological move history.
    pub moves: Vec<MoveOut>,
}

impl GameOut {
    /// Builds the response body from a loaded game record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored row fails to parse.
    pub fn from_record(record: &GameRecord) -> Result<Self, DbError> {
        let state = record.game().to_state(record.moves())?;

        let moves = state
            .history()
            .iter()
            .zip(record.moves())
            .map(|(mv, row)| MoveOut {
                move_number: mv.move_number,
                position: mv.position as i32,
                player: mv.symbol,
                created_at: *row.created_at(),
            })
            .collect();

        Ok(Self {
            id: *record.game().id(),
            board: state
                .board()
                .cells()
                .iter()
                .map(|c| c.as_char().to_string())
                .collect(),
            next_player: state.next_player(),
            status: state.status(),
            winner: state.winner(),
            player_x: PlayerOut::from_optional(record.player_x().as_ref()),
            player_o: PlayerOut::from_optional(record.player_o().as_ref()),
            moves,
        })
    }
}

/// List of recent games.
#[derive(Debug, Clone, Serialize)]
pub struct GamesListOut {
    /// Games, newest first.
    pub items: Vec<GameOut>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthOut {
    /// Fixed health message.
    pub message: &'static str,
}
