//! Database repository for players, games, and moves.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{DbError, Game, GameRecord, Move, NewGame, NewMove, NewPlayer, Player, schema};
use crate::game::{AppliedMove, GameState};

/// Database repository for all game persistence operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection with foreign keys enabled.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Creates a new player. The `name` UNIQUE constraint rejects duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is already taken or a database error
    /// occurs.
    #[instrument(skip(self))]
    pub fn create_player(&self, name: &str) -> Result<Player, DbError> {
        debug!(name = %name, "Creating player");
        let mut conn = self.connection()?;

        let player = diesel::insert_into(schema::players::table)
            .values(&NewPlayer::new(name.to_string()))
            .returning(Player::as_returning())
            .get_result(&mut conn)?;

        info!(player_id = player.id(), name = %player.name(), "Player created");
        Ok(player)
    }

    /// Gets a player by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_player_by_name(&self, name: &str) -> Result<Option<Player>, DbError> {
        debug!(name = %name, "Looking up player by name");
        let mut conn = self.connection()?;

        let player = schema::players::table
            .filter(schema::players::name.eq(name))
            .first::<Player>(&mut conn)
            .optional()?;

        if let Some(ref p) = player {
            debug!(player_id = p.id(), "Player found");
        } else {
            debug!("Player not found");
        }

        Ok(player)
    }

    /// Creates a new game with an empty board, X to move, in progress.
    /// Player references are optional and held by identity only.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn create_game(
        &self,
        player_x_id: Option<i32>,
        player_o_id: Option<i32>,
    ) -> Result<GameRecord, DbError> {
        debug!(?player_x_id, ?player_o_id, "Creating game");
        let mut conn = self.connection()?;

        let game = diesel::insert_into(schema::games::table)
            .values(&NewGame::new(player_x_id, player_o_id))
            .returning(Game::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = game.id(), "Game created");
        load_record(&mut conn, game)
    }

    /// Gets a game with its ordered moves and player references.
    /// Returns `None` if no game has the given id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: i32) -> Result<Option<GameRecord>, DbError> {
        debug!(game_id = id, "Loading game");
        let mut conn = self.connection()?;

        let game = schema::games::table
            .find(id)
            .first::<Game>(&mut conn)
            .optional()?;

        match game {
            Some(game) => Ok(Some(load_record(&mut conn, game)?)),
            None => {
                debug!(game_id = id, "Game not found");
                Ok(None)
            }
        }
    }

    /// Lists recent games ordered by creation time descending, each with
    /// moves and players loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_recent_games(&self, limit: i64) -> Result<Vec<GameRecord>, DbError> {
        debug!(limit, "Listing recent games");
        let mut conn = self.connection()?;

        let games = schema::games::table
            .order((
                schema::games::created_at.desc(),
                schema::games::id.desc(),
            ))
            .limit(limit)
            .load::<Game>(&mut conn)?;

        let mut records = Vec::with_capacity(games.len());
        for game in games {
            records.push(load_record(&mut conn, game)?);
        }

        info!(count = records.len(), "Recent games loaded");
        Ok(records)
    }

    /// Persists a move submission atomically: updates the game row and
    /// inserts the move row in one transaction.
    ///
    /// The update is guarded on the board, status, and next player the state
    /// machine read (`prior`), so a concurrent submission that already
    /// advanced the game cannot be overwritten from a stale read. When the
    /// guard misses, the transaction rolls back and the conflict surfaces as
    /// an ordinary error; no retry happens here.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on a stale write or any database error.
    #[instrument(skip(self, prior, state, mv), fields(game_id = prior.id(), move_number = mv.move_number))]
    pub fn save_game_transition(
        &self,
        prior: &Game,
        state: &GameState,
        mv: &AppliedMove,
    ) -> Result<(), DbError> {
        debug!(game_id = prior.id(), position = mv.position, "Saving game transition");
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let updated = diesel::update(
                schema::games::table
                    .filter(schema::games::id.eq(prior.id()))
                    .filter(schema::games::board.eq(prior.board().as_str()))
                    .filter(schema::games::status.eq(prior.status().as_str()))
                    .filter(schema::games::next_player.eq(prior.next_player().as_str())),
            )
            .set((
                schema::games::board.eq(state.board().encode()),
                schema::games::next_player.eq(state.next_player().as_char().to_string()),
                schema::games::status.eq(state.status().as_str()),
                schema::games::winner.eq(state.winner().map(|s| s.as_char().to_string())),
                schema::games::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

            if updated != 1 {
                return Err(DbError::new(format!(
                    "Game {} was modified concurrently",
                    prior.id()
                )));
            }

            diesel::insert_into(schema::moves::table)
                .values(&NewMove::from_applied(*prior.id(), mv))
                .execute(conn)?;

            Ok(())
        })?;

        info!(
            game_id = prior.id(),
            move_number = mv.move_number,
            status = state.status().as_str(),
            "Game transition saved"
        );
        Ok(())
    }
}

/// Loads the moves and player references for a game row.
fn load_record(conn: &mut SqliteConnection, game: Game) -> Result<GameRecord, DbError> {
    let moves = Move::belonging_to(&game)
        .order(schema::moves::move_number.asc())
        .load::<Move>(conn)?;

    let player_x = load_player(conn, *game.player_x_id())?;
    let player_o = load_player(conn, *game.player_o_id())?;

    Ok(GameRecord::new(game, moves, player_x, player_o))
}

fn load_player(conn: &mut SqliteConnection, id: Option<i32>) -> Result<Option<Player>, DbError> {
    match id {
        Some(id) => Ok(schema::players::table
            .find(id)
            .first::<Player>(conn)
            .optional()?),
        None => Ok(None),
    }
}
