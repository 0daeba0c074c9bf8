//! Business logic layer tying the rules engine and state machine to the
//! repository.

use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRecord, GameRepository, Player};
use crate::game::{MoveError, Symbol};

/// Maximum player name length, matching the column width.
const MAX_NAME_LEN: usize = 100;

/// Failures surfaced by the service layer.
///
/// Everything except `Db` is a local validation failure reported straight
/// back to the caller; nothing is retried internally.
#[derive(Debug, Display, Error, From)]
pub enum ServiceError {
    /// A player with the requested name already exists.
    #[display("Player name already exists")]
    DuplicateName,
    /// Player name is empty or longer than 100 characters.
    #[display("Player name must be between 1 and 100 characters")]
    InvalidName,
    /// No game with the requested id.
    #[display("Game not found")]
    GameNotFound,
    /// Move rejected by the state machine or rules engine.
    #[from]
    Move(MoveError),
    /// Storage-layer failure, including a lost write race.
    #[from]
    Db(DbError),
}

/// Service layer for player and game operations.
///
/// Wraps [`GameRepository`] with validation, get-or-create player semantics,
/// and the move submission flow: load, transition, persist atomically.
#[derive(Debug, Clone)]
pub struct GameService {
    repository: GameRepository,
}

impl GameService {
    /// Creates a new game service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating GameService");
        Self { repository }
    }

    /// Creates a player with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidName`] or [`ServiceError::DuplicateName`]
    /// on validation failure, [`ServiceError::Db`] on storage failure.
    #[instrument(skip(self))]
    pub fn create_player(&self, name: &str) -> Result<Player, ServiceError> {
        debug!(name = %name, "Creating player");
        validate_name(name)?;

        if self.repository.find_player_by_name(name)?.is_some() {
            debug!(name = %name, "Name already taken");
            return Err(ServiceError::DuplicateName);
        }

        Ok(self.repository.create_player(name)?)
    }

    /// Starts a new game, creating any referenced players that do not exist
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidName`] for an unusable player name,
    /// [`ServiceError::Db`] on storage failure.
    #[instrument(skip(self))]
    pub fn create_game(
        &self,
        player_x_name: Option<&str>,
        player_o_name: Option<&str>,
    ) -> Result<GameRecord, ServiceError> {
        debug!(?player_x_name, ?player_o_name, "Creating game");

        let player_x = player_x_name
            .map(|name| self.get_or_create_player(name))
            .transpose()?;
        let player_o = player_o_name
            .map(|name| self.get_or_create_player(name))
            .transpose()?;

        let record = self.repository.create_game(
            player_x.map(|p| *p.id()),
            player_o.map(|p| *p.id()),
        )?;
        info!(game_id = record.game().id(), "Game started");
        Ok(record)
    }

    /// Gets a game with its moves and player references.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`] if no such game exists.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: i32) -> Result<GameRecord, ServiceError> {
        debug!(game_id = id, "Getting game");
        self.repository
            .get_game(id)?
            .ok_or(ServiceError::GameNotFound)
    }

    /// Lists recent games, newest first, capped at 50.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Db`] on storage failure.
    #[instrument(skip(self))]
    pub fn list_recent_games(&self) -> Result<Vec<GameRecord>, ServiceError> {
        debug!("Listing recent games");
        Ok(self.repository.list_recent_games(50)?)
    }

    /// Submits a move: loads the game, runs the state machine, persists the
    /// transition atomically, and returns the updated game.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`] for an unknown game,
    /// [`ServiceError::Move`] when the move is rejected, [`ServiceError::Db`]
    /// on storage failure (including a concurrent submission winning the
    /// write race).
    #[instrument(skip(self))]
    pub fn submit_move(
        &self,
        game_id: i32,
        symbol: Symbol,
        position: i32,
    ) -> Result<GameRecord, ServiceError> {
        debug!(game_id, %symbol, position, "Submitting move");
        let record = self.get_game(game_id)?;

        let mut state = record.game().to_state(record.moves())?;
        let mv = state.submit_move(symbol, position)?;

        self.repository
            .save_game_transition(record.game(), &state, &mv)?;

        info!(
            game_id,
            move_number = mv.move_number,
            status = state.status().as_str(),
            "Move recorded"
        );
        self.get_game(game_id)
    }

    /// Returns an existing player by name or creates one if not found.
    #[instrument(skip(self))]
    fn get_or_create_player(&self, name: &str) -> Result<Player, ServiceError> {
        validate_name(name)?;

        if let Some(player) = self.repository.find_player_by_name(name)? {
            debug!(player_id = player.id(), "Existing player found");
            return Ok(player);
        }

        info!(name = %name, "Creating new player");
        Ok(self.repository.create_player(name)?)
    }
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(ServiceError::InvalidName);
    }
    Ok(())
}
