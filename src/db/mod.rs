//! Database persistence layer for players, games, and moves.

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{Game, GameRecord, Move, NewGame, NewMove, NewPlayer, Player};
pub use repository::GameRepository;

/// Embedded migrations, applied at startup and by test harnesses.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
