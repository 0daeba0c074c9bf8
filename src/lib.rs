//! Tic-tac-toe backend library.
//!
//! # Architecture
//!
//! - **game**: pure rules engine and state machine, no I/O
//! - **db**: diesel/SQLite repository with typed models
//! - **service**: business logic tying the state machine to persistence
//! - **http**: axum REST transport
//!
//! A move submission flows repository -> state machine -> repository: the
//! game row and its moves are loaded into a [`GameState`], the move is
//! validated and applied in memory, and the transition is written back in a
//! single guarded transaction.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod db;
mod game;
mod http;
mod service;

// Crate-level exports - persistence
pub use db::{DbError, Game, GameRecord, GameRepository, MIGRATIONS, Move, Player};

// Crate-level exports - game domain
pub use game::{
    AppliedMove, Board, Cell, GameState, GameStatus, MoveError, Symbol, check_winner, is_draw,
    validate_move,
};

// Crate-level exports - service layer
pub use service::{GameService, ServiceError};

// Crate-level exports - HTTP transport
pub use http::{
    ApiError, GameCreate, GameOut, GamesListOut, HealthOut, MoveCreate, MoveOut, PlayerCreate,
    PlayerOut, router,
};
