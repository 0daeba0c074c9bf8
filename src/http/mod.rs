//! HTTP transport layer: axum router, request/response schemas, and error
//! mapping.

mod error;
mod routes;
mod schemas;

pub use error::ApiError;
pub use routes::router;
pub use schemas::{
    GameCreate, GameOut, GamesListOut, HealthOut, MoveCreate, MoveOut, PlayerCreate, PlayerOut,
};
