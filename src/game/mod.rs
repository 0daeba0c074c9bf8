//! Pure game domain: board types, rules engine, and state machine.
//!
//! Nothing in this module touches the database or the transport layer; the
//! repository rebuilds a [`GameState`] from persisted rows and writes
//! transitions back.

mod engine;
mod rules;
mod types;

pub use engine::GameState;
pub use rules::{MoveError, check_winner, is_draw, validate_move};
pub use types::{AppliedMove, Board, Cell, GameStatus, Symbol};
