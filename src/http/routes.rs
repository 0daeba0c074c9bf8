//! Axum router and request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, instrument};

use crate::http::error::ApiError;
use crate::http::schemas::{
    GameCreate, GameOut, GamesListOut, HealthOut, MoveCreate, PlayerCreate, PlayerOut,
};
use crate::service::GameService;

/// Builds the application router over the given service.
pub fn router(service: GameService) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/players", post(create_player))
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/moves", post(submit_move))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// `GET /` - health check.
async fn health_check() -> Json<HealthOut> {
    Json(HealthOut { message: "Healthy" })
}

/// `POST /players` - create a player with a unique name.
#[instrument(skip(service, payload), fields(name = %payload.name))]
async fn create_player(
    State(service): State<GameService>,
    Json(payload): Json<PlayerCreate>,
) -> Result<(StatusCode, Json<PlayerOut>), ApiError> {
    debug!("Handling create player");
    let player = service.create_player(&payload.name)?;
    Ok((
        StatusCode::CREATED,
        Json(PlayerOut {
            id: *player.id(),
            name: player.name().clone(),
            created_at: *player.created_at(),
        }),
    ))
}

/// `POST /games` - start a new game, creating missing players by name.
#[instrument(skip(service, payload))]
async fn create_game(
    State(service): State<GameService>,
    Json(payload): Json<GameCreate>,
) -> Result<(StatusCode, Json<GameOut>), ApiError> {
    debug!("Handling create game");
    let record = service.create_game(
        payload.player_x_name.as_deref(),
        payload.player_o_name.as_deref(),
    )?;
    Ok((StatusCode::CREATED, Json(GameOut::from_record(&record)?)))
}

/// `GET /games/{id}` - fetch a game with its moves and players.
#[instrument(skip(service))]
async fn get_game(
    State(service): State<GameService>,
    Path(id): Path<i32>,
) -> Result<Json<GameOut>, ApiError> {
    debug!(game_id = id, "Handling get game");
    let record = service.get_game(id)?;
    Ok(Json(GameOut::from_record(&record)?))
}

/// `GET /games` - list recent games, newest first, capped at 50.
#[instrument(skip(service))]
async fn list_games(
    State(service): State<GameService>,
) -> Result<Json<GamesListOut>, ApiError> {
    debug!("Handling list games");
    let records = service.list_recent_games()?;
    let items = records
        .iter()
        .map(GameOut::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(GamesListOut { items }))
}

/// `POST /games/{id}/moves` - submit a move and return the updated game.
#[instrument(skip(service, payload), fields(position = payload.position, player = %payload.player))]
async fn submit_move(
    State(service): State<GameService>,
    Path(id): Path<i32>,
    Json(payload): Json<MoveCreate>,
) -> Result<Json<GameOut>, ApiError> {
    debug!(game_id = id, "Handling submit move");
    let record = service.submit_move(id, payload.player, payload.position)?;
    Ok(Json(GameOut::from_record(&record)?))
}
