//! Tic Tac Toe REST API server.

use anyhow::Result;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::MigrationHarness;
use tic_tac_toe_api::{GameRepository, GameService, MIGRATIONS, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tic_tac_toe_api=debug,tower_http=debug".into()),
        )
        .init();

    let db_path = std::env::var("DATABASE_URL").unwrap_or_else(|_| "tic_tac_toe.db".into());

    let mut conn = SqliteConnection::establish(&db_path)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;
    info!(path = %db_path, "Database migrations applied");

    let repository = GameRepository::new(db_path)?;
    let service = GameService::new(repository);
    let app = router(service);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(%host, port, "Server ready");
    axum::serve(listener, app).await?;

    Ok(())
}
