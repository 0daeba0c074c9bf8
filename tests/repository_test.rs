//! Tests for database repository operations.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use tic_tac_toe_api::{GameRepository, GameStatus, Symbol};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

#[test]
fn test_create_player() {
    let (_db, repo) = setup_test_db();
    let player = repo.create_player("Alice").expect("Create failed");
    assert_eq!(player.name(), "Alice");
    assert!(*player.id() > 0);
}

#[test]
fn test_create_player_duplicate_name_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_player("Bob").expect("First create failed");
    let result = repo.create_player("Bob");
    assert!(result.is_err(), "Duplicate name should fail");
}

#[test]
fn test_find_player_by_name() {
    let (_db, repo) = setup_test_db();
    repo.create_player("Carol").expect("Create failed");

    let found = repo.find_player_by_name("Carol").expect("Query failed");
    assert_eq!(found.expect("Player missing").name(), "Carol");

    let missing = repo.find_player_by_name("NoSuchPlayer").expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_create_game_defaults() {
    let (_db, repo) = setup_test_db();
    let record = repo.create_game(None, None).expect("Create failed");

    assert_eq!(record.game().board(), "         ");
    assert_eq!(record.game().next_player(), "X");
    assert_eq!(record.game().status(), "in_progress");
    assert!(record.game().winner().is_none());
    assert!(record.moves().is_empty());
    assert!(record.player_x().is_none());
    assert!(record.player_o().is_none());
}

#[test]
fn test_create_game_with_players() {
    let (_db, repo) = setup_test_db();
    let alice = repo.create_player("Alice").expect("Create failed");
    let bob = repo.create_player("Bob").expect("Create failed");

    let record = repo
        .create_game(Some(*alice.id()), Some(*bob.id()))
        .expect("Create failed");

    assert_eq!(
        record.player_x().as_ref().map(|p| p.name().as_str()),
        Some("Alice")
    );
    assert_eq!(
        record.player_o().as_ref().map(|p| p.name().as_str()),
        Some("Bob")
    );
}

#[test]
fn test_get_game_not_found() {
    let (_db, repo) = setup_test_db();
    let result = repo.get_game(9999).expect("Query failed");
    assert!(result.is_none());
}

#[test]
fn test_list_recent_games_newest_first() {
    let (_db, repo) = setup_test_db();
    let first = repo.create_game(None, None).expect("Create failed");
    let second = repo.create_game(None, None).expect("Create failed");
    let third = repo.create_game(None, None).expect("Create failed");

    let games = repo.list_recent_games(50).expect("List failed");
    assert_eq!(games.len(), 3);
    assert_eq!(games[0].game().id(), third.game().id());
    assert_eq!(games[1].game().id(), second.game().id());
    assert_eq!(games[2].game().id(), first.game().id());
}

#[test]
fn test_list_recent_games_honors_limit() {
    let (_db, repo) = setup_test_db();
    for _ in 0..5 {
        repo.create_game(None, None).expect("Create failed");
    }
    let games = repo.list_recent_games(3).expect("List failed");
    assert_eq!(games.len(), 3);
}

#[test]
fn test_save_game_transition_persists_move_and_state() {
    let (_db, repo) = setup_test_db();
    let record = repo.create_game(None, None).expect("Create failed");

    let mut state = record
        .game()
        .to_state(record.moves())
        .expect("State rebuild failed");
    let mv = state.submit_move(Symbol::X, 4).expect("Move rejected");

    repo.save_game_transition(record.game(), &state, &mv)
        .expect("Save failed");

    let reloaded = repo
        .get_game(*record.game().id())
        .expect("Query failed")
        .expect("Game missing");
    assert_eq!(reloaded.game().board(), "    X    ");
    assert_eq!(reloaded.game().next_player(), "O");
    assert_eq!(reloaded.moves().len(), 1);
    assert_eq!(*reloaded.moves()[0].position(), 4);
    assert_eq!(*reloaded.moves()[0].move_number(), 1);
    assert_eq!(reloaded.moves()[0].player_symbol(), "X");
}

#[test]
fn test_save_game_transition_rejects_stale_write() {
    let (_db, repo) = setup_test_db();
    let record = repo.create_game(None, None).expect("Create failed");

    // Two submissions computed from the same prior snapshot
    let mut state_a = record.game().to_state(record.moves()).expect("State failed");
    let mv_a = state_a.submit_move(Symbol::X, 0).expect("Move rejected");
    let mut state_b = record.game().to_state(record.moves()).expect("State failed");
    let mv_b = state_b.submit_move(Symbol::X, 1).expect("Move rejected");

    repo.save_game_transition(record.game(), &state_a, &mv_a)
        .expect("First save failed");
    let result = repo.save_game_transition(record.game(), &state_b, &mv_b);
    assert!(result.is_err(), "Stale write should be rejected");

    // The losing write left nothing behind
    let reloaded = repo
        .get_game(*record.game().id())
        .expect("Query failed")
        .expect("Game missing");
    assert_eq!(reloaded.game().board(), "X        ");
    assert_eq!(reloaded.moves().len(), 1);
}

#[test]
fn test_game_round_trips_through_state() {
    let (_db, repo) = setup_test_db();
    let record = repo.create_game(None, None).expect("Create failed");

    let mut record = record;
    for (symbol, position) in [(Symbol::X, 0), (Symbol::O, 4), (Symbol::X, 1)] {
        let mut state = record.game().to_state(record.moves()).expect("State failed");
        let mv = state.submit_move(symbol, position).expect("Move rejected");
        repo.save_game_transition(record.game(), &state, &mv)
            .expect("Save failed");
        record = repo
            .get_game(*record.game().id())
            .expect("Query failed")
            .expect("Game missing");
    }

    let state = record.game().to_state(record.moves()).expect("State failed");
    assert_eq!(state.status(), GameStatus::InProgress);
    assert_eq!(state.next_player(), Symbol::O);
    let numbers: Vec<i32> = state.history().iter().map(|m| m.move_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}
