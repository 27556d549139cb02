//! SQLite schema for adapter tests. Mirrors the production tables closely
//! enough for the sea-orm entities to round-trip.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

const DDL: &str = r#"
CREATE TABLE leagues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    owner_id INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);

CREATE TABLE teams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    league_id INTEGER NOT NULL REFERENCES leagues(id),
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    budget INTEGER NOT NULL
);

CREATE TABLE draft_picks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    league_id INTEGER NOT NULL REFERENCES leagues(id),
    round INTEGER NOT NULL,
    pick_number INTEGER NOT NULL,
    team_id INTEGER NOT NULL REFERENCES teams(id),
    movie_id INTEGER REFERENCES movies(id)
);

CREATE TABLE rosters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    team_id INTEGER NOT NULL REFERENCES teams(id),
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    acquisition_type TEXT NOT NULL,
    UNIQUE (team_id, movie_id)
);

CREATE TABLE transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    league_id INTEGER NOT NULL REFERENCES leagues(id),
    team_id INTEGER NOT NULL REFERENCES teams(id),
    movie_id INTEGER NOT NULL REFERENCES movies(id),
    kind TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    league_id INTEGER NOT NULL,
    read INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
"#;

/// Fresh in-memory database with the full schema applied.
pub async fn connect_memory_db() -> Result<DatabaseConnection, DbErr> {
    // One connection only; pooled connections would each get their own
    // private in-memory database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await?;
    for statement in DDL.split(';').filter(|s| !s.trim().is_empty()) {
        db.execute_unprepared(statement).await?;
    }
    Ok(db)
}
