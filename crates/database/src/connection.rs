use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Establishes a connection pool to the SQLite database.
///
/// Reads `DATABASE_URL` from the environment (a `.env` file is honoured when
/// present), creates the database file on first run, and returns a pool that
/// can be shared across the entire application.
pub async fn connect() -> Result<SqlitePool, DbError> {
    // Load environment variables from the .env file, if one exists.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfig("DATABASE_URL must be set.".to_string()))?;

    connect_with(&database_url).await
}

/// Establishes a connection pool for an explicit database URL.
///
/// Split out of [`connect`] so tests can point at `sqlite::memory:` without
/// touching the process environment.
pub async fn connect_with(database_url: &str) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to an in-memory database is its own database, so the
    // pool must never grow past one connection there.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 10 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// This is called on startup so the schema is always up-to-date, which is
/// especially important for a single-file SQLite deployment.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
