//! Database connection management

use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};

/// Upper bound on pooled connections; gate traffic is bursty but short-lived.
const MAX_CONNECTIONS: u32 = 20;

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Apply pending schema migrations from the workspace `migrations/` directory.
///
/// # Errors
///
/// Returns an error if a migration fails or the applied history has diverged.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
