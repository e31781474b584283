use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Open a connection pool for `profile`. Does NOT run migrations.
pub async fn connect_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile)?;
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);

    if profile.is_sqlite() {
        // Every in-memory connection is its own database: pin the pool to one
        // long-lived connection so migrations and queries see the same schema.
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(24 * 60 * 60))
            .max_lifetime(Duration::from_secs(24 * 60 * 60));
    } else {
        opts.max_connections(20)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
            .acquire_timeout(Duration::from_secs(5));
    }

    let conn = Database::connect(opts).await?;

    if profile.is_sqlite() {
        conn.execute(Statement::from_string(
            conn.get_database_backend(),
            "PRAGMA foreign_keys = ON;",
        ))
        .await?;
    }

    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    info!(profile = ?profile, "bootstrap=start");
    let conn = connect_db(profile).await?;
    migration::migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migrations failed: {e}")))?;
    info!(profile = ?profile, "bootstrap=ready");
    Ok(conn)
}
