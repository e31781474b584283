use std::env;

use crate::error::AppError;

/// Which database the process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// Production Postgres database
    Prod,
    /// Postgres test database; name must end in `_test`
    Test,
    /// Private SQLite in-memory database, one per pool
    InMemory,
}

impl DbProfile {
    /// Resolve the profile from `DRAWGUESS_DB` (`postgres` | `postgres-test` | `sqlite-memory`).
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("DRAWGUESS_DB").as_deref() {
            Err(_) | Ok("postgres") => Ok(DbProfile::Prod),
            Ok("postgres-test") => Ok(DbProfile::Test),
            Ok("sqlite-memory") => Ok(DbProfile::InMemory),
            Ok(other) => Err(AppError::config(format!(
                "Unknown DRAWGUESS_DB value '{other}' (expected postgres, postgres-test or sqlite-memory)"
            ))),
        }
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, DbProfile::InMemory)
    }
}

/// Builds a database URL from environment variables for the given profile.
pub fn db_url(profile: DbProfile) -> Result<String, AppError> {
    if profile == DbProfile::InMemory {
        return Ok("sqlite::memory:".to_string());
    }

    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = port()?;
    let db_name = db_name(profile)?;
    let username = must_var("APP_DB_USER")?;
    let password = must_var("APP_DB_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn port() -> Result<u16, AppError> {
    match env::var("POSTGRES_PORT") {
        Err(_) => Ok(5432),
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("POSTGRES_PORT must be a port number, got '{raw}'"))),
    }
}

fn db_name(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => must_var("PROD_DB"),
        DbProfile::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
        DbProfile::InMemory => Ok(String::new()),
    }
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
