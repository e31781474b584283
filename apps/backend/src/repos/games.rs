//! Game repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games::{self, GameStatus};
use crate::errors::domain::DomainError;

pub use games_adapter::{GameCreate, GameUpdate};

/// Game domain model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: i64,
    pub join_code: String,
    pub status: GameStatus,
    pub category: String,
    pub created_by: String,
    pub current_drawer_id: Option<String>,
    pub current_card_id: Option<i64>,
    pub round: i32,
    pub max_rounds: i32,
    pub version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
}

impl Game {
    pub fn is_current_drawer(&self, user_id: &str) -> bool {
        self.current_drawer_id.as_deref() == Some(user_id)
    }
}

impl From<games::Model> for Game {
    fn from(m: games::Model) -> Self {
        Self {
            id: m.id,
            join_code: m.join_code,
            status: m.status,
            category: m.category,
            created_by: m.created_by,
            current_drawer_id: m.current_drawer_id,
            current_card_id: m.current_card_id,
            round: m.round,
            max_rounds: m.max_rounds,
            version: m.version,
            created_at: m.created_at,
            started_at: m.started_at,
            finished_at: m.finished_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    Ok(games_adapter::find_by_id(conn, game_id).await?.map(Game::from))
}

pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    Ok(Game::from(games_adapter::require_game(conn, game_id).await?))
}

pub async fn find_by_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<Option<Game>, DomainError> {
    Ok(games_adapter::find_by_join_code(conn, join_code)
        .await?
        .map(Game::from))
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<Game, DomainError> {
    Ok(Game::from(games_adapter::create_game(conn, dto).await?))
}

/// Version-guarded update; a stale `expected_version` yields `Conflict(OptimisticLock)`.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<Game, DomainError> {
    Ok(Game::from(games_adapter::update_game(conn, dto).await?))
}

pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    games_adapter::delete_game(conn, game_id).await?;
    Ok(())
}
