//! Turn repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::adapters::turns_sea as turns_adapter;
use crate::entities::turns::{self, TurnStatus};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use turns_adapter::{TurnCreate, TurnFinish};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub id: i64,
    pub game_id: i64,
    pub round: i32,
    pub drawer_id: String,
    pub card_id: i64,
    pub status: TurnStatus,
    pub time_limit: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub correct_guesses: i32,
    pub winner_id: Option<String>,
    pub points_awarded: i32,
    pub drawer_points_awarded: i32,
    pub drawing_ref: Option<String>,
}

impl Turn {
    /// Server-side deadline; none until the first stroke starts the clock.
    pub fn deadline(&self) -> Option<OffsetDateTime> {
        self.started_at
            .map(|at| at + Duration::seconds(i64::from(self.time_limit)))
    }

    /// Whole seconds left on the clock at `now`, clamped to `[0, time_limit]`.
    /// A turn whose clock has not started has its full time left.
    pub fn remaining_seconds(&self, now: OffsetDateTime) -> i32 {
        match self.deadline() {
            None => self.time_limit,
            Some(deadline) => {
                let left = (deadline - now).whole_seconds();
                left.clamp(0, i64::from(self.time_limit)) as i32
            }
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }
}

impl From<turns::Model> for Turn {
    fn from(m: turns::Model) -> Self {
        Self {
            id: m.id,
            game_id: m.game_id,
            round: m.round,
            drawer_id: m.drawer_id,
            card_id: m.card_id,
            status: m.status,
            time_limit: m.time_limit,
            started_at: m.started_at,
            completed_at: m.completed_at,
            correct_guesses: m.correct_guesses,
            winner_id: m.winner_id,
            points_awarded: m.points_awarded,
            drawer_points_awarded: m.drawer_points_awarded,
            drawing_ref: m.drawing_ref,
        }
    }
}

pub async fn create_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TurnCreate,
) -> Result<Turn, DomainError> {
    Ok(Turn::from(turns_adapter::create_turn(conn, dto).await?))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
) -> Result<Option<Turn>, DomainError> {
    Ok(turns_adapter::find_by_id(conn, turn_id).await?.map(Turn::from))
}

pub async fn require_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
) -> Result<Turn, DomainError> {
    find_by_id(conn, turn_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Turn, format!("Turn {turn_id} not found")))
}

pub async fn find_active_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Turn>, DomainError> {
    Ok(turns_adapter::find_active_for_game(conn, game_id)
        .await?
        .map(Turn::from))
}

pub async fn find_latest_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Turn>, DomainError> {
    Ok(turns_adapter::find_latest_for_game(conn, game_id)
        .await?
        .map(Turn::from))
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Turn>, DomainError> {
    Ok(turns_adapter::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(Turn::from)
        .collect())
}

pub async fn drawers_in_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
) -> Result<Vec<String>, DomainError> {
    Ok(turns_adapter::drawers_in_round(conn, game_id, round).await?)
}

pub async fn first_drawer_in_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
) -> Result<Option<String>, DomainError> {
    Ok(turns_adapter::first_drawer_in_round(conn, game_id, round).await?)
}

pub async fn mark_started<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
    now: OffsetDateTime,
) -> Result<bool, DomainError> {
    Ok(turns_adapter::mark_started(conn, turn_id, now).await?)
}

pub async fn claim_from_drawing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
    to: TurnStatus,
) -> Result<bool, DomainError> {
    Ok(turns_adapter::claim_from_drawing(conn, turn_id, to).await?)
}

pub async fn finish_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TurnFinish,
) -> Result<bool, DomainError> {
    Ok(turns_adapter::finish_turn(conn, dto).await?)
}

pub async fn set_drawing_ref<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
    reference: &str,
) -> Result<(), DomainError> {
    turns_adapter::set_drawing_ref(conn, turn_id, reference).await?;
    Ok(())
}

pub async fn list_drawing_refs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<String>, DomainError> {
    Ok(turns_adapter::list_drawing_refs(conn, game_id).await?)
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    turns_adapter::delete_by_game(conn, game_id).await?;
    Ok(())
}
