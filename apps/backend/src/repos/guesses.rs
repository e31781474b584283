//! Guess log repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::guesses_sea as guesses_adapter;
use crate::entities::guesses;
use crate::errors::domain::DomainError;

pub use guesses_adapter::GuessCreate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guess {
    pub id: i64,
    pub game_id: i64,
    pub turn_id: i64,
    pub player_id: String,
    pub guess_text: String,
    pub is_correct: bool,
    pub is_fuzzy_match: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

impl From<guesses::Model> for Guess {
    fn from(m: guesses::Model) -> Self {
        Self {
            id: m.id,
            game_id: m.game_id,
            turn_id: m.turn_id,
            player_id: m.player_id,
            guess_text: m.guess_text,
            is_correct: m.is_correct,
            is_fuzzy_match: m.is_fuzzy_match,
            submitted_at: m.submitted_at,
        }
    }
}

pub async fn record_guess<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GuessCreate,
) -> Result<Guess, DomainError> {
    Ok(Guess::from(guesses_adapter::insert_guess(conn, dto).await?))
}

pub async fn list_by_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
) -> Result<Vec<Guess>, DomainError> {
    Ok(guesses_adapter::list_by_turn(conn, turn_id)
        .await?
        .into_iter()
        .map(Guess::from)
        .collect())
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    guesses_adapter::delete_by_game(conn, game_id).await?;
    Ok(())
}
