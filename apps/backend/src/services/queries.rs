//! Read-only projections. Plain store reads; no state changes.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::repos::cards;
use crate::repos::games::{self, Game};
use crate::repos::guesses::{self, Guess};
use crate::repos::players::{self, Player};
use crate::repos::turns::{self, Turn};

/// A turn as a given viewer may see it.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    #[serde(flatten)]
    pub turn: Turn,
    pub remaining_seconds: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deadline: Option<OffsetDateTime>,
    /// Hidden from guessers until the turn is over
    pub word: Option<String>,
    pub description: Option<String>,
}

pub async fn get_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, AppError> {
    Ok(games::require_game(conn, game_id).await?)
}

pub async fn get_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Player>, AppError> {
    games::require_game(conn, game_id).await?;
    Ok(players::list_players(conn, game_id).await?)
}

/// The active turn, or the most recent one if none is active.
pub async fn get_current_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    viewer_id: &str,
    now: OffsetDateTime,
) -> Result<Option<TurnView>, AppError> {
    games::require_game(conn, game_id).await?;
    let turn = match turns::find_active_for_game(conn, game_id).await? {
        Some(turn) => Some(turn),
        None => turns::find_latest_for_game(conn, game_id).await?,
    };
    let Some(turn) = turn else {
        return Ok(None);
    };

    let reveal = turn.drawer_id == viewer_id || turn.status.is_terminal();
    let (word, description) = if reveal {
        let card = cards::require_card(conn, turn.card_id).await?;
        (Some(card.word), Some(card.description))
    } else {
        (None, None)
    };

    Ok(Some(TurnView {
        remaining_seconds: turn.remaining_seconds(now),
        deadline: turn.deadline(),
        word,
        description,
        turn,
    }))
}

pub async fn get_turn_guesses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
) -> Result<Vec<Guess>, AppError> {
    turns::require_turn(conn, turn_id).await?;
    Ok(guesses::list_by_turn(conn, turn_id).await?)
}
