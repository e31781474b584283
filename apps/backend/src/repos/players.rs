//! Roster repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::players_sea as players_adapter;
use crate::entities::game_players;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use players_adapter::PlayerCreate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: i64,
    pub game_id: i64,
    pub player_id: String,
    pub username: String,
    pub score: i32,
    pub correct_guesses: i32,
    pub is_host: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl From<game_players::Model> for Player {
    fn from(m: game_players::Model) -> Self {
        Self {
            id: m.id,
            game_id: m.game_id,
            player_id: m.player_id,
            username: m.username,
            score: m.score,
            correct_guesses: m.correct_guesses,
            is_host: m.is_host,
            joined_at: m.joined_at,
        }
    }
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<Player, DomainError> {
    Ok(Player::from(players_adapter::create_player(conn, dto).await?))
}

pub async fn find_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
) -> Result<Option<Player>, DomainError> {
    Ok(players_adapter::find_player(conn, game_id, player_id)
        .await?
        .map(Player::from))
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
) -> Result<Player, DomainError> {
    find_player(conn, game_id, player_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Player,
            format!("Player {player_id} is not in game {game_id}"),
        )
    })
}

/// Players in join order.
pub async fn list_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Player>, DomainError> {
    Ok(players_adapter::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(Player::from)
        .collect())
}

pub async fn count_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(players_adapter::count_by_game(conn, game_id).await?)
}

/// Relative score increment. `points` must be non-negative.
pub async fn add_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
    points: i32,
    correct_guess: bool,
) -> Result<(), DomainError> {
    debug_assert!(points >= 0, "scores never decrease");
    let rows = players_adapter::add_score(
        conn,
        game_id,
        player_id,
        points.max(0),
        i32::from(correct_guess),
    )
    .await?;
    if rows == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            format!("Player {player_id} is not in game {game_id}"),
        ));
    }
    Ok(())
}

pub async fn remove_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
) -> Result<bool, DomainError> {
    Ok(players_adapter::delete_player(conn, game_id, player_id).await? == 1)
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    players_adapter::delete_by_game(conn, game_id).await?;
    Ok(())
}
