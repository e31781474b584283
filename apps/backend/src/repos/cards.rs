//! Card pool repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::cards_sea as cards_adapter;
use crate::entities::cards;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use cards_adapter::CardCreate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: i64,
    pub game_id: i64,
    pub word: String,
    pub description: String,
    pub category: String,
    pub is_used: bool,
}

impl From<cards::Model> for Card {
    fn from(m: cards::Model) -> Self {
        Self {
            id: m.id,
            game_id: m.game_id,
            word: m.word,
            description: m.description,
            category: m.category,
            is_used: m.is_used,
        }
    }
}

pub async fn insert_cards<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    category: &str,
    batch: Vec<CardCreate>,
    now: OffsetDateTime,
) -> Result<usize, DomainError> {
    Ok(cards_adapter::insert_cards(conn, game_id, category, batch, now).await?)
}

pub async fn require_card<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<Card, DomainError> {
    cards_adapter::find_by_id(conn, card_id)
        .await?
        .map(Card::from)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Card, format!("Card {card_id} not found")))
}

pub async fn find_next_unused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Card>, DomainError> {
    Ok(cards_adapter::find_next_unused(conn, game_id)
        .await?
        .map(Card::from))
}

/// Conditional mark-used; false means the card was already taken.
pub async fn claim_card<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<bool, DomainError> {
    Ok(cards_adapter::claim_card(conn, card_id).await?)
}

pub async fn count_unused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(cards_adapter::count_unused(conn, game_id).await?)
}

pub async fn list_words<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<String>, DomainError> {
    Ok(cards_adapter::list_words(conn, game_id).await?)
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    cards_adapter::delete_by_game(conn, game_id).await?;
    Ok(())
}
