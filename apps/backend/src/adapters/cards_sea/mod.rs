//! SeaORM adapter for the per-game card pool.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::cards;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCreate {
    pub word: String,
    pub description: String,
}

/// Insert a batch of unused cards; returns how many rows were written.
pub async fn insert_cards<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    category: &str,
    batch: Vec<CardCreate>,
    now: OffsetDateTime,
) -> Result<usize, sea_orm::DbErr> {
    if batch.is_empty() {
        return Ok(0);
    }
    let count = batch.len();
    let models = batch.into_iter().map(|c| cards::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        word: Set(c.word),
        description: Set(c.description),
        category: Set(category.to_string()),
        is_used: Set(false),
        created_at: Set(now),
    });
    cards::Entity::insert_many(models).exec(conn).await?;
    Ok(count)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<Option<cards::Model>, sea_orm::DbErr> {
    cards::Entity::find_by_id(card_id).one(conn).await
}

/// Oldest unused card for the game, if any. Insertion order is the tie-break.
pub async fn find_next_unused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<cards::Model>, sea_orm::DbErr> {
    cards::Entity::find()
        .filter(cards::Column::GameId.eq(game_id))
        .filter(cards::Column::IsUsed.eq(false))
        .order_by_asc(cards::Column::Id)
        .one(conn)
        .await
}

/// Conditional `is_used: false -> true`. Returns false when another caller
/// consumed the card first.
pub async fn claim_card<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let result = cards::Entity::update_many()
        .col_expr(cards::Column::IsUsed, Expr::value(true))
        .filter(cards::Column::Id.eq(card_id))
        .filter(cards::Column::IsUsed.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

pub async fn count_unused<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    cards::Entity::find()
        .filter(cards::Column::GameId.eq(game_id))
        .filter(cards::Column::IsUsed.eq(false))
        .count(conn)
        .await
}

/// Every word ever issued to this game, used or not.
pub async fn list_words<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<String>, sea_orm::DbErr> {
    cards::Entity::find()
        .select_only()
        .column(cards::Column::Word)
        .filter(cards::Column::GameId.eq(game_id))
        .order_by_asc(cards::Column::Id)
        .into_tuple::<String>()
        .all(conn)
        .await
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = cards::Entity::delete_many()
        .filter(cards::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
