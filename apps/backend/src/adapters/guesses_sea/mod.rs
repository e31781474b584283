//! SeaORM adapter for the append-only guess log.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::guesses;

#[derive(Debug, Clone)]
pub struct GuessCreate {
    pub game_id: i64,
    pub turn_id: i64,
    pub player_id: String,
    pub guess_text: String,
    pub is_correct: bool,
    pub is_fuzzy_match: bool,
    pub now: OffsetDateTime,
}

pub async fn insert_guess<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GuessCreate,
) -> Result<guesses::Model, sea_orm::DbErr> {
    let guess = guesses::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        turn_id: Set(dto.turn_id),
        player_id: Set(dto.player_id),
        guess_text: Set(dto.guess_text),
        is_correct: Set(dto.is_correct),
        is_fuzzy_match: Set(dto.is_fuzzy_match),
        submitted_at: Set(dto.now),
    };
    guess.insert(conn).await
}

pub async fn list_by_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
) -> Result<Vec<guesses::Model>, sea_orm::DbErr> {
    guesses::Entity::find()
        .filter(guesses::Column::TurnId.eq(turn_id))
        .order_by_asc(guesses::Column::Id)
        .all(conn)
        .await
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = guesses::Entity::delete_many()
        .filter(guesses::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
