//! SeaORM adapter for game_players (the roster).

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::game_players;

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub game_id: i64,
    pub player_id: String,
    pub username: String,
    pub is_host: bool,
    pub now: OffsetDateTime,
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<game_players::Model, sea_orm::DbErr> {
    let player = game_players::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        player_id: Set(dto.player_id),
        username: Set(dto.username),
        score: Set(0),
        correct_guesses: Set(0),
        is_host: Set(dto.is_host),
        joined_at: Set(dto.now),
    };
    player.insert(conn).await
}

pub async fn find_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
) -> Result<Option<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::PlayerId.eq(player_id))
        .one(conn)
        .await
}

/// Roster in join order. Row id is monotonic, so it doubles as the tie-break.
pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_players::Model>, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .order_by_asc(game_players::Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    game_players::Entity::find()
        .filter(game_players::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

/// `score += points`, `correct_guesses += correct` as a single relative write.
pub async fn add_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
    points: i32,
    correct: i32,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_players::Entity::update_many()
        .col_expr(
            game_players::Column::Score,
            Expr::col(game_players::Column::Score).add(points),
        )
        .col_expr(
            game_players::Column::CorrectGuesses,
            Expr::col(game_players::Column::CorrectGuesses).add(correct),
        )
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    player_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_players::Entity::delete_many()
        .filter(game_players::Column::GameId.eq(game_id))
        .filter(game_players::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_players::Entity::delete_many()
        .filter(game_players::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
