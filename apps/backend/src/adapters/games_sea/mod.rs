//! SeaORM adapter for the games table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::games;

pub mod dto;

pub use dto::{GameCreate, GameUpdate};

fn game_not_found(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("GAME_NOT_FOUND:{id}"))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Like `find_by_id`, but a missing game is an error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
}

pub async fn find_by_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::JoinCode.eq(join_code))
        .one(conn)
        .await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let game = games::ActiveModel {
        id: NotSet,
        join_code: Set(dto.join_code),
        status: Set(games::GameStatus::Waiting),
        category: Set(dto.category),
        created_by: Set(dto.created_by),
        current_drawer_id: Set(None),
        current_card_id: Set(None),
        round: Set(0),
        max_rounds: Set(dto.max_rounds),
        version: Set(1),
        created_at: Set(dto.now),
        updated_at: Set(dto.now),
        started_at: Set(None),
        finished_at: Set(None),
    };

    game.insert(conn).await
}

/// Apply `dto` only if the row still carries `expected_version`, then refetch.
///
/// Zero affected rows means either the game is gone or someone else wrote
/// first; the two are told apart by a follow-up read.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    let mut update = games::Entity::update_many()
        .col_expr(games::Column::UpdatedAt, Expr::value(dto.now))
        .col_expr(games::Column::Version, Expr::col(games::Column::Version).add(1));

    if let Some(status) = dto.status {
        update = update.col_expr(games::Column::Status, Expr::value(status));
    }
    if let Some(round) = dto.round {
        update = update.col_expr(games::Column::Round, Expr::value(round));
    }
    if let Some(drawer) = dto.current_drawer_id {
        update = update.col_expr(games::Column::CurrentDrawerId, Expr::value(drawer));
    }
    if let Some(card) = dto.current_card_id {
        update = update.col_expr(games::Column::CurrentCardId, Expr::value(card));
    }
    if let Some(at) = dto.started_at {
        update = update.col_expr(games::Column::StartedAt, Expr::value(Some(at)));
    }
    if let Some(at) = dto.finished_at {
        update = update.col_expr(games::Column::FinishedAt, Expr::value(Some(at)));
    }

    let result = update
        .filter(games::Column::Id.eq(dto.id))
        .filter(games::Column::Version.eq(dto.expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, dto.id).await? {
            Some(game) => Err(sea_orm::DbErr::Custom(format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                dto.expected_version, game.version
            ))),
            None => Err(game_not_found(dto.id)),
        };
    }

    require_game(conn, dto.id).await
}

pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::delete_many()
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
