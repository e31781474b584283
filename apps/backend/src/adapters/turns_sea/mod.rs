//! SeaORM adapter for turns.
//!
//! Status changes are conditional updates: a write only lands if the row is
//! still in the status the caller observed, and `rows_affected` reports who won.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::turns::{self, TurnStatus};

pub mod dto;

pub use dto::{TurnCreate, TurnFinish};

pub async fn create_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TurnCreate,
) -> Result<turns::Model, sea_orm::DbErr> {
    let turn = turns::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        round: Set(dto.round),
        drawer_id: Set(dto.drawer_id),
        card_id: Set(dto.card_id),
        status: Set(TurnStatus::Drawing),
        time_limit: Set(dto.time_limit),
        started_at: Set(None),
        completed_at: Set(None),
        correct_guesses: Set(0),
        winner_id: Set(None),
        points_awarded: Set(0),
        drawer_points_awarded: Set(0),
        drawing_ref: Set(None),
        created_at: Set(dto.now),
    };
    turn.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
) -> Result<Option<turns::Model>, sea_orm::DbErr> {
    turns::Entity::find_by_id(turn_id).one(conn).await
}

/// The turn in `drawing` or `completing`, if any.
pub async fn find_active_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<turns::Model>, sea_orm::DbErr> {
    turns::Entity::find()
        .filter(turns::Column::GameId.eq(game_id))
        .filter(turns::Column::Status.is_in([TurnStatus::Drawing, TurnStatus::Completing]))
        .order_by_desc(turns::Column::Id)
        .one(conn)
        .await
}

pub async fn find_latest_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<turns::Model>, sea_orm::DbErr> {
    turns::Entity::find()
        .filter(turns::Column::GameId.eq(game_id))
        .order_by_desc(turns::Column::Id)
        .one(conn)
        .await
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<turns::Model>, sea_orm::DbErr> {
    turns::Entity::find()
        .filter(turns::Column::GameId.eq(game_id))
        .order_by_asc(turns::Column::Id)
        .all(conn)
        .await
}

/// Drawers of the terminal turns in `round`, in play order.
pub async fn drawers_in_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
) -> Result<Vec<String>, sea_orm::DbErr> {
    turns::Entity::find()
        .select_only()
        .column(turns::Column::DrawerId)
        .filter(turns::Column::GameId.eq(game_id))
        .filter(turns::Column::Round.eq(round))
        .filter(turns::Column::Status.is_in([TurnStatus::Completed, TurnStatus::TimeUp]))
        .order_by_asc(turns::Column::Id)
        .into_tuple::<String>()
        .all(conn)
        .await
}

/// Drawer of the first turn played in `round`.
pub async fn first_drawer_in_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round: i32,
) -> Result<Option<String>, sea_orm::DbErr> {
    turns::Entity::find()
        .select_only()
        .column(turns::Column::DrawerId)
        .filter(turns::Column::GameId.eq(game_id))
        .filter(turns::Column::Round.eq(round))
        .order_by_asc(turns::Column::Id)
        .into_tuple::<String>()
        .one(conn)
        .await
}

/// Set `started_at` only if it is still unset. Returns true if this call started the clock.
pub async fn mark_started<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
    now: OffsetDateTime,
) -> Result<bool, sea_orm::DbErr> {
    let result = turns::Entity::update_many()
        .col_expr(turns::Column::StartedAt, Expr::value(Some(now)))
        .filter(turns::Column::Id.eq(turn_id))
        .filter(turns::Column::StartedAt.is_null())
        .filter(turns::Column::Status.eq(TurnStatus::Drawing))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Move a turn out of `drawing` into `to`. Exactly one caller per turn sees `true`.
pub async fn claim_from_drawing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
    to: TurnStatus,
) -> Result<bool, sea_orm::DbErr> {
    let result = turns::Entity::update_many()
        .col_expr(turns::Column::Status, Expr::value(to))
        .filter(turns::Column::Id.eq(turn_id))
        .filter(turns::Column::Status.eq(TurnStatus::Drawing))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Persist the outcome of a claimed turn and move it to its terminal status.
pub async fn finish_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TurnFinish,
) -> Result<bool, sea_orm::DbErr> {
    let mut update = turns::Entity::update_many()
        .col_expr(turns::Column::Status, Expr::value(dto.final_status))
        .col_expr(turns::Column::CompletedAt, Expr::value(Some(dto.completed_at)))
        .col_expr(turns::Column::WinnerId, Expr::value(dto.winner_id))
        .col_expr(turns::Column::PointsAwarded, Expr::value(dto.points_awarded))
        .col_expr(
            turns::Column::DrawerPointsAwarded,
            Expr::value(dto.drawer_points_awarded),
        )
        .col_expr(
            turns::Column::CorrectGuesses,
            Expr::col(turns::Column::CorrectGuesses).add(dto.correct_guesses_delta),
        );
    if let Some(reference) = dto.drawing_ref {
        update = update.col_expr(turns::Column::DrawingRef, Expr::value(Some(reference)));
    }

    let result = update
        .filter(turns::Column::Id.eq(dto.turn_id))
        .filter(turns::Column::Status.eq(dto.claimed_status))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

pub async fn set_drawing_ref<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    turn_id: i64,
    reference: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = turns::Entity::update_many()
        .col_expr(turns::Column::DrawingRef, Expr::value(Some(reference.to_string())))
        .filter(turns::Column::Id.eq(turn_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list_drawing_refs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<String>, sea_orm::DbErr> {
    let refs: Vec<Option<String>> = turns::Entity::find()
        .select_only()
        .column(turns::Column::DrawingRef)
        .filter(turns::Column::GameId.eq(game_id))
        .filter(turns::Column::DrawingRef.is_not_null())
        .into_tuple::<Option<String>>()
        .all(conn)
        .await?;
    Ok(refs.into_iter().flatten().collect())
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = turns::Entity::delete_many()
        .filter(turns::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
