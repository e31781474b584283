use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    #[sea_orm(string_value = "drawing")]
    Drawing,
    #[sea_orm(string_value = "completing")]
    Completing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "time_up")]
    TimeUp,
}

impl TurnStatus {
    /// `completed` and `time_up` are one-way.
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnStatus::Completed | TurnStatus::TimeUp)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "turns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    pub round: i32,
    #[sea_orm(column_name = "drawer_id")]
    pub drawer_id: String,
    #[sea_orm(column_name = "card_id", unique)]
    pub card_id: i64,
    pub status: TurnStatus,
    #[sea_orm(column_name = "time_limit")]
    pub time_limit: i32,
    #[sea_orm(column_name = "started_at")]
    pub started_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "completed_at")]
    pub completed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "correct_guesses")]
    pub correct_guesses: i32,
    #[sea_orm(column_name = "winner_id")]
    pub winner_id: Option<String>,
    #[sea_orm(column_name = "points_awarded")]
    pub points_awarded: i32,
    #[sea_orm(column_name = "drawer_points_awarded")]
    pub drawer_points_awarded: i32,
    #[sea_orm(column_name = "drawing_ref")]
    pub drawing_ref: Option<String>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id",
        on_delete = "Cascade"
    )]
    Game,
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id",
        on_delete = "Cascade"
    )]
    Card,
    #[sea_orm(has_many = "super::guesses::Entity")]
    Guesses,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl Related<super::guesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guesses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
