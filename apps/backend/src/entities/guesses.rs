use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    #[sea_orm(column_name = "turn_id")]
    pub turn_id: i64,
    #[sea_orm(column_name = "player_id")]
    pub player_id: String,
    #[sea_orm(column_name = "guess_text")]
    pub guess_text: String,
    #[sea_orm(column_name = "is_correct")]
    pub is_correct: bool,
    #[sea_orm(column_name = "is_fuzzy_match")]
    pub is_fuzzy_match: bool,
    #[sea_orm(column_name = "submitted_at")]
    pub submitted_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::turns::Entity",
        from = "Column::TurnId",
        to = "super::turns::Column::Id",
        on_delete = "Cascade"
    )]
    Turn,
}

impl Related<super::turns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Turn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
