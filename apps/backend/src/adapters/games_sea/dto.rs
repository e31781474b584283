//! DTOs for games_sea adapter.

use time::OffsetDateTime;

use crate::entities::games::GameStatus;

#[derive(Debug, Clone)]
pub struct GameCreate {
    pub join_code: String,
    pub category: String,
    pub created_by: String,
    pub max_rounds: i32,
    pub now: OffsetDateTime,
}

/// Game row update guarded by `version`.
///
/// Double options are three-state: None = no change, Some(None) = clear,
/// Some(Some(v)) = set.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub id: i64,
    pub expected_version: i32,
    pub now: OffsetDateTime,
    pub status: Option<GameStatus>,
    pub round: Option<i32>,
    pub current_drawer_id: Option<Option<String>>,
    pub current_card_id: Option<Option<i64>>,
    pub started_at: Option<OffsetDateTime>,
    pub finished_at: Option<OffsetDateTime>,
}

impl GameUpdate {
    pub fn new(id: i64, expected_version: i32, now: OffsetDateTime) -> Self {
        Self {
            id,
            expected_version,
            now,
            status: None,
            round: None,
            current_drawer_id: None,
            current_card_id: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_round(mut self, round: i32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_current_drawer(mut self, drawer: Option<String>) -> Self {
        self.current_drawer_id = Some(drawer);
        self
    }

    pub fn with_current_card(mut self, card_id: Option<i64>) -> Self {
        self.current_card_id = Some(card_id);
        self
    }

    pub fn with_started_at(mut self, at: OffsetDateTime) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn with_finished_at(mut self, at: OffsetDateTime) -> Self {
        self.finished_at = Some(at);
        self
    }
}
