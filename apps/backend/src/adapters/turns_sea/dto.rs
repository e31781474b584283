//! DTOs for turns_sea adapter.

use time::OffsetDateTime;

use crate::entities::turns::TurnStatus;

#[derive(Debug, Clone)]
pub struct TurnCreate {
    pub game_id: i64,
    pub round: i32,
    pub drawer_id: String,
    pub card_id: i64,
    pub time_limit: i32,
    pub now: OffsetDateTime,
}

/// Terminal write for a turn that has already been claimed.
#[derive(Debug, Clone)]
pub struct TurnFinish {
    pub turn_id: i64,
    /// Status the claim moved the turn into; the write is conditioned on it.
    pub claimed_status: TurnStatus,
    pub final_status: TurnStatus,
    pub completed_at: OffsetDateTime,
    pub winner_id: Option<String>,
    pub points_awarded: i32,
    pub drawer_points_awarded: i32,
    pub correct_guesses_delta: i32,
    pub drawing_ref: Option<String>,
}
