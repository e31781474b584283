//! Change notifications published after a mutation commits.
//!
//! Payloads are hints: subscribers re-fetch authoritative state.

use serde::Serialize;

/// Broadcast scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Topic {
    Game(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    GameUpdated {
        game_id: i64,
        version: i32,
    },
    PlayersChanged {
        game_id: i64,
    },
    TurnStarted {
        game_id: i64,
        turn_id: i64,
        drawer_id: String,
    },
    TimerStarted {
        game_id: i64,
        turn_id: i64,
    },
    GuessSubmitted {
        game_id: i64,
        turn_id: i64,
        player_id: String,
    },
    TurnEnded {
        game_id: i64,
        turn_id: i64,
        winner_id: Option<String>,
    },
    CardsReplenished {
        game_id: i64,
        added: usize,
    },
    GameDeleted {
        game_id: i64,
    },
}

impl ChangeEvent {
    pub fn game_id(&self) -> i64 {
        match self {
            ChangeEvent::GameUpdated { game_id, .. }
            | ChangeEvent::PlayersChanged { game_id }
            | ChangeEvent::TurnStarted { game_id, .. }
            | ChangeEvent::TimerStarted { game_id, .. }
            | ChangeEvent::GuessSubmitted { game_id, .. }
            | ChangeEvent::TurnEnded { game_id, .. }
            | ChangeEvent::CardsReplenished { game_id, .. }
            | ChangeEvent::GameDeleted { game_id } => *game_id,
        }
    }

    /// Turn-scoped events travel on their game's topic too.
    pub fn topic(&self) -> Topic {
        Topic::Game(self.game_id())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::GameUpdated { .. } => "game_updated",
            ChangeEvent::PlayersChanged { .. } => "players_changed",
            ChangeEvent::TurnStarted { .. } => "turn_started",
            ChangeEvent::TimerStarted { .. } => "timer_started",
            ChangeEvent::GuessSubmitted { .. } => "guess_submitted",
            ChangeEvent::TurnEnded { .. } => "turn_ended",
            ChangeEvent::CardsReplenished { .. } => "cards_replenished",
            ChangeEvent::GameDeleted { .. } => "game_deleted",
        }
    }
}
