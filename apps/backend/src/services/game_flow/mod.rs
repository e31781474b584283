//! Game flow: session lifecycle and the turn state machine.
//!
//! Every operation runs inside the caller's transaction and returns a
//! [`FlowOutcome`]. Its side effects (change events, card generation, blob
//! cleanup) are held back until [`GameFlowService::dispatch`] runs after commit.

mod finalize;
mod lifecycle;
mod turn_actions;

use sea_orm::DatabaseConnection;
use tracing::warn;

pub use lifecycle::{CreatedGame, JoinedGame, LeftGame};
pub use turn_actions::{GuessAttempt, GuessOutcome, SnapshotUploader, StartedTurn};

use super::card_pool::{CardPool, CardRequest};
use super::context::GameContext;
use super::guess_validator::GuessValidator;
use crate::realtime::ChangeEvent;

/// Result of a mutation plus the effects to run once it is committed.
#[derive(Debug)]
#[must_use = "dispatch the outcome after the transaction commits"]
pub struct FlowOutcome<T> {
    pub value: T,
    pub events: Vec<ChangeEvent>,
    pub card_requests: Vec<CardRequest>,
    /// Blob references no longer referenced by any row
    pub orphaned_blobs: Vec<String>,
}

impl<T> FlowOutcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
            card_requests: Vec::new(),
            orphaned_blobs: Vec::new(),
        }
    }

    fn event(mut self, event: ChangeEvent) -> Self {
        self.events.push(event);
        self
    }

    fn absorb<U>(&mut self, other: FlowOutcome<U>) -> U {
        self.events.extend(other.events);
        self.card_requests.extend(other.card_requests);
        self.orphaned_blobs.extend(other.orphaned_blobs);
        other.value
    }
}

#[derive(Clone)]
pub struct GameFlowService {
    ctx: GameContext,
    cards: CardPool,
    validator: GuessValidator,
}

impl GameFlowService {
    pub fn new(ctx: GameContext) -> Self {
        let cards = CardPool::new(
            ctx.generator.clone(),
            ctx.clock.clone(),
            ctx.settings.generator_timeout,
        );
        let validator = GuessValidator::new(ctx.judge.clone(), ctx.settings.judge_timeout);
        Self {
            ctx,
            cards,
            validator,
        }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn card_pool(&self) -> &CardPool {
        &self.cards
    }

    pub fn validator(&self) -> &GuessValidator {
        &self.validator
    }

    /// Publish events and start background work for a committed outcome.
    ///
    /// Card generation and blob cleanup are spawned and not awaited.
    pub fn dispatch<T>(&self, db: &DatabaseConnection, outcome: FlowOutcome<T>) -> T {
        self.publish(&outcome.events);

        for request in outcome.card_requests {
            let service = self.clone();
            let db = db.clone();
            tokio::spawn(async move { service.replenish(&db, &request).await });
        }

        if !outcome.orphaned_blobs.is_empty() {
            let blobs = self.ctx.blobs.clone();
            let refs = outcome.orphaned_blobs;
            tokio::spawn(async move {
                for blob_ref in refs {
                    if let Err(err) = blobs.delete(&blob_ref).await {
                        warn!(blob_ref, error = %err, "drawing cleanup failed");
                    }
                }
            });
        }

        outcome.value
    }

    /// Like [`dispatch`](Self::dispatch), but waits for background work.
    pub async fn settle<T>(&self, db: &DatabaseConnection, outcome: FlowOutcome<T>) -> T {
        self.publish(&outcome.events);

        for request in &outcome.card_requests {
            self.replenish(db, request).await;
        }
        for blob_ref in &outcome.orphaned_blobs {
            if let Err(err) = self.ctx.blobs.delete(blob_ref).await {
                warn!(blob_ref, error = %err, "drawing cleanup failed");
            }
        }

        outcome.value
    }

    async fn replenish(&self, db: &DatabaseConnection, request: &CardRequest) {
        match self.cards.replenish(db, request).await {
            Ok(0) => {}
            Ok(added) => self.publish(&[ChangeEvent::CardsReplenished {
                game_id: request.game_id,
                added,
            }]),
            Err(err) => {
                warn!(game_id = request.game_id, error = %err, "card replenishment failed");
            }
        }
    }

    fn publish(&self, events: &[ChangeEvent]) {
        for event in events {
            self.ctx.publisher.notify(&event.topic(), event);
        }
    }
}
