//! Per-game card supply: atomic take, background replenishment.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::domain::card_library::{fallback_prompts, Prompt};
use crate::domain::guess_text::normalize;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ExhaustedKind};
use crate::oracles::{CardGenerator, OracleError};
use crate::repos::cards::{self, Card, CardCreate};
use crate::repos::games;

/// Claim attempts before giving up on a contended pool.
const MAX_CLAIM_ATTEMPTS: usize = 5;

/// Below this many unused cards, starting a turn asks for more.
pub const LOW_WATER_MARK: u64 = 2;

/// A deferred request to top up a game's pool. Runs after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRequest {
    pub game_id: i64,
    pub category: String,
    pub count: usize,
}

#[derive(Clone)]
pub struct CardPool {
    generator: Arc<dyn CardGenerator>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl CardPool {
    pub fn new(generator: Arc<dyn CardGenerator>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            generator,
            clock,
            timeout,
        }
    }

    pub fn request_generation(game_id: i64, category: &str, count: usize) -> CardRequest {
        CardRequest {
            game_id,
            category: category.to_string(),
            count,
        }
    }

    /// Take the oldest unused card and mark it used in one conditional write.
    ///
    /// A lost claim means somebody else got that card; move on to the next one.
    pub async fn take_unused_card<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<Card, AppError> {
        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let Some(card) = cards::find_next_unused(conn, game_id).await? else {
                return Err(no_cards(game_id));
            };
            if cards::claim_card(conn, card.id).await? {
                debug!(game_id, card_id = card.id, "card claimed");
                return Ok(Card {
                    is_used: true,
                    ..card
                });
            }
            debug!(game_id, card_id = card.id, "card claim lost; retrying");
        }
        Err(no_cards(game_id))
    }

    /// Generate and store `request.count` fresh cards.
    ///
    /// Words already in the game are skipped. Returns the number inserted;
    /// a game deleted in the meantime yields 0.
    pub async fn replenish(
        &self,
        db: &DatabaseConnection,
        request: &CardRequest,
    ) -> Result<usize, AppError> {
        let existing = cards::list_words(db, request.game_id).await?;
        let prompts = self
            .prompts_for(&request.category, request.count, &existing)
            .await;

        let txn = db.begin().await?;
        if games::find_by_id(&txn, request.game_id).await?.is_none() {
            debug!(game_id = request.game_id, "game gone before cards landed");
            return Ok(0);
        }

        // Re-read inside the transaction; another replenish may have landed.
        let mut seen: HashSet<String> = cards::list_words(&txn, request.game_id)
            .await?
            .iter()
            .map(|w| normalize(w))
            .collect();
        let batch: Vec<CardCreate> = prompts
            .into_iter()
            .filter(|p| seen.insert(normalize(&p.word)))
            .map(|p| CardCreate {
                word: p.word,
                description: p.description,
            })
            .collect();

        let inserted =
            cards::insert_cards(&txn, request.game_id, &request.category, batch, self.clock.now())
                .await?;
        txn.commit().await?;

        info!(game_id = request.game_id, inserted, "card pool replenished");
        Ok(inserted)
    }

    /// Oracle prompts, topped up from the built-in library when the oracle
    /// fails or comes back short.
    async fn prompts_for(&self, category: &str, count: usize, avoid: &[String]) -> Vec<Prompt> {
        let generated =
            tokio::time::timeout(self.timeout, self.generator.generate(category, count, avoid))
                .await
                .unwrap_or(Err(OracleError::Timeout));

        let mut prompts = match generated {
            Ok(prompts) => prompts,
            Err(OracleError::Unavailable) => Vec::new(),
            Err(err) => {
                warn!(error = %err, category, "card generator failed; using built-in library");
                Vec::new()
            }
        };

        let mut avoid_all: Vec<String> = avoid.to_vec();
        avoid_all.extend(prompts.iter().map(|p| p.word.clone()));
        let mut seen: HashSet<String> = avoid.iter().map(|w| normalize(w)).collect();
        prompts.retain(|p| seen.insert(normalize(&p.word)));
        prompts.truncate(count);

        if prompts.len() < count {
            prompts.extend(fallback_prompts(category, count - prompts.len(), &avoid_all));
        }
        prompts
    }
}

fn no_cards(game_id: i64) -> AppError {
    DomainError::exhausted(
        ExhaustedKind::Cards,
        format!("No cards left for game {game_id}; more are on the way, retry shortly"),
    )
    .into()
}
