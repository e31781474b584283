//! Session lifecycle: create, join, start, leave.

use rand::seq::IndexedRandom;
use sea_orm::DatabaseTransaction;
use serde::Serialize;
use tracing::{debug, info};

use super::finalize::Resolution;
use super::{FlowOutcome, GameFlowService};
use crate::entities::games::GameStatus;
use crate::entities::turns::TurnStatus;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::realtime::ChangeEvent;
use crate::repos::games::{self, Game, GameCreate, GameUpdate};
use crate::repos::players::{self, Player, PlayerCreate};
use crate::repos::{cards, guesses, turns};
use crate::services::card_pool::CardPool;
use crate::services::permissions::GameAccess;
use crate::utils::join_code::{generate_join_code, normalize_join_code};

/// Join code draws before giving up on finding a free one.
const JOIN_CODE_ATTEMPTS: usize = 8;

/// Longest accepted category, in characters.
const MAX_CATEGORY_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct CreatedGame {
    pub game_id: i64,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinedGame {
    pub game_id: i64,
    pub player: Player,
    /// The caller was already a member; nothing changed.
    pub rejoined: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeftGame {
    pub game_id: i64,
    /// The host left and the game was torn down.
    pub game_deleted: bool,
}

impl GameFlowService {
    /// Create a game in `waiting` with the caller as host.
    pub async fn create_game(
        &self,
        txn: &DatabaseTransaction,
        user_id: &str,
        username: &str,
        category: &str,
        max_rounds: i32,
    ) -> Result<FlowOutcome<CreatedGame>, AppError> {
        let category = category.trim();
        if category.is_empty() || category.chars().count() > MAX_CATEGORY_CHARS {
            return Err(DomainError::validation(
                ValidationKind::InvalidCategory,
                format!("Category must be 1 to {MAX_CATEGORY_CHARS} characters"),
            )
            .into());
        }
        let limit = self.ctx.settings.max_rounds_limit;
        if !(1..=limit).contains(&max_rounds) {
            return Err(DomainError::validation(
                ValidationKind::InvalidMaxRounds,
                format!("max_rounds must be between 1 and {limit}"),
            )
            .into());
        }

        let code = self.free_join_code(txn).await?;
        let now = self.ctx.now();
        let game = games::create_game(
            txn,
            GameCreate {
                join_code: code.clone(),
                category: category.to_string(),
                created_by: user_id.to_string(),
                max_rounds,
                now,
            },
        )
        .await?;
        players::create_player(
            txn,
            PlayerCreate {
                game_id: game.id,
                player_id: user_id.to_string(),
                username: username.to_string(),
                is_host: true,
                now,
            },
        )
        .await?;

        info!(game_id = game.id, user_id, max_rounds, category, "game created");

        let mut outcome = FlowOutcome::new(CreatedGame {
            game_id: game.id,
            code,
        })
        .event(ChangeEvent::GameUpdated {
            game_id: game.id,
            version: game.version,
        });
        outcome.card_requests.push(CardPool::request_generation(
            game.id,
            &game.category,
            self.ctx.settings.initial_cards,
        ));
        Ok(outcome)
    }

    async fn free_join_code(&self, txn: &DatabaseTransaction) -> Result<String, AppError> {
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let code = generate_join_code();
            if games::find_by_join_code(txn, &code).await?.is_none() {
                return Ok(code);
            }
            debug!(code, "join code collision; drawing again");
        }
        Err(AppError::conflict(
            ErrorCode::JoinCodeConflict,
            "Could not allocate a join code, please retry",
        ))
    }

    /// Join by code. Joining twice returns the existing membership.
    pub async fn join_game(
        &self,
        txn: &DatabaseTransaction,
        raw_code: &str,
        user_id: &str,
        username: &str,
    ) -> Result<FlowOutcome<JoinedGame>, AppError> {
        let code = normalize_join_code(raw_code).ok_or_else(|| {
            AppError::invalid(ErrorCode::InvalidJoinCode, "Join code is not well formed")
        })?;
        let game = games::find_by_join_code(txn, &code).await?.ok_or_else(|| {
            AppError::not_found(ErrorCode::GameNotFound, format!("No game with code {code}"))
        })?;

        if let Some(player) = players::find_player(txn, game.id, user_id).await? {
            debug!(game_id = game.id, user_id, "rejoin");
            return Ok(FlowOutcome::new(JoinedGame {
                game_id: game.id,
                player,
                rejoined: true,
            }));
        }

        require_waiting(&game)?;
        let seated = players::list_players(txn, game.id).await?.len();
        if seated >= self.ctx.settings.max_players {
            return Err(DomainError::validation(
                ValidationKind::GameFull,
                format!("The game already has {seated} players"),
            )
            .into());
        }

        let player = players::create_player(
            txn,
            PlayerCreate {
                game_id: game.id,
                player_id: user_id.to_string(),
                username: username.to_string(),
                is_host: false,
                now: self.ctx.now(),
            },
        )
        .await?;

        info!(game_id = game.id, user_id, "player joined");

        Ok(FlowOutcome::new(JoinedGame {
            game_id: game.id,
            player,
            rejoined: false,
        })
        .event(ChangeEvent::PlayersChanged { game_id: game.id }))
    }

    /// Host starts the game; the first drawer is picked at random.
    pub async fn start_game(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        user_id: &str,
    ) -> Result<FlowOutcome<Game>, AppError> {
        let access = GameAccess::load(txn, game_id).await?;
        access.require_host(user_id)?;
        require_waiting(&access.game)?;

        let min_players = self.ctx.settings.min_players;
        if access.roster.len() < min_players {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                format!("At least {min_players} players are needed to start"),
            )
            .into());
        }

        let roster = access.roster_ids();
        let first_drawer = roster
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| AppError::internal("roster unexpectedly empty"))?;

        let now = self.ctx.now();
        let game = games::update_game(
            txn,
            GameUpdate::new(game_id, access.game.version, now)
                .with_status(GameStatus::Started)
                .with_round(0)
                .with_current_drawer(Some(first_drawer.clone()))
                .with_started_at(now),
        )
        .await?;

        info!(game_id, first_drawer, players = roster.len(), "game started");

        Ok(FlowOutcome::new(game.clone()).event(ChangeEvent::GameUpdated {
            game_id,
            version: game.version,
        }))
    }

    /// Leave a game. The host leaving tears the whole game down.
    pub async fn leave_game(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        user_id: &str,
    ) -> Result<FlowOutcome<LeftGame>, AppError> {
        let access = GameAccess::load(txn, game_id).await?;
        let leaving = access.require_member(user_id)?;

        if leaving.is_host {
            return self.teardown(txn, game_id, user_id).await;
        }

        let mut outcome = FlowOutcome::new(LeftGame {
            game_id,
            game_deleted: false,
        });

        let roster_before = access.roster_ids();
        let was_drawing = access.game.status == GameStatus::Started
            && access.game.is_current_drawer(user_id);

        // Close the departing drawer's turn before the membership row goes.
        let closed_turn = if was_drawing {
            match turns::find_active_for_game(txn, game_id).await? {
                Some(turn) if turn.status == TurnStatus::Drawing => {
                    self.close_turn(txn, &turn, Resolution::timed_out(None))
                        .await?
                }
                _ => None,
            }
        } else {
            None
        };

        players::remove_player(txn, game_id, user_id).await?;
        info!(game_id, user_id, was_drawing, "player left");
        outcome.events.push(ChangeEvent::PlayersChanged { game_id });

        if access.game.status != GameStatus::Started {
            return Ok(outcome);
        }

        let game = games::require_game(txn, game_id).await?;
        let remaining = roster_before.len().saturating_sub(1);
        if remaining < self.ctx.settings.min_players {
            if let Some(turn) = &closed_turn {
                outcome.events.push(ChangeEvent::TurnEnded {
                    game_id,
                    turn_id: turn.id,
                    winner_id: None,
                });
            }
            let ended = self.end_for_lack_of_players(txn, game).await?;
            outcome.absorb(ended);
            return Ok(outcome);
        }

        if was_drawing {
            let advanced = self
                .advance_after_departure(txn, game, &roster_before, user_id, closed_turn.as_ref())
                .await?;
            outcome.absorb(advanced);
        }

        Ok(outcome)
    }

    async fn teardown(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        user_id: &str,
    ) -> Result<FlowOutcome<LeftGame>, AppError> {
        let drawings = turns::list_drawing_refs(txn, game_id).await?;

        guesses::delete_by_game(txn, game_id).await?;
        turns::delete_by_game(txn, game_id).await?;
        cards::delete_by_game(txn, game_id).await?;
        players::delete_by_game(txn, game_id).await?;
        games::delete_game(txn, game_id).await?;

        info!(game_id, user_id, drawings = drawings.len(), "host left; game deleted");

        let mut outcome = FlowOutcome::new(LeftGame {
            game_id,
            game_deleted: true,
        })
        .event(ChangeEvent::GameDeleted { game_id });
        outcome.orphaned_blobs = drawings;
        Ok(outcome)
    }

    async fn end_for_lack_of_players(
        &self,
        txn: &DatabaseTransaction,
        game: Game,
    ) -> Result<FlowOutcome<()>, AppError> {
        let mut outcome = FlowOutcome::new(());

        if let Some(turn) = turns::find_active_for_game(txn, game.id).await? {
            if let Some(closed) = self
                .close_turn(txn, &turn, Resolution::timed_out(None))
                .await?
            {
                outcome.events.push(ChangeEvent::TurnEnded {
                    game_id: game.id,
                    turn_id: closed.id,
                    winner_id: None,
                });
            }
        }

        let game = games::require_game(txn, game.id).await?;
        let now = self.ctx.now();
        let updated = games::update_game(
            txn,
            GameUpdate::new(game.id, game.version, now)
                .with_status(GameStatus::Finished)
                .with_current_drawer(None)
                .with_finished_at(now),
        )
        .await?;

        info!(game_id = game.id, "too few players left; game finished");
        outcome.events.push(ChangeEvent::GameUpdated {
            game_id: updated.id,
            version: updated.version,
        });
        Ok(outcome)
    }
}

fn require_waiting(game: &Game) -> Result<(), AppError> {
    match game.status {
        GameStatus::Waiting => Ok(()),
        GameStatus::Started => Err(DomainError::validation(
            ValidationKind::GameAlreadyStarted,
            "The game has already started",
        )
        .into()),
        GameStatus::Finished => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "The game is over",
        )
        .into()),
    }
}
