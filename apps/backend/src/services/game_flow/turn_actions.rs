//! Turn actions: start, first stroke, guesses, manual winner, timeout.

use actix_web::HttpRequest;
use bytes::Bytes;
use sea_orm::{ConnectionTrait, DatabaseTransaction};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::finalize::Resolution;
use super::{FlowOutcome, GameFlowService};
use crate::db::txn::with_txn;
use crate::domain::guess_text::clean_guess;
use crate::domain::scoring::award_for_win;
use crate::entities::games::GameStatus;
use crate::entities::turns::TurnStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::realtime::ChangeEvent;
use crate::repos::cards::{self, Card};
use crate::repos::games::{self, GameUpdate};
use crate::repos::guesses::{self, GuessCreate};
use crate::repos::turns::{self, Turn, TurnCreate};
use crate::services::card_pool::{CardPool, LOW_WATER_MARK};
use crate::services::guess_validator::Verdict;
use crate::services::permissions::GameAccess;
use crate::state::app_state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct StartedTurn {
    pub turn: Turn,
    /// The secret word; only ever returned to the drawer.
    pub card: Card,
}

/// Who may send snapshot bytes along with a turn action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotUploader {
    /// Winner selection and drawing uploads.
    Drawer,
    /// Timeout reports.
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GuessOutcome {
    Rejected,
    Won {
        points: i32,
        drawer_points: i32,
        fuzzy: bool,
    },
    /// Correct, but the turn was already resolved by someone else.
    AlreadyResolved,
}

/// A guess that passed its preconditions and awaits adjudication.
#[derive(Debug, Clone)]
pub struct GuessAttempt {
    pub game_id: i64,
    pub turn_id: i64,
    pub player_id: String,
    pub text: String,
    pub answer: String,
    pub category: String,
    /// Scoring uses the clock at submission, not after the judge returns.
    pub submitted_at: OffsetDateTime,
}

impl GameFlowService {
    /// Current drawer opens a turn with a fresh card. The clock waits for
    /// the first stroke.
    pub async fn start_turn(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        user_id: &str,
    ) -> Result<FlowOutcome<StartedTurn>, AppError> {
        let access = GameAccess::load(txn, game_id).await?;
        access.require_member(user_id)?;
        if access.game.status != GameStatus::Started {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "The game is not in progress",
            )
            .into());
        }
        access.require_current_drawer(user_id)?;

        if let Some(active) = turns::find_active_for_game(txn, game_id).await? {
            return Err(DomainError::validation(
                ValidationKind::TurnInProgress,
                format!("Turn {} is still in progress", active.id),
            )
            .into());
        }

        let card = self.cards.take_unused_card(txn, game_id).await?;
        let now = self.ctx.now();
        let turn = turns::create_turn(
            txn,
            TurnCreate {
                game_id,
                round: access.game.round,
                drawer_id: user_id.to_string(),
                card_id: card.id,
                time_limit: self.ctx.settings.turn_seconds,
                now,
            },
        )
        .await?;
        let game = games::update_game(
            txn,
            GameUpdate::new(game_id, access.game.version, now).with_current_card(Some(card.id)),
        )
        .await?;

        info!(game_id, turn_id = turn.id, round = turn.round, user_id, "turn started");

        let mut outcome = FlowOutcome::new(StartedTurn {
            turn: turn.clone(),
            card,
        })
        .event(ChangeEvent::TurnStarted {
            game_id,
            turn_id: turn.id,
            drawer_id: user_id.to_string(),
        })
        .event(ChangeEvent::GameUpdated {
            game_id,
            version: game.version,
        });

        if cards::count_unused(txn, game_id).await? < LOW_WATER_MARK {
            outcome.card_requests.push(CardPool::request_generation(
                game_id,
                &game.category,
                self.ctx.settings.initial_cards,
            ));
        }
        Ok(outcome)
    }

    /// Drawer's first stroke starts the clock. Repeat calls change nothing.
    pub async fn register_first_stroke(
        &self,
        txn: &DatabaseTransaction,
        turn_id: i64,
        user_id: &str,
    ) -> Result<FlowOutcome<Turn>, AppError> {
        let turn = turns::require_turn(txn, turn_id).await?;
        require_turn_drawer(&turn, user_id)?;

        if turn.started_at.is_some() {
            return Ok(FlowOutcome::new(turn));
        }
        if turn.status != TurnStatus::Drawing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "The turn is over",
            )
            .into());
        }

        let started = turns::mark_started(txn, turn_id, self.ctx.now()).await?;
        let turn = turns::require_turn(txn, turn_id).await?;
        if !started {
            debug!(turn_id, "clock already running");
            return Ok(FlowOutcome::new(turn));
        }

        info!(game_id = turn.game_id, turn_id, "turn clock started");
        Ok(FlowOutcome::new(turn.clone()).event(ChangeEvent::TimerStarted {
            game_id: turn.game_id,
            turn_id,
        }))
    }

    /// Check a guess against its preconditions and load the answer.
    pub async fn prepare_guess(
        &self,
        txn: &DatabaseTransaction,
        turn_id: i64,
        user_id: &str,
        raw_guess: &str,
    ) -> Result<GuessAttempt, AppError> {
        let text = clean_guess(raw_guess).ok_or_else(|| {
            AppError::from(DomainError::validation(
                ValidationKind::InvalidGuess,
                "Guess cannot be empty",
            ))
        })?;

        let turn = turns::require_turn(txn, turn_id).await?;
        let access = GameAccess::load(txn, turn.game_id).await?;
        access.require_can_guess(user_id)?;
        if turn.drawer_id == user_id {
            return Err(AppError::forbidden(
                ErrorCode::DrawerCannotGuess,
                "The drawer cannot guess their own word",
            ));
        }
        require_drawing(&turn)?;

        let now = self.ctx.now();
        if turn.started_at.is_none() {
            return Err(DomainError::validation(
                ValidationKind::TimerNotStarted,
                "The drawer has not started drawing yet",
            )
            .into());
        }
        if turn.is_expired(now) {
            return Err(DomainError::validation(
                ValidationKind::TimeExpired,
                "Time is up for this turn",
            )
            .into());
        }

        let card = cards::require_card(txn, turn.card_id).await?;
        Ok(GuessAttempt {
            game_id: turn.game_id,
            turn_id,
            player_id: user_id.to_string(),
            text,
            answer: card.word,
            category: card.category,
            submitted_at: now,
        })
    }

    /// Record an adjudicated guess; a correct one tries to win the turn.
    pub async fn resolve_guess(
        &self,
        txn: &DatabaseTransaction,
        attempt: &GuessAttempt,
        verdict: Verdict,
    ) -> Result<FlowOutcome<GuessOutcome>, AppError> {
        let turn = turns::require_turn(txn, attempt.turn_id).await?;

        guesses::record_guess(
            txn,
            GuessCreate {
                game_id: attempt.game_id,
                turn_id: attempt.turn_id,
                player_id: attempt.player_id.clone(),
                guess_text: attempt.text.clone(),
                is_correct: verdict.accepted,
                is_fuzzy_match: verdict.accepted && verdict.fuzzy,
                now: attempt.submitted_at,
            },
        )
        .await?;

        let submitted = ChangeEvent::GuessSubmitted {
            game_id: attempt.game_id,
            turn_id: attempt.turn_id,
            player_id: attempt.player_id.clone(),
        };

        if !verdict.accepted {
            return Ok(FlowOutcome::new(GuessOutcome::Rejected).event(submitted));
        }

        let award = award_for_win(turn.remaining_seconds(attempt.submitted_at));
        let resolution = Resolution::won_by_guess(attempt.player_id.clone(), award);
        let Some(finalized) = self.finalize_turn(txn, &turn, resolution).await? else {
            debug!(
                turn_id = attempt.turn_id,
                user_id = attempt.player_id,
                "correct guess lost the race"
            );
            return Ok(FlowOutcome::new(GuessOutcome::AlreadyResolved).event(submitted));
        };

        let mut outcome = FlowOutcome::new(GuessOutcome::Won {
            points: award.guesser_points,
            drawer_points: award.drawer_points,
            fuzzy: verdict.fuzzy,
        })
        .event(submitted);
        outcome.absorb(finalized);
        Ok(outcome)
    }

    /// Full guess flow: preconditions, adjudication outside any
    /// transaction, then recording.
    pub async fn submit_guess(
        &self,
        req: Option<&HttpRequest>,
        state: &AppState,
        turn_id: i64,
        user_id: &str,
        raw_guess: &str,
    ) -> Result<FlowOutcome<GuessOutcome>, AppError> {
        let attempt = {
            let service = self.clone();
            let user_id = user_id.to_string();
            let raw_guess = raw_guess.to_string();
            with_txn(req, state, move |txn| {
                Box::pin(async move {
                    service
                        .prepare_guess(txn, turn_id, &user_id, &raw_guess)
                        .await
                })
            })
            .await?
        };

        let verdict = self
            .validator
            .validate(&attempt.text, &attempt.answer, &attempt.category)
            .await;

        let service = self.clone();
        with_txn(req, state, move |txn| {
            Box::pin(async move { service.resolve_guess(txn, &attempt, verdict).await })
        })
        .await
    }

    /// Drawer awards the turn to `winner_id` directly.
    pub async fn select_winner(
        &self,
        txn: &DatabaseTransaction,
        turn_id: i64,
        user_id: &str,
        winner_id: &str,
        time_remaining_seconds: i32,
        drawing_ref: Option<String>,
    ) -> Result<FlowOutcome<Turn>, AppError> {
        let turn = turns::require_turn(txn, turn_id).await?;
        let access = GameAccess::load(txn, turn.game_id).await?;
        access.require_current_drawer(user_id)?;
        require_turn_drawer(&turn, user_id)?;
        require_drawing(&turn)?;

        if winner_id == turn.drawer_id || access.member(winner_id).is_none() {
            return Err(DomainError::validation(
                ValidationKind::InvalidWinner,
                "The winner must be another player in this game",
            )
            .into());
        }

        let mut remaining = time_remaining_seconds.clamp(0, turn.time_limit);
        if turn.started_at.is_some() {
            remaining = remaining.min(turn.remaining_seconds(self.ctx.now()));
        }

        let award = award_for_win(remaining);
        let resolution = Resolution::won_by_selection(winner_id.to_string(), award, drawing_ref);
        self.finalize_turn(txn, &turn, resolution)
            .await?
            .ok_or_else(already_finalizing)
    }

    /// Close a turn whose server-side deadline has passed. Any member may call.
    pub async fn time_up(
        &self,
        txn: &DatabaseTransaction,
        turn_id: i64,
        user_id: &str,
        drawing_ref: Option<String>,
    ) -> Result<FlowOutcome<Turn>, AppError> {
        let turn = turns::require_turn(txn, turn_id).await?;
        let access = GameAccess::load(txn, turn.game_id).await?;
        access.require_member(user_id)?;
        require_drawing(&turn)?;

        if turn.started_at.is_none() {
            return Err(DomainError::validation(
                ValidationKind::TimerNotStarted,
                "The clock has not started",
            )
            .into());
        }
        if !turn.is_expired(self.ctx.now()) {
            return Err(DomainError::validation(
                ValidationKind::DeadlineNotReached,
                format!("{} seconds left", turn.remaining_seconds(self.ctx.now())),
            )
            .into());
        }

        self.finalize_turn(txn, &turn, Resolution::timed_out(drawing_ref))
            .await?
            .ok_or_else(already_finalizing)
    }

    /// Attach a stored snapshot to a turn; a replaced snapshot is queued for
    /// cleanup. With `None` only the caller's right to attach is checked.
    pub async fn attach_drawing(
        &self,
        txn: &DatabaseTransaction,
        turn_id: i64,
        user_id: &str,
        drawing_ref: Option<&str>,
    ) -> Result<FlowOutcome<Turn>, AppError> {
        let turn = turns::require_turn(txn, turn_id).await?;
        require_turn_drawer(&turn, user_id)?;
        let Some(drawing_ref) = drawing_ref else {
            return Ok(FlowOutcome::new(turn));
        };

        turns::set_drawing_ref(txn, turn_id, drawing_ref).await?;
        let mut outcome = FlowOutcome::new(turns::require_turn(txn, turn_id).await?);
        if let Some(previous) = turn.drawing_ref.filter(|p| p != drawing_ref) {
            outcome.orphaned_blobs.push(previous);
        }
        Ok(outcome)
    }

    /// Read-only check run before any snapshot bytes are stored. The action's
    /// own transaction still re-checks everything.
    pub async fn authorize_snapshot<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        turn_id: i64,
        user_id: &str,
        uploader: SnapshotUploader,
    ) -> Result<(), AppError> {
        let turn = turns::require_turn(conn, turn_id).await?;
        match uploader {
            SnapshotUploader::Drawer => require_turn_drawer(&turn, user_id),
            SnapshotUploader::Member => GameAccess::load(conn, turn.game_id)
                .await?
                .require_member(user_id)
                .map(|_| ()),
        }
    }

    /// Store snapshot bytes. Failures are logged and swallowed.
    pub async fn store_drawing(&self, bytes: Bytes) -> Option<String> {
        if bytes.is_empty() {
            return None;
        }
        match self.ctx.blobs.store(bytes).await {
            Ok(blob_ref) => Some(blob_ref),
            Err(err) => {
                warn!(error = %err, "drawing snapshot not stored");
                None
            }
        }
    }

    /// Best-effort removal of a snapshot that no row ended up referencing.
    pub async fn discard_drawing(&self, drawing_ref: &str) {
        if let Err(err) = self.ctx.blobs.delete(drawing_ref).await {
            warn!(drawing_ref, error = %err, "unreferenced drawing not removed");
        }
    }

    /// Queue a card top-up for a game the caller belongs to.
    pub async fn request_cards(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        user_id: &str,
        count: Option<usize>,
    ) -> Result<FlowOutcome<usize>, AppError> {
        let access = GameAccess::load(txn, game_id).await?;
        access.require_member(user_id)?;
        if access.game.status == GameStatus::Finished {
            return Err(
                DomainError::validation(ValidationKind::PhaseMismatch, "The game is over").into(),
            );
        }

        let count = count
            .unwrap_or(self.ctx.settings.initial_cards)
            .clamp(1, self.ctx.settings.initial_cards.max(1) * 4);
        let mut outcome = FlowOutcome::new(count);
        outcome.card_requests.push(CardPool::request_generation(
            game_id,
            &access.game.category,
            count,
        ));
        Ok(outcome)
    }
}

fn require_turn_drawer(turn: &Turn, user_id: &str) -> Result<(), AppError> {
    if turn.drawer_id != user_id {
        return Err(AppError::forbidden(
            ErrorCode::NotCurrentDrawer,
            "Only this turn's drawer can do this",
        ));
    }
    Ok(())
}

fn require_drawing(turn: &Turn) -> Result<(), AppError> {
    if turn.status != TurnStatus::Drawing {
        return Err(already_finalizing());
    }
    Ok(())
}

fn already_finalizing() -> AppError {
    DomainError::conflict(
        ConflictKind::TurnAlreadyFinalizing,
        "This turn has already been resolved",
    )
    .into()
}
