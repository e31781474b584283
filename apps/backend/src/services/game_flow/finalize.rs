//! Shared turn tail: claim, score, advance.
//!
//! Guess wins, manual winner selection, timeouts and drawer departures all
//! end here. The conditional status write is the lock token: whoever moves
//! the turn out of `drawing` first scores it, everyone else gets `None`.

use sea_orm::DatabaseTransaction;
use tracing::{debug, info};

use super::{FlowOutcome, GameFlowService};
use crate::domain::rotation::{plan_advance, plan_after_departure, Advance};
use crate::domain::scoring::TurnAward;
use crate::entities::games::GameStatus;
use crate::entities::turns::TurnStatus;
use crate::error::AppError;
use crate::realtime::ChangeEvent;
use crate::repos::games::{self, Game, GameUpdate};
use crate::repos::players;
use crate::repos::turns::{self, Turn, TurnFinish};

/// How a turn ends.
#[derive(Debug, Clone)]
pub(super) struct Resolution {
    pub final_status: TurnStatus,
    /// Pass through `completing` before the terminal status (guess path).
    pub via_completing: bool,
    pub winner_id: Option<String>,
    pub award: TurnAward,
    pub drawing_ref: Option<String>,
}

impl Resolution {
    pub fn won_by_guess(winner_id: String, award: TurnAward) -> Self {
        Self {
            final_status: TurnStatus::Completed,
            via_completing: true,
            winner_id: Some(winner_id),
            award,
            drawing_ref: None,
        }
    }

    pub fn won_by_selection(winner_id: String, award: TurnAward, drawing_ref: Option<String>) -> Self {
        Self {
            final_status: TurnStatus::Completed,
            via_completing: false,
            winner_id: Some(winner_id),
            award,
            drawing_ref,
        }
    }

    pub fn timed_out(drawing_ref: Option<String>) -> Self {
        Self {
            final_status: TurnStatus::TimeUp,
            via_completing: false,
            winner_id: None,
            award: TurnAward::NONE,
            drawing_ref,
        }
    }
}

impl GameFlowService {
    /// Close `turn` with `resolution`, apply scores and move the game on.
    ///
    /// Returns `None` if another caller already moved the turn out of
    /// `drawing`; nothing is written in that case.
    pub(super) async fn finalize_turn(
        &self,
        txn: &DatabaseTransaction,
        turn: &Turn,
        resolution: Resolution,
    ) -> Result<Option<FlowOutcome<Turn>>, AppError> {
        let Some(finished) = self.close_turn(txn, turn, resolution).await? else {
            return Ok(None);
        };

        let mut outcome = FlowOutcome::new(finished.clone());
        let game = games::require_game(txn, finished.game_id).await?;
        let advanced = self.advance_after_turn(txn, game, &finished).await?;
        outcome.absorb(advanced);
        Ok(Some(outcome))
    }

    /// Claim and persist the turn's terminal state plus score increments.
    pub(super) async fn close_turn(
        &self,
        txn: &DatabaseTransaction,
        turn: &Turn,
        resolution: Resolution,
    ) -> Result<Option<Turn>, AppError> {
        let claimed_status = if resolution.via_completing {
            if !turns::claim_from_drawing(txn, turn.id, TurnStatus::Completing).await? {
                debug!(turn_id = turn.id, "finalize lost: turn already left drawing");
                return Ok(None);
            }
            TurnStatus::Completing
        } else {
            TurnStatus::Drawing
        };

        let won = resolution.winner_id.is_some();
        let finished = turns::finish_turn(
            txn,
            TurnFinish {
                turn_id: turn.id,
                claimed_status,
                final_status: resolution.final_status,
                completed_at: self.ctx.now(),
                winner_id: resolution.winner_id.clone(),
                points_awarded: resolution.award.guesser_points,
                drawer_points_awarded: resolution.award.drawer_points,
                correct_guesses_delta: i32::from(won),
                drawing_ref: resolution.drawing_ref,
            },
        )
        .await?;
        if !finished {
            debug!(turn_id = turn.id, "finalize lost: turn already left drawing");
            return Ok(None);
        }

        if let Some(winner_id) = &resolution.winner_id {
            players::add_score(
                txn,
                turn.game_id,
                winner_id,
                resolution.award.guesser_points,
                true,
            )
            .await?;
        }
        if resolution.award.drawer_points > 0 {
            players::add_score(
                txn,
                turn.game_id,
                &turn.drawer_id,
                resolution.award.drawer_points,
                false,
            )
            .await?;
        }

        info!(
            game_id = turn.game_id,
            turn_id = turn.id,
            status = ?resolution.final_status,
            winner_id = resolution.winner_id.as_deref().unwrap_or("-"),
            points = resolution.award.guesser_points,
            drawer_points = resolution.award.drawer_points,
            "turn finalized"
        );

        Ok(Some(turns::require_turn(txn, turn.id).await?))
    }

    /// Rotate the drawer, open the next round, or finish the game.
    pub(super) async fn advance_after_turn(
        &self,
        txn: &DatabaseTransaction,
        game: Game,
        finished: &Turn,
    ) -> Result<FlowOutcome<Option<Advance>>, AppError> {
        if game.status != GameStatus::Started {
            return Ok(FlowOutcome::new(None).event(turn_ended(finished)));
        }

        let roster: Vec<String> = players::list_players(txn, game.id)
            .await?
            .into_iter()
            .map(|p| p.player_id)
            .collect();
        let drawn = turns::drawers_in_round(txn, game.id, finished.round).await?;
        let opener = turns::first_drawer_in_round(txn, game.id, finished.round).await?;

        let plan = plan_advance(
            &roster,
            game.round,
            game.max_rounds,
            &drawn,
            &finished.drawer_id,
            opener.as_deref(),
        );
        self.apply_advance(txn, game, plan, Some(finished)).await
    }

    /// Advance after the current drawer left. `roster_before` still lists
    /// them; `closed` is their turn if one was in progress.
    pub(super) async fn advance_after_departure(
        &self,
        txn: &DatabaseTransaction,
        game: Game,
        roster_before: &[String],
        departed: &str,
        closed: Option<&Turn>,
    ) -> Result<FlowOutcome<Option<Advance>>, AppError> {
        let drawn = turns::drawers_in_round(txn, game.id, game.round).await?;
        let opener = turns::first_drawer_in_round(txn, game.id, game.round).await?;
        let plan = plan_after_departure(
            roster_before,
            departed,
            game.round,
            game.max_rounds,
            &drawn,
            opener.as_deref(),
        );
        self.apply_advance(txn, game, plan, closed).await
    }

    async fn apply_advance(
        &self,
        txn: &DatabaseTransaction,
        game: Game,
        plan: Option<Advance>,
        finished: Option<&Turn>,
    ) -> Result<FlowOutcome<Option<Advance>>, AppError> {
        let now = self.ctx.now();
        let update = GameUpdate::new(game.id, game.version, now);
        let update = match &plan {
            Some(Advance::NextDrawer { next_drawer }) => {
                update.with_current_drawer(Some(next_drawer.clone()))
            }
            Some(Advance::NextRound { round, next_drawer }) => update
                .with_round(*round)
                .with_current_drawer(Some(next_drawer.clone())),
            Some(Advance::Finished { .. }) | None => update
                .with_status(GameStatus::Finished)
                .with_current_drawer(None)
                .with_finished_at(now),
        };
        let updated = games::update_game(txn, update).await?;

        match &plan {
            Some(Advance::NextDrawer { next_drawer }) => {
                info!(game_id = game.id, round = updated.round, next_drawer, "drawer rotated");
            }
            Some(Advance::NextRound { round, next_drawer }) => {
                info!(game_id = game.id, round, next_drawer, "round advanced");
            }
            Some(Advance::Finished { .. }) | None => {
                info!(game_id = game.id, rounds = game.max_rounds, "game finished");
            }
        }

        let mut outcome = FlowOutcome::new(plan);
        outcome.events.extend(finished.map(turn_ended));
        Ok(outcome.event(ChangeEvent::GameUpdated {
            game_id: updated.id,
            version: updated.version,
        }))
    }
}

fn turn_ended(turn: &Turn) -> ChangeEvent {
    ChangeEvent::TurnEnded {
        game_id: turn.game_id,
        turn_id: turn.id,
        winner_id: turn.winner_id.clone(),
    }
}
