//! Authorization checks for game operations.
//!
//! Loads the game and roster once, then answers the predicates in
//! `domain::permissions` as `AppError`s (403).

use sea_orm::ConnectionTrait;

use crate::domain::permissions;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::games::{self, Game};
use crate::repos::players::{self, Player};

/// A game and its roster, as seen by one operation.
#[derive(Debug, Clone)]
pub struct GameAccess {
    pub game: Game,
    pub roster: Vec<Player>,
}

impl GameAccess {
    pub async fn load<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        game_id: i64,
    ) -> Result<Self, AppError> {
        let game = games::require_game(conn, game_id).await?;
        let roster = players::list_players(conn, game_id).await?;
        Ok(Self { game, roster })
    }

    /// Player ids in join order.
    pub fn roster_ids(&self) -> Vec<String> {
        self.roster.iter().map(|p| p.player_id.clone()).collect()
    }

    pub fn member(&self, user_id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.player_id == user_id)
    }

    pub fn require_member(&self, user_id: &str) -> Result<&Player, AppError> {
        self.member(user_id).ok_or_else(|| {
            AppError::forbidden(
                ErrorCode::NotAMember,
                format!("You are not a player in game {}", self.game.id),
            )
        })
    }

    pub fn require_host(&self, user_id: &str) -> Result<(), AppError> {
        self.require_member(user_id)?;
        if !permissions::is_host(&self.roster, user_id) {
            return Err(AppError::forbidden(
                ErrorCode::NotHost,
                "Only the host can do this",
            ));
        }
        Ok(())
    }

    pub fn require_current_drawer(&self, user_id: &str) -> Result<(), AppError> {
        self.require_member(user_id)?;
        if !permissions::is_current_drawer(&self.game, user_id) {
            return Err(AppError::forbidden(
                ErrorCode::NotCurrentDrawer,
                "Only the current drawer can do this",
            ));
        }
        Ok(())
    }

    pub fn require_can_guess(&self, user_id: &str) -> Result<(), AppError> {
        self.require_member(user_id)?;
        if !permissions::can_guess(&self.game, &self.roster, user_id) {
            return Err(AppError::forbidden(
                ErrorCode::DrawerCannotGuess,
                "The drawer cannot guess their own word",
            ));
        }
        Ok(())
    }
}
