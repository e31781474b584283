use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::realtime::RealtimeHub;
use crate::services::context::GameContext;
use crate::services::game_flow::GameFlowService;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Collaborators injected into every game operation
    pub ctx: GameContext,
    /// In-process fan-out feeding the event stream route
    pub realtime: Arc<RealtimeHub>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, ctx: GameContext, realtime: Arc<RealtimeHub>) -> Self {
        Self {
            db: Some(db),
            ctx,
            realtime,
        }
    }

    pub fn without_db(ctx: GameContext, realtime: Arc<RealtimeHub>) -> Self {
        Self {
            db: None,
            ctx,
            realtime,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn game_flow(&self) -> GameFlowService {
        GameFlowService::new(self.ctx.clone())
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("settings", &self.ctx.settings)
            .finish_non_exhaustive()
    }
}
