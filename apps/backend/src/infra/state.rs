use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::blobs::{BlobStore, FsBlobStore};
use crate::clock::{Clock, SystemClock};
use crate::config::db::DbProfile;
use crate::config::game::GameSettings;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::oracles::{
    CardGenerator, ExactOnlyJudge, GuessJudge, HttpCardGenerator, HttpGuessJudge,
    StaticLibraryGenerator,
};
use crate::realtime::{ChangePublisher, RealtimeHub};
use crate::services::context::GameContext;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
#[derive(Default)]
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    connection: Option<DatabaseConnection>,
    settings: Option<GameSettings>,
    judge: Option<Arc<dyn GuessJudge>>,
    generator: Option<Arc<dyn CardGenerator>>,
    publisher: Option<Arc<dyn ChangePublisher>>,
    blobs: Option<Arc<dyn BlobStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Use an already-migrated connection instead of bootstrapping one.
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.connection = Some(conn);
        self
    }

    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_judge(mut self, judge: Arc<dyn GuessJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn CardGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replace the publisher. The realtime hub still exists for the event
    /// stream route but no longer receives game events.
    pub fn with_publisher(mut self, publisher: Arc<dyn ChangePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let settings = self.settings.unwrap_or_default();

        let judge: Arc<dyn GuessJudge> = match self.judge {
            Some(judge) => judge,
            None => match &settings.judge_url {
                Some(url) => Arc::new(
                    HttpGuessJudge::new(url.clone(), settings.judge_timeout)
                        .map_err(|e| AppError::config(format!("judge client: {e}")))?,
                ),
                None => Arc::new(ExactOnlyJudge),
            },
        };
        let generator: Arc<dyn CardGenerator> = match self.generator {
            Some(generator) => generator,
            None => match &settings.generator_url {
                Some(url) => Arc::new(
                    HttpCardGenerator::new(url.clone(), settings.generator_timeout)
                        .map_err(|e| AppError::config(format!("generator client: {e}")))?,
                ),
                None => Arc::new(StaticLibraryGenerator),
            },
        };

        let realtime = Arc::new(RealtimeHub::new());
        let publisher = self
            .publisher
            .unwrap_or_else(|| realtime.clone() as Arc<dyn ChangePublisher>);
        let blobs = self.blobs.unwrap_or_else(|| {
            Arc::new(FsBlobStore::new(
                settings.blob_dir.clone(),
                settings.blob_base_url.clone(),
            ))
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        info!(
            judge = settings.judge_url.is_some(),
            generator = settings.generator_url.is_some(),
            "game context ready"
        );

        let ctx = GameContext {
            judge,
            generator,
            publisher,
            blobs,
            clock,
            settings,
        };

        let conn = match (self.connection, self.db_profile) {
            (Some(conn), _) => Some(conn),
            // single entrypoint: build + migrate
            (None, Some(profile)) => Some(bootstrap_db(profile).await?),
            (None, None) => None,
        };

        Ok(match conn {
            Some(conn) => AppState::new(conn, ctx, realtime),
            None => AppState::without_db(ctx, realtime),
        })
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
