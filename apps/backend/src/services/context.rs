use std::fmt;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::blobs::BlobStore;
use crate::clock::Clock;
use crate::config::game::GameSettings;
use crate::oracles::{CardGenerator, GuessJudge};
use crate::realtime::ChangePublisher;

/// Collaborators handed to every game operation.
#[derive(Clone)]
pub struct GameContext {
    pub judge: Arc<dyn GuessJudge>,
    pub generator: Arc<dyn CardGenerator>,
    pub publisher: Arc<dyn ChangePublisher>,
    pub blobs: Arc<dyn BlobStore>,
    pub clock: Arc<dyn Clock>,
    pub settings: GameSettings,
}

impl GameContext {
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}

impl fmt::Debug for GameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
