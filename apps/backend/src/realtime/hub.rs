use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use super::events::{ChangeEvent, Topic};

/// Buffered events per topic before slow subscribers start lagging.
const TOPIC_CAPACITY: usize = 64;

/// Fire-and-forget change fan-out.
pub trait ChangePublisher: Send + Sync {
    fn notify(&self, topic: &Topic, event: &ChangeEvent);
}

/// Publisher that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl ChangePublisher for NullPublisher {
    fn notify(&self, _topic: &Topic, _event: &ChangeEvent) {}
}

/// In-process topic registry backed by broadcast channels.
#[derive(Debug, Default)]
pub struct RealtimeHub {
    topics: DashMap<Topic, broadcast::Sender<ChangeEvent>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<ChangeEvent> {
        self.topics
            .entry(topic)
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Drop topics nobody listens to anymore.
    pub fn prune(&self) {
        self.topics.retain(|_, sender| sender.receiver_count() > 0);
    }
}

impl ChangePublisher for RealtimeHub {
    fn notify(&self, topic: &Topic, event: &ChangeEvent) {
        let Some(sender) = self.topics.get(topic) else {
            return;
        };
        if sender.send(event.clone()).is_err() {
            drop(sender);
            self.topics.remove_if(topic, |_, s| s.receiver_count() == 0);
            debug!(?topic, "topic has no subscribers; removed");
        }
    }
}
