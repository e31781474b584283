pub mod events;
pub mod hub;

pub use events::{ChangeEvent, Topic};
pub use hub::{ChangePublisher, NullPublisher, RealtimeHub};
