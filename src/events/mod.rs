//! Event contract consumed from the host, and the activity guard

pub mod dispatch;
pub mod types;

pub use types::{DirectionalInput, Event, MovementInputEvent, PlayerView, SafeWalkEvent};
