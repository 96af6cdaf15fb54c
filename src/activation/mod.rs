//! Activation propagation: features, toggles and exclusive choices

pub mod behavior;
pub mod choice;
pub mod toggle;

pub use behavior::{Behavior, Inert, NodeContext, NoneChoice};
pub use choice::{ChoiceBuilder, ChoiceList};
pub use toggle::ENABLED;
