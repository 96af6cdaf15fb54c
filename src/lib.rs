//! Tick Features - hierarchical feature activation and humanized action timing
//!
//! A config tree of features, toggles and exclusive choice groups whose
//! lifecycle hooks follow the tree's effective state, plus a click
//! scheduler and a teleport-aura loop driven by host ticks.

pub mod activation;
pub mod combat;
pub mod core;
pub mod events;
pub mod features;
pub mod scheduler;
pub mod settings;
pub mod simulation;
