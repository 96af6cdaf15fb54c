//! Teleport-aura combat loop and its host interface

pub mod cooldown;
pub mod host;
pub mod path;
pub mod target;
pub mod tp_aura;

pub use cooldown::AttackCooldown;
pub use host::{CombatHost, EnemySnapshot};
pub use path::find_path;
pub use target::TargetTracker;
pub use tp_aura::{AuraPhase, AuraSettings, TeleportAura, TickReport};
