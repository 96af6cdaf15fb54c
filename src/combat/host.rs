//! What the orchestration loop needs from the host simulation

use crate::core::types::{EntityId, Vec3};

/// Snapshot of an enemy as seen this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    pub id: EntityId,
    pub position: Vec3,
    pub alive: bool,
    /// Host-side filter (teammates, invisible players, ...)
    pub attackable: bool,
}

pub trait CombatHost {
    fn player_position(&self) -> Vec3;

    fn enemies(&self) -> Vec<EnemySnapshot>;

    fn enemy(&self, id: EntityId) -> Option<EnemySnapshot> {
        self.enemies().into_iter().find(|enemy| enemy.id == id)
    }

    /// Attack cooldown progress, 0.0 right after an attack, 1.0 when fully
    /// recharged
    fn attack_cooldown_progress(&self) -> f32;

    /// Queue a position packet
    fn send_position(&mut self, position: Vec3, on_ground: bool);

    fn attack(&mut self, target: EntityId);
}
