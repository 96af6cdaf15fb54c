//! Target selection and locking

use ordered_float::OrderedFloat;

use crate::combat::host::{CombatHost, EnemySnapshot};
use crate::core::types::EntityId;

/// Keeps the currently locked target between ticks
#[derive(Debug, Clone, Default)]
pub struct TargetTracker {
    locked: Option<EntityId>,
}

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked_on_target(&self) -> Option<EntityId> {
        self.locked
    }

    pub fn lock(&mut self, target: EntityId) {
        if self.locked != Some(target) {
            tracing::debug!(entity = ?target, "target locked");
        }
        self.locked = Some(target);
    }

    pub fn cleanup(&mut self) {
        self.locked = None;
    }

    /// Drop the lock unless the locked enemy still exists and passes
    /// `predicate`, returning the surviving snapshot
    pub fn validate_lock<H, P>(&mut self, host: &H, predicate: P) -> Option<EnemySnapshot>
    where
        H: CombatHost + ?Sized,
        P: Fn(&EnemySnapshot) -> bool,
    {
        let id = self.locked?;
        match host.enemy(id).filter(|enemy| predicate(enemy)) {
            Some(enemy) => Some(enemy),
            None => {
                tracing::debug!(entity = ?id, "target lock dropped");
                self.locked = None;
                None
            }
        }
    }

    /// Living, attackable enemies, nearest first
    pub fn enemies<H: CombatHost + ?Sized>(&self, host: &H) -> Vec<EnemySnapshot> {
        let origin = host.player_position();
        let mut enemies: Vec<_> = host
            .enemies()
            .into_iter()
            .filter(|enemy| enemy.alive && enemy.attackable)
            .collect();
        enemies.sort_by_key(|enemy| OrderedFloat(enemy.position.distance(origin)));
        enemies
    }
}
