//! Teleport aura: the per-tick orchestration loop
//!
//! Each tick: find or keep a target, teleport to it along a straight path,
//! attack as often as the click scheduler allows, teleport back, then rest.
//! Waiting is an early return; the next tick resumes where this one left
//! off.

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::activation::Inert;
use crate::combat::cooldown::AttackCooldown;
use crate::combat::host::{CombatHost, EnemySnapshot};
use crate::combat::path::find_path;
use crate::combat::target::TargetTracker;
use crate::core::config::timing;
use crate::core::error::Result;
use crate::core::types::NodeId;
use crate::scheduler::{ClickChannel, CpsScheduler, SchedulerSettings};
use crate::settings::tree::{ConfigTree, FloatId, IntId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuraPhase {
    /// No target
    Idle,
    /// Target locked, validated against liveness and range
    Targeting,
    /// Replaying waypoints toward the target
    Approaching,
    /// Attacking as scheduled
    Acting,
    /// Replaying waypoints back
    Returning,
    /// Resting; `remaining` quiet ticks before the next run
    Cooldown { remaining: u32 },
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub packets: usize,
    pub attacks: u32,
    pub phase: AuraPhase,
}

impl TickReport {
    fn quiet(phase: AuraPhase) -> Self {
        Self {
            packets: 0,
            attacks: 0,
            phase,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AuraSettings {
    pub feature: NodeId,
    pub maximum_range: FloatId,
    pub maximum_packets: IntId,
    pub teleport_offset: FloatId,
    pub scheduler: SchedulerSettings,
}

pub struct TeleportAura {
    settings: AuraSettings,
    cooldown: AttackCooldown,
    tracker: TargetTracker,
    scheduler: CpsScheduler,
    rng: ChaCha8Rng,
    phase: AuraPhase,
}

impl TeleportAura {
    pub const NAME: &'static str = "TpAura";

    pub fn register(
        tree: &mut ConfigTree,
        enabled: bool,
        channel: Rc<ClickChannel>,
        seed: u64,
    ) -> Result<Self> {
        let feature = tree.add_feature(Self::NAME, enabled, Box::new(Inert))?;
        let maximum_range = tree.add_float(feature, "MaximumRange", 50.0, 5.0..=50.0)?;
        let maximum_packets = tree.add_int(feature, "MaximumPackets", 100, 1..=200)?;
        let teleport_offset = tree.add_float(feature, "TeleportOffset", 0.5, 0.1..=5.0)?;
        let scheduler_settings = SchedulerSettings::register(tree, feature, 6..=10)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cooldown = AttackCooldown::register(tree, feature, &mut rng)?;
        let mut scheduler = CpsScheduler::with_seed(channel, 6..=10, rng.gen());
        scheduler_settings.apply(tree, &mut scheduler);

        Ok(Self {
            settings: AuraSettings {
                feature,
                maximum_range,
                maximum_packets,
                teleport_offset,
                scheduler: scheduler_settings,
            },
            cooldown,
            tracker: TargetTracker::new(),
            scheduler,
            rng,
            phase: AuraPhase::Idle,
        })
    }

    pub fn feature(&self) -> NodeId {
        self.settings.feature
    }

    pub fn settings(&self) -> &AuraSettings {
        &self.settings
    }

    pub fn cooldown(&self) -> &AttackCooldown {
        &self.cooldown
    }

    pub fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    pub fn scheduler(&self) -> &CpsScheduler {
        &self.scheduler
    }

    pub fn phase(&self) -> AuraPhase {
        self.phase
    }

    pub fn on_tick<H: CombatHost + ?Sized>(&mut self, tree: &ConfigTree, host: &mut H) -> TickReport {
        if !tree.handles_events(self.settings.feature) {
            self.tracker.cleanup();
            self.phase = AuraPhase::Idle;
            return TickReport::quiet(self.phase);
        }

        if let AuraPhase::Cooldown { remaining } = self.phase {
            if remaining > 0 {
                self.phase = AuraPhase::Cooldown {
                    remaining: remaining - 1,
                };
                return TickReport::quiet(self.phase);
            }
            self.phase = AuraPhase::Idle;
        }

        self.settings.scheduler.apply(tree, &mut self.scheduler);

        // Targeting
        let Some(target) = self.acquire_target(tree, host) else {
            self.phase = AuraPhase::Idle;
            return TickReport::quiet(self.phase);
        };
        self.tracker.lock(target.id);
        self.phase = AuraPhase::Targeting;

        // Approaching
        let offset = tree.get_float(self.settings.teleport_offset) as f64;
        let path = find_path(host.player_position(), target.position, offset);
        if path.is_empty() {
            self.phase = AuraPhase::Idle;
            return TickReport::quiet(self.phase);
        }
        let maximum_packets = tree.get_int(self.settings.maximum_packets).max(0) as usize;
        if path.len() > maximum_packets {
            tracing::debug!(
                waypoints = path.len(),
                maximum_packets,
                "path exceeds packet budget, dropping target"
            );
            self.tracker.cleanup();
            self.phase = AuraPhase::Idle;
            return TickReport::quiet(self.phase);
        }

        self.phase = AuraPhase::Approaching;
        for position in &path {
            host.send_position(*position, true);
        }

        // Acting
        self.phase = AuraPhase::Acting;
        let cooldown = &self.cooldown;
        let attacks = self
            .scheduler
            .clicks(|| cooldown.ready_to_attack(tree, host.attack_cooldown_progress()));
        for _ in 0..attacks {
            host.attack(target.id);
        }
        if attacks > 0 {
            self.cooldown.new_cooldown(tree, &mut self.rng);
        }

        // Returning
        self.phase = AuraPhase::Returning;
        for position in path.iter().rev() {
            host.send_position(*position, true);
        }

        tracing::debug!(waypoints = path.len(), attacks, "aura run complete");

        self.phase = AuraPhase::Cooldown {
            remaining: timing().aura_rest_ticks,
        };
        TickReport {
            packets: path.len() * 2,
            attacks,
            phase: self.phase,
        }
    }

    fn acquire_target<H: CombatHost + ?Sized>(
        &mut self,
        tree: &ConfigTree,
        host: &H,
    ) -> Option<EnemySnapshot> {
        let maximum_range = tree.get_float(self.settings.maximum_range) as f64;
        let origin = host.player_position();
        let in_range = |enemy: &EnemySnapshot| enemy.position.distance(origin) <= maximum_range;

        self.tracker
            .validate_lock(host, |enemy| enemy.alive && enemy.attackable && in_range(enemy))
            .or_else(|| {
                self.tracker
                    .enemies(host)
                    .into_iter()
                    .find(|enemy| in_range(enemy))
            })
    }
}
