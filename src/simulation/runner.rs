//! Headless driver: one config tree, one host, simulated time
//!
//! Tick order mirrors the host: advance time, host state, then events
//! (game tick, safe-walk query, movement input) and finally the aura.

use serde::Serialize;

use crate::combat::TeleportAura;
use crate::core::clock::ManualClock;
use crate::core::error::Result;
use crate::events::{DirectionalInput, Event, MovementInputEvent, SafeWalkEvent};
use crate::features::{SafeWalk, SilentHotbar};
use crate::scheduler::ClickChannel;
use crate::settings::node::NodeSnapshot;
use crate::settings::ConfigTree;
use crate::simulation::scenario::Scenario;
use crate::simulation::world::SimWorld;

/// Slot the player holds client-side
const CLIENT_SLOT: u8 = 4;
/// Slot the aura swaps to server-side while attacking
const WEAPON_SLOT: u8 = 0;

/// Summary of a headless run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub ticks: u64,
    pub simulated_ms: u64,
    /// Attacks issued by the aura
    pub attacks: u32,
    /// Position packets sent
    pub packets: usize,
    /// Ticks in which the aura completed a teleport run
    pub runs: u32,
    pub kills: usize,
    /// Attacks per simulated second
    pub attack_rate: f64,
    pub final_stamina: i32,
    /// Ticks in which SafeWalk asked the host for ledge protection
    pub safe_walk_ticks: u64,
    /// Ticks in which SafeWalk cancelled movement input
    pub cancelled_movement_ticks: u64,
    /// Ticks in which the server saw the weapon slot
    pub weapon_slot_ticks: u64,
}

pub struct Simulation {
    scenario: Scenario,
    clock: ManualClock,
    tree: ConfigTree,
    aura: TeleportAura,
    safe_walk: SafeWalk,
    hotbar: SilentHotbar,
    world: SimWorld,
    report: RunReport,
}

impl Simulation {
    pub fn new(scenario: &Scenario) -> Result<Self> {
        scenario.validate()?;

        let clock = ManualClock::new(0);
        let channel = ClickChannel::new(clock.clone());
        let mut tree = ConfigTree::new();
        let aura = TeleportAura::register(&mut tree, true, channel, scenario.seed)?;
        let safe_walk = SafeWalk::register(&mut tree, true)?;

        let settings = *aura.settings();
        tree.set_int_range(settings.scheduler.cps, scenario.cps[0]..=scenario.cps[1])?;
        tree.set_int(settings.scheduler.stamina_decrement, scenario.stamina_decrement)?;
        tree.set_float(settings.maximum_range, scenario.maximum_range)?;
        tree.set_float(settings.teleport_offset, scenario.teleport_offset)?;
        tree.set_enabled(aura.cooldown().node, scenario.cooldown)?;
        tree.select_by_name(safe_walk.mode, &scenario.safe_walk_mode)?;

        let mut world = SimWorld::new(scenario.player_position());
        for enemy in &scenario.enemies {
            world.spawn_enemy(enemy.position(), enemy.health);
        }

        Ok(Self {
            report: RunReport {
                scenario: scenario.name.clone(),
                ..RunReport::default()
            },
            scenario: scenario.clone(),
            clock,
            tree,
            aura,
            safe_walk,
            hotbar: SilentHotbar::new(),
            world,
        })
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ConfigTree {
        &mut self.tree
    }

    pub fn aura(&self) -> &TeleportAura {
        &self.aura
    }

    pub fn safe_walk(&self) -> &SafeWalk {
        &self.safe_walk
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    /// Snapshot of every root of the config tree
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.tree
            .roots()
            .iter()
            .map(|root| self.tree.snapshot(*root))
            .collect()
    }

    /// Advance one host tick
    pub fn step(&mut self) {
        self.clock.advance(self.scenario.tick_ms);
        self.world.tick();
        self.hotbar.on_tick();
        self.report.ticks += 1;

        self.tree.dispatch(&mut Event::GameTick);

        let mut safe_walk = Event::SafeWalk(SafeWalkEvent::default());
        self.tree.dispatch(&mut safe_walk);
        if matches!(safe_walk, Event::SafeWalk(SafeWalkEvent { is_safe_walk: true })) {
            self.report.safe_walk_ticks += 1;
        }

        let mut movement = Event::MovementInput(MovementInputEvent {
            player: &self.world,
            directional_input: DirectionalInput::FORWARDS,
            jumping: false,
        });
        self.tree.dispatch(&mut movement);
        if let Event::MovementInput(event) = &movement {
            if !event.directional_input.is_moving() {
                self.report.cancelled_movement_ticks += 1;
            }
        }

        let tick = self.aura.on_tick(&self.tree, &mut self.world);
        if tick.attacks > 0 {
            self.hotbar.select_slot(self.aura.feature(), WEAPON_SLOT);
        }
        if tick.packets > 0 {
            self.report.runs += 1;
        }
        if self.hotbar.serverside_slot(CLIENT_SLOT) == WEAPON_SLOT {
            self.report.weapon_slot_ticks += 1;
        }
    }

    /// Run every remaining tick of the scenario and report
    pub fn run(mut self) -> RunReport {
        tracing::info!(
            scenario = %self.scenario.name,
            ticks = self.scenario.ticks,
            "starting run"
        );
        while self.report.ticks < self.scenario.ticks {
            self.step();
        }
        let report = self.report();
        tracing::info!(
            attacks = report.attacks,
            kills = report.kills,
            packets = report.packets,
            "run complete"
        );
        report
    }

    /// Report for the ticks run so far
    pub fn report(&self) -> RunReport {
        let simulated_ms = self.report.ticks * self.scenario.tick_ms;
        let attacks = self.world.attacks();
        let attack_rate = if simulated_ms == 0 {
            0.0
        } else {
            attacks as f64 * 1000.0 / simulated_ms as f64
        };

        RunReport {
            simulated_ms,
            attacks,
            packets: self.world.packets().len(),
            kills: self.world.kills(),
            attack_rate,
            final_stamina: self.aura.scheduler().stamina(),
            ..self.report.clone()
        }
    }
}

/// Build a simulation for `scenario`, run it to completion and report
pub fn run_scenario(scenario: &Scenario) -> Result<RunReport> {
    Ok(Simulation::new(scenario)?.run())
}
