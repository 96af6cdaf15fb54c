//! Teleport aura integration tests
//!
//! Path generation plus the tick loop against the headless world.

use proptest::prelude::*;
use tick_features::combat::{find_path, AuraPhase, CombatHost, TeleportAura, TickReport};
use tick_features::core::clock::ManualClock;
use tick_features::core::types::{EntityId, Vec3};
use tick_features::scheduler::ClickChannel;
use tick_features::settings::ConfigTree;
use tick_features::simulation::SimWorld;

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn test_ten_blocks_at_half_block_steps() {
    let to = Vec3::new(10.0, 0.0, 0.0);
    let path = find_path(Vec3::ZERO, to, 0.5);

    assert_eq!(path.len(), 20);
    assert!(path.last().unwrap().distance(to) < 1e-9);

    let reversed: Vec<Vec3> = path.iter().rev().copied().collect();
    assert!(reversed[0].distance(to) < 1e-9);
}

fn arb_point() -> impl Strategy<Value = Vec3> {
    (-50.0..50.0, -10.0..10.0, -50.0..50.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn prop_path_is_linear_and_mirrors(
        from in arb_point(),
        to in arb_point(),
        offset in 0.1f64..5.0
    ) {
        let distance = (to - from).length();
        prop_assume!(distance > 1e-6);

        let path = find_path(from, to, offset);
        prop_assert_eq!(path.len(), (distance / offset).ceil() as usize);
        prop_assert!(path.last().unwrap().distance(to) < 1e-6);

        let mut previous = 0.0;
        for waypoint in &path {
            let travelled = waypoint.distance(from);
            prop_assert!(travelled > previous);
            prop_assert!(travelled - previous <= offset + 1e-6);
            previous = travelled;
        }

        let round_trip: Vec<Vec3> = path.iter().chain(path.iter().rev()).copied().collect();
        let mirrored: Vec<Vec3> = round_trip.iter().rev().copied().collect();
        prop_assert_eq!(round_trip, mirrored);
    }
}

// ---------------------------------------------------------------------------
// Tick loop
// ---------------------------------------------------------------------------

struct Harness {
    clock: ManualClock,
    tree: ConfigTree,
    aura: TeleportAura,
    world: SimWorld,
}

impl Harness {
    fn new(enabled: bool) -> Self {
        let clock = ManualClock::new(0);
        let channel = ClickChannel::new(clock.clone());
        let mut tree = ConfigTree::new();
        let aura = TeleportAura::register(&mut tree, enabled, channel, 17).unwrap();
        Self {
            clock,
            tree,
            aura,
            world: SimWorld::new(Vec3::ZERO),
        }
    }

    fn step(&mut self) -> TickReport {
        self.clock.advance(50);
        self.world.tick();
        self.aura.on_tick(&self.tree, &mut self.world)
    }

    /// Step until the next tick that sends packets
    fn next_run(&mut self, limit: usize) -> Option<TickReport> {
        (0..limit).map(|_| self.step()).find(|report| report.packets > 0)
    }

    fn spawn(&mut self, x: f64) -> EntityId {
        self.world.spawn_enemy(Vec3::new(x, 0.0, 0.0), 1_000.0)
    }
}

#[test]
fn test_run_goes_out_and_comes_back() {
    let mut harness = Harness::new(true);
    harness.spawn(5.0);

    let report = harness.step();
    assert_eq!(report.packets, 20);
    assert_eq!(report.attacks, 1);
    assert_eq!(report.phase, AuraPhase::Cooldown { remaining: 10 });

    let packets = harness.world.packets();
    assert!(packets[9].distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-9);
    // The return leg mirrors the approach
    for i in 0..10 {
        assert_eq!(packets[i], packets[19 - i]);
    }
    assert_eq!(harness.world.player_position(), Vec3::ZERO);
}

#[test]
fn test_rest_ticks_between_runs() {
    let mut harness = Harness::new(true);
    harness.spawn(5.0);
    harness.step();

    for remaining in (0..10).rev() {
        let report = harness.step();
        assert_eq!(report.packets, 0);
        assert_eq!(report.phase, AuraPhase::Cooldown { remaining });
    }
    assert_eq!(harness.step().packets, 20);
}

#[test]
fn test_nearest_enemy_locked_until_invalid() {
    let mut harness = Harness::new(true);
    let near = harness.spawn(4.0);
    let far = harness.spawn(8.0);

    harness.step();
    assert_eq!(harness.aura.tracker().locked_on_target(), Some(near));

    // A closer enemy does not steal a valid lock
    harness.world.enemy_mut(far).unwrap().position = Vec3::new(2.0, 0.0, 0.0);
    harness.next_run(20).unwrap();
    assert_eq!(harness.aura.tracker().locked_on_target(), Some(near));

    harness.world.enemy_mut(near).unwrap().health = 0.0;
    harness.next_run(20).unwrap();
    assert_eq!(harness.aura.tracker().locked_on_target(), Some(far));
}

#[test]
fn test_unattackable_and_distant_enemies_ignored() {
    let mut harness = Harness::new(true);
    let friend = harness.spawn(3.0);
    harness.world.enemy_mut(friend).unwrap().attackable = false;
    harness.spawn(51.0);

    assert!(harness.next_run(30).is_none());
    assert!(harness.world.packets().is_empty());
    assert_eq!(harness.aura.phase(), AuraPhase::Idle);
}

#[test]
fn test_target_leaving_range_drops_lock() {
    let mut harness = Harness::new(true);
    let enemy = harness.spawn(5.0);
    harness.step();
    assert_eq!(harness.aura.tracker().locked_on_target(), Some(enemy));

    harness.world.enemy_mut(enemy).unwrap().position = Vec3::new(60.0, 0.0, 0.0);
    assert!(harness.next_run(30).is_none());
    assert_eq!(harness.aura.tracker().locked_on_target(), None);
}

#[test]
fn test_packet_budget_aborts_before_sending() {
    let mut harness = Harness::new(true);
    let packets = harness.aura.settings().maximum_packets;
    harness.tree.set_int(packets, 19).unwrap();
    harness.spawn(10.0);

    let report = harness.step();
    assert_eq!(report, TickReport { packets: 0, attacks: 0, phase: AuraPhase::Idle });
    assert!(harness.world.packets().is_empty());
    assert_eq!(harness.aura.tracker().locked_on_target(), None);

    harness.tree.set_int(packets, 20).unwrap();
    assert_eq!(harness.step().packets, 40);
}

#[test]
fn test_enemy_on_top_of_player_keeps_lock() {
    let mut harness = Harness::new(true);
    let enemy = harness.spawn(0.0);

    let report = harness.step();
    assert_eq!(report.packets, 0);
    assert_eq!(report.phase, AuraPhase::Idle);
    assert_eq!(harness.aura.tracker().locked_on_target(), Some(enemy));
}

#[test]
fn test_disabling_resets_loop() {
    let mut harness = Harness::new(true);
    harness.spawn(5.0);
    harness.step();
    assert!(matches!(harness.aura.phase(), AuraPhase::Cooldown { .. }));

    let feature = harness.aura.feature();
    harness.tree.set_enabled(feature, false).unwrap();
    let report = harness.step();
    assert_eq!(report.phase, AuraPhase::Idle);
    assert_eq!(harness.aura.tracker().locked_on_target(), None);

    // No leftover rest after re-enabling
    harness.tree.set_enabled(feature, true).unwrap();
    assert_eq!(harness.step().packets, 20);
}

#[test]
fn test_disabled_feature_sends_nothing() {
    let mut harness = Harness::new(false);
    harness.spawn(5.0);
    assert!(harness.next_run(50).is_none());
    assert_eq!(harness.world.attacks(), 0);
}

#[test]
fn test_cooldown_gates_attacks() {
    let mut harness = Harness::new(true);
    harness.spawn(5.0);
    harness.world.attack_recharge_ticks = 1_000;

    // First attack lands on a fully charged cooldown, later runs find it
    // still recharging
    let mut attacks = 0;
    for _ in 0..100 {
        attacks += harness.step().attacks;
    }
    assert_eq!(attacks, 1);

    let cooldown = harness.aura.cooldown().node;
    harness.tree.set_enabled(cooldown, false).unwrap();
    let mut attacks = 0;
    for _ in 0..100 {
        attacks += harness.step().attacks;
    }
    assert!(attacks > 1);
}
