//! SafeWalk integration tests against the headless world

use tick_features::simulation::{Scenario, Simulation};

fn at_edge(mode: &str, z: f64) -> Simulation {
    let scenario = Scenario {
        name: format!("edge-{mode}"),
        ticks: 20,
        safe_walk_mode: mode.into(),
        player: [0.0, 0.0, z],
        enemies: Vec::new(),
        ..Scenario::default()
    };
    Simulation::new(&scenario).unwrap()
}

fn run(simulation: &mut Simulation, ticks: u64) {
    for _ in 0..ticks {
        simulation.step();
    }
}

#[test]
fn test_safe_mode_delegates_to_host() {
    let mut simulation = at_edge("Safe", 31.995);
    run(&mut simulation, 20);
    let report = simulation.report();
    assert_eq!(report.safe_walk_ticks, 20);
    assert_eq!(report.cancelled_movement_ticks, 0);
}

#[test]
fn test_on_edge_cancels_at_the_ledge_only() {
    let mut simulation = at_edge("OnEdge", 31.995);
    run(&mut simulation, 5);
    assert_eq!(simulation.report().cancelled_movement_ticks, 5);
    assert_eq!(simulation.report().safe_walk_ticks, 0);

    simulation.world_mut().player.z = 10.0;
    run(&mut simulation, 5);
    assert_eq!(simulation.report().cancelled_movement_ticks, 5);
}

#[test]
fn test_simulate_looks_ahead() {
    // 0.5 blocks from the edge: OnEdge at its default distance misses it,
    // a 5 tick walk does not
    let mut on_edge = at_edge("OnEdge", 31.5);
    run(&mut on_edge, 5);
    assert_eq!(on_edge.report().cancelled_movement_ticks, 0);

    let mut simulate = at_edge("Simulate", 31.5);
    run(&mut simulate, 5);
    assert_eq!(simulate.report().cancelled_movement_ticks, 5);
}

#[test]
fn test_sneaking_or_airborne_player_not_held_back() {
    let mut simulation = at_edge("Simulate", 31.5);
    simulation.world_mut().sneaking = true;
    run(&mut simulation, 3);
    simulation.world_mut().sneaking = false;
    simulation.world_mut().on_ground = false;
    run(&mut simulation, 3);
    assert_eq!(simulation.report().cancelled_movement_ticks, 0);
}

#[test]
fn test_disabled_feature_is_passive() {
    let mut simulation = at_edge("OnEdge", 31.995);
    let feature = simulation.safe_walk().feature;
    simulation.tree_mut().set_enabled(feature, false).unwrap();
    run(&mut simulation, 5);
    assert_eq!(simulation.report().cancelled_movement_ticks, 0);

    simulation.tree_mut().set_enabled(feature, true).unwrap();
    run(&mut simulation, 5);
    assert_eq!(simulation.report().cancelled_movement_ticks, 5);
}

#[test]
fn test_mode_switch_mid_run() {
    let mut simulation = at_edge("None", 31.995);
    run(&mut simulation, 4);
    assert_eq!(simulation.report().cancelled_movement_ticks, 0);
    assert_eq!(simulation.report().safe_walk_ticks, 0);

    let mode = simulation.safe_walk().mode;
    simulation.tree_mut().select_by_name(mode, "OnEdge").unwrap();
    run(&mut simulation, 4);
    assert_eq!(simulation.report().cancelled_movement_ticks, 4);
}
