//! End-to-end runs: scenario files in, reports and tree snapshots out

use tick_features::core::error::CoreError;
use tick_features::simulation::{run_scenario, Scenario, Simulation};

const DUEL: &str = r#"
name = "duel"
ticks = 400
seed = 7
cps = [8, 12]
stamina_decrement = 2
cooldown = false

[[enemies]]
position = [6.0, 0.0, 0.0]
health = 40.0

[[enemies]]
position = [0.0, 0.0, -12.0]
health = 40.0
"#;

#[test]
fn test_duel_scenario_kills_both() {
    let scenario = Scenario::parse(DUEL).unwrap();
    let report = run_scenario(&scenario).unwrap();

    assert_eq!(report.scenario, "duel");
    assert_eq!(report.simulated_ms, 20_000);
    assert_eq!(report.kills, 2);
    assert!(report.attacks >= 10);
    assert!(report.weapon_slot_ticks > 0);
}

#[test]
fn test_report_serializes() {
    let report = run_scenario(&Scenario::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["scenario"], "default");
    assert_eq!(json["ticks"], 200);
    assert!(json["attack_rate"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_tree_snapshot_lists_features() {
    let simulation = Simulation::new(&Scenario::default()).unwrap();
    let json = serde_json::to_value(simulation.snapshot()).unwrap();
    let roots = json.as_array().unwrap();

    let names: Vec<&str> = roots.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["TpAura", "SafeWalk"]);

    let aura = &roots[0];
    assert_eq!(aura["kind"], "feature");
    assert_eq!(aura["active"], true);
    let children: Vec<&str> = aura["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(children.contains(&"CpsScheduler"));
    assert!(children.contains(&"Cooldown"));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = Scenario::load("/nonexistent/scenario.toml");
    assert!(matches!(result, Err(CoreError::IoError(_))));
}

#[test]
fn test_settings_outside_bounds_rejected() {
    let scenario = Scenario::parse("cps = [0, 30]").unwrap();
    assert!(matches!(
        run_scenario(&scenario),
        Err(CoreError::OutOfRange { .. })
    ));
}
