//! Headless host, scenario files and the run driver

pub mod runner;
pub mod scenario;
pub mod world;

pub use runner::{run_scenario, RunReport, Simulation};
pub use scenario::{EnemySpec, Scenario};
pub use world::{SimEnemy, SimWorld};
