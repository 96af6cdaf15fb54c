//! Scenario files for headless runs
//!
//! ```toml
//! name = "duel"
//! ticks = 400
//! seed = 7
//! cps = [8, 12]
//! stamina_decrement = 2
//!
//! [[enemies]]
//! position = [6.0, 0.0, 0.0]
//! health = 40.0
//!
//! [timing]
//! aura_rest_ticks = 6
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::TimingConfig;
use crate::core::error::{CoreError, Result};
use crate::core::types::Vec3;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Host ticks to simulate
    pub ticks: u64,
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    pub seed: u64,
    /// Aura CPS range, inclusive
    pub cps: [i32; 2],
    pub stamina_decrement: i32,
    /// Whether the aura waits for the attack cooldown
    pub cooldown: bool,
    pub maximum_range: f32,
    pub teleport_offset: f32,
    /// Choice selected in SafeWalk's `Mode` group
    pub safe_walk_mode: String,
    pub player: [f64; 3],
    pub enemies: Vec<EnemySpec>,
    /// Process-wide timing overrides, installed by the binary before the run
    pub timing: Option<TimingConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnemySpec {
    pub position: [f64; 3],
    #[serde(default = "default_health")]
    pub health: f32,
}

fn default_health() -> f32 {
    20.0
}

impl EnemySpec {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "default".into(),
            ticks: 200,
            tick_ms: 50,
            seed: 42,
            cps: [6, 10],
            stamina_decrement: 0,
            cooldown: true,
            maximum_range: 50.0,
            teleport_offset: 0.5,
            safe_walk_mode: "Safe".into(),
            player: [0.0, 0.0, 0.0],
            enemies: vec![EnemySpec {
                position: [5.0, 0.0, 0.0],
                health: default_health(),
            }],
            timing: None,
        }
    }
}

impl Scenario {
    /// Load and validate a scenario from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a scenario from TOML
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(CoreError::InvalidConfig("tick_ms must be positive".into()));
        }
        if self.cps[0] > self.cps[1] {
            return Err(CoreError::InvalidConfig(format!(
                "cps range [{}, {}] is inverted",
                self.cps[0], self.cps[1]
            )));
        }
        if let Some(timing) = &self.timing {
            timing.validate().map_err(CoreError::InvalidConfig)?;
        }
        Ok(())
    }

    pub fn player_position(&self) -> Vec3 {
        Vec3::from_array(self.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let scenario = Scenario::parse("").unwrap();
        assert_eq!(scenario, Scenario::default());
    }

    #[test]
    fn test_partial_file() {
        let scenario = Scenario::parse(
            r#"
            ticks = 40
            cps = [8, 12]

            [[enemies]]
            position = [3.0, 0.0, 4.0]
            "#,
        )
        .unwrap();

        assert_eq!(scenario.ticks, 40);
        assert_eq!(scenario.cps, [8, 12]);
        assert_eq!(scenario.seed, 42);
        assert_eq!(scenario.enemies.len(), 1);
        assert_eq!(scenario.enemies[0].health, 20.0);
        assert_eq!(scenario.enemies[0].position().length(), 5.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Scenario::parse("tick_ms = 0"),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            Scenario::parse("cps = [10, 6]"),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            Scenario::parse("ticks = \"many\""),
            Err(CoreError::TomlError(_))
        ));
    }

    #[test]
    fn test_timing_table_overrides_defaults() {
        let scenario = Scenario::parse("[timing]\naura_rest_ticks = 6\n").unwrap();
        let timing = scenario.timing.unwrap();
        assert_eq!(timing.aura_rest_ticks, 6);
        assert_eq!(timing.host_tick_ms, 50);

        assert!(matches!(
            Scenario::parse("[timing]\nearly_fire_ratio = 1.5\n"),
            Err(CoreError::InvalidConfig(_))
        ));
    }
}
