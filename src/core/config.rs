//! Timing configuration with documented constants
//!
//! All magic numbers of the activation and timing core are collected here
//! with explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

/// Configuration for the tick-driven timing systems
///
/// Changing these values changes observable pacing, so the defaults mirror
/// the host this crate was built against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    // === HOST ===
    /// Length of one host tick in milliseconds
    ///
    /// The host drains at most one queued input per tick, so this is the
    /// smallest interval the scheduler can meaningfully target. The
    /// scheduler itself measures wall-clock time; this constant only decides
    /// when a gap is long enough to count as a fresh decision point.
    pub host_tick_ms: u64,

    // === CLICK SCHEDULER ===
    /// Fraction of the current interval that must have elapsed before a
    /// click may fire
    ///
    /// At 0.95 a click may fire up to 5% early, which keeps the realised rate
    /// from drifting below the sampled rate when intervals do not line up
    /// with tick boundaries.
    pub early_fire_ratio: f64,

    /// Stamina value at which the sampled rate is used unscaled
    ///
    /// The effective rate is `sample * stamina / baseline`, clamped back into
    /// the configured range.
    pub stamina_baseline: i32,

    // === ORCHESTRATION ===
    /// Ticks the teleport aura rests after a completed attack run
    pub aura_rest_ticks: u32,

    // === SILENT HOTBAR ===
    /// Ticks a silently selected slot survives without being refreshed
    pub hotbar_reset_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            host_tick_ms: 50,
            early_fire_ratio: 0.95,
            stamina_baseline: 100,
            aura_rest_ticks: 10,
            hotbar_reset_ticks: 20,
        }
    }
}

impl TimingConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.host_tick_ms == 0 {
            return Err("host_tick_ms must be positive".into());
        }

        if !(0.0..=1.0).contains(&self.early_fire_ratio) {
            return Err(format!(
                "early_fire_ratio ({}) must lie within 0.0..=1.0",
                self.early_fire_ratio
            ));
        }

        if self.stamina_baseline <= 0 {
            return Err(format!(
                "stamina_baseline ({}) must be positive",
                self.stamina_baseline
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<TimingConfig> = OnceLock::new();

/// Get the global timing config (initializes with defaults if not set)
pub fn timing() -> &'static TimingConfig {
    CONFIG.get_or_init(TimingConfig::default)
}

/// Set the global timing config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_timing(config: TimingConfig) -> Result<(), TimingConfig> {
    CONFIG.set(config)
}
