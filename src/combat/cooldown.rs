//! Attack readiness derived from the host's cooldown progress

use rand::Rng;

use crate::activation::Inert;
use crate::core::error::Result;
use crate::core::types::NodeId;
use crate::settings::tree::{ConfigTree, FloatRangeId};

/// `Cooldown` toggle: when on, only attack once the host's cooldown
/// progress reaches a threshold resampled from `CooldownRange`
#[derive(Debug, Clone)]
pub struct AttackCooldown {
    pub node: NodeId,
    pub range: FloatRangeId,
    next_cooldown: f32,
}

impl AttackCooldown {
    pub const NODE: &'static str = "Cooldown";

    pub fn register<R: Rng>(tree: &mut ConfigTree, feature: NodeId, rng: &mut R) -> Result<Self> {
        let node = tree.add_toggle(Some(feature), Self::NODE, true, Box::new(Inert))?;
        let range = tree.add_float_range(node, "CooldownRange", 0.9..=1.0, 0.0..=1.0)?;
        let mut cooldown = Self {
            node,
            range,
            next_cooldown: 1.0,
        };
        cooldown.new_cooldown(tree, rng);
        Ok(cooldown)
    }

    pub fn next_cooldown(&self) -> f32 {
        self.next_cooldown
    }

    /// Whether an attack may be made at `progress`
    pub fn ready_to_attack(&self, tree: &ConfigTree, progress: f32) -> bool {
        !tree.is_enabled(self.node) || progress >= self.next_cooldown
    }

    /// Draw the next threshold
    pub fn new_cooldown<R: Rng>(&mut self, tree: &ConfigTree, rng: &mut R) {
        let range = tree.get_float_range(self.range);
        self.next_cooldown = if range.start() < range.end() {
            rng.gen_range(range)
        } else {
            *range.start()
        };
    }
}
