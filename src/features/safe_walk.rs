//! SafeWalk: keeps the player from walking off ledges
//!
//! Three strategies, picked through the `Mode` choice group: let the host do
//! it (`Safe`), cancel input when a short movement simulation predicts a
//! fall (`Simulate`), or cancel input close to an edge (`OnEdge`).

use crate::activation::{Behavior, Inert, NodeContext};
use crate::core::error::Result;
use crate::core::types::NodeId;
use crate::events::{DirectionalInput, Event, MovementInputEvent};
use crate::settings::tree::{ConfigTree, FloatId, IntId};

pub struct SafeWalk {
    pub feature: NodeId,
    pub mode: NodeId,
}

impl SafeWalk {
    pub const NAME: &'static str = "SafeWalk";
    pub const MODE: &'static str = "Mode";

    pub fn register(tree: &mut ConfigTree, enabled: bool) -> Result<Self> {
        let feature = tree.add_feature(Self::NAME, enabled, Box::new(Inert))?;
        let mode = tree.add_choice_group(
            feature,
            Self::MODE,
            |builder| {
                builder.add_none()?;
                builder.add(Safe::NAME, |_, _| Ok(Box::new(Safe)))?;
                builder.add(Simulate::NAME, |tree, node| {
                    let ticks = tree.add_int(node, "Ticks", 5, 0..=20)?;
                    Ok(Box::new(Simulate { ticks }))
                })?;
                builder.add(OnEdge::NAME, |tree, node| {
                    let edge_distance = tree.add_float(node, "EdgeDistance", 0.01, 0.01..=0.5)?;
                    Ok(Box::new(OnEdge { edge_distance }))
                })?;
                Ok(())
            },
            |choices| choices.position(Safe::NAME).unwrap_or(0),
        )?;
        Ok(Self { feature, mode })
    }
}

fn stands_still(event: &MovementInputEvent<'_>) -> bool {
    !event.player.is_on_ground() || event.player.is_sneaking()
}

/// Lets the host apply its own ledge protection
struct Safe;

impl Safe {
    const NAME: &'static str = "Safe";
}

impl Behavior for Safe {
    fn on_event(&mut self, _ctx: &NodeContext<'_>, event: &mut Event<'_>) {
        if let Event::SafeWalk(event) = event {
            event.is_safe_walk = true;
        }
    }
}

struct Simulate {
    ticks: IntId,
}

impl Simulate {
    const NAME: &'static str = "Simulate";
}

impl Behavior for Simulate {
    fn on_event(&mut self, ctx: &NodeContext<'_>, event: &mut Event<'_>) {
        let Event::MovementInput(event) = event else {
            return;
        };
        if stands_still(event) {
            return;
        }

        let ticks = ctx.tree().get_int(self.ticks).max(0) as u32;
        let fall = event
            .player
            .predicted_fall_distance(event.directional_input, event.jumping, ticks);
        if fall > 0.0 {
            event.directional_input = DirectionalInput::NONE;
        }
    }
}

struct OnEdge {
    edge_distance: FloatId,
}

impl OnEdge {
    const NAME: &'static str = "OnEdge";
}

impl Behavior for OnEdge {
    fn on_event(&mut self, ctx: &NodeContext<'_>, event: &mut Event<'_>) {
        let Event::MovementInput(event) = event else {
            return;
        };
        if stands_still(event) {
            return;
        }

        let distance = ctx.tree().get_float(self.edge_distance) as f64;
        if event.player.is_close_to_edge(event.directional_input, distance) {
            event.directional_input = DirectionalInput::NONE;
        }
    }
}
