//! Activity guard and event fan-out
//!
//! The host's event bus may keep every subscription registered; whether a
//! node actually reacts is decided here, from the node's activation state.

use crate::activation::behavior::NodeContext;
use crate::core::types::NodeId;
use crate::events::types::Event;
use crate::settings::node::NodeKind;
use crate::settings::tree::ConfigTree;

impl ConfigTree {
    /// Whether handlers attached to `node` should run
    ///
    /// Features and toggles handle events while effectively enabled, groups
    /// while their owner does, choices while their group does and they are
    /// the active choice. Plain nodes defer to their parent.
    pub fn handles_events(&self, node: NodeId) -> bool {
        match &self.nodes[node.index()].kind {
            NodeKind::Feature(state) | NodeKind::Toggle(state) => state.was_enabled,
            NodeKind::Group(state) => self.handles_events(state.owner),
            NodeKind::Choice { group } => {
                self.is_choice_active(node) && self.handles_events(*group)
            }
            NodeKind::Plain => self.nodes[node.index()]
                .parent
                .map_or(true, |parent| self.handles_events(parent)),
        }
    }

    /// Deliver `event` to every node behaviour that currently handles events,
    /// in registration order
    pub fn dispatch(&mut self, event: &mut Event<'_>) {
        for index in 0..self.nodes.len() {
            let node = NodeId(index as u32);
            if self.behaviors[index].is_none() || !self.handles_events(node) {
                continue;
            }

            if let Some(mut behavior) = self.behaviors[index].take() {
                let ctx = NodeContext { tree: self, node };
                behavior.on_event(&ctx, event);
                self.behaviors[index] = Some(behavior);
            }
        }
    }
}
