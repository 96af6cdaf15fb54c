//! Lifecycle hooks and event handlers attached to tree nodes

use crate::core::types::NodeId;
use crate::events::Event;
use crate::settings::ConfigTree;

/// Behaviour of a feature, toggle or choice
///
/// `enable` and `disable` run exactly on effective-state transitions of the
/// node they belong to. `on_event` only runs while the node handles events
/// (see [`ConfigTree::handles_events`]).
pub trait Behavior {
    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn on_event(&mut self, _ctx: &NodeContext<'_>, _event: &mut Event<'_>) {}
}

/// Behaviour that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl Behavior for Inert {}

/// Choice that does nothing
///
/// Selecting it is how a user switches a choice-driven feature off without
/// disabling the whole feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneChoice;

impl NoneChoice {
    pub const NAME: &'static str = "None";
}

impl Behavior for NoneChoice {}

/// Read-only view handed to event handlers
pub struct NodeContext<'a> {
    pub(crate) tree: &'a ConfigTree,
    pub(crate) node: NodeId,
}

impl<'a> NodeContext<'a> {
    pub fn tree(&self) -> &'a ConfigTree {
        self.tree
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn name(&self) -> &'a str {
        self.tree.name(self.node)
    }
}
