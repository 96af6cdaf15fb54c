//! Hierarchical enable/disable propagation
//!
//! A feature or toggle is effectively enabled when its own `Enabled` value
//! is set and its owner (if any) is effectively enabled. The last computed
//! state is memoized so hooks fire exactly once per transition.

use crate::activation::behavior::Behavior;
use crate::core::error::{CoreError, Result};
use crate::core::types::NodeId;
use crate::settings::node::{NodeKind, ToggleState};
use crate::settings::tree::{BoolId, ConfigTree, Observer};

/// Name of the boolean every activatable node carries
pub const ENABLED: &str = "Enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    Enable,
    Disable,
}

impl ConfigTree {
    /// Register a top-level feature
    pub fn add_feature(
        &mut self,
        name: &str,
        enabled: bool,
        behavior: Box<dyn Behavior>,
    ) -> Result<NodeId> {
        self.insert_activatable(None, None, name, enabled, behavior, true)
    }

    /// Register a toggle below `parent`
    ///
    /// The toggle is gated by the nearest feature or toggle at or above
    /// `parent`. Without a parent, or without such an ancestor, its effective
    /// state is its own `Enabled` value alone.
    pub fn add_toggle(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        enabled: bool,
        behavior: Box<dyn Behavior>,
    ) -> Result<NodeId> {
        let owner = parent.and_then(|p| self.nearest_activatable(p));
        self.insert_activatable(parent, owner, name, enabled, behavior, false)
    }

    fn insert_activatable(
        &mut self,
        parent: Option<NodeId>,
        owner: Option<NodeId>,
        name: &str,
        enabled: bool,
        behavior: Box<dyn Behavior>,
        feature: bool,
    ) -> Result<NodeId> {
        let mark = self.mark();
        let node = self.insert_node(parent, name, NodeKind::Plain, Some(behavior))?;
        let value = match self.add_bool(node, ENABLED, enabled) {
            Ok(value) => value,
            Err(err) => {
                self.rollback(mark);
                return Err(err);
            }
        };

        let state = ToggleState {
            enabled: value.id(),
            owner,
            was_enabled: false,
            dependents: Vec::new(),
        };
        self.nodes[node.index()].kind = if feature {
            NodeKind::Feature(state)
        } else {
            NodeKind::Toggle(state)
        };

        self.values[value.id().index()]
            .observers
            .push(Observer::Activation(node));
        if let Some(owner) = owner {
            self.add_dependent(owner, node);
        }

        self.refresh_activation(node);
        Ok(node)
    }

    pub(crate) fn nearest_activatable(&self, from: NodeId) -> Option<NodeId> {
        let mut current = Some(from);
        while let Some(node) = current {
            if self.nodes[node.index()].kind.toggle_state().is_some() {
                return Some(node);
            }
            current = self.nodes[node.index()].parent;
        }
        None
    }

    pub(crate) fn add_dependent(&mut self, owner: NodeId, dependent: NodeId) {
        if let Some(state) = self.nodes[owner.index()].kind.toggle_state_mut() {
            state.dependents.push(dependent);
        }
    }

    fn toggle_state(&self, node: NodeId) -> Result<&ToggleState> {
        self.nodes[node.index()]
            .kind
            .toggle_state()
            .ok_or(CoreError::WrongNodeKind(node, "feature or toggle"))
    }

    /// The node's own `Enabled` value
    pub fn enabled_value(&self, node: NodeId) -> Result<BoolId> {
        self.toggle_state(node).map(|state| BoolId(state.enabled))
    }

    /// Write the node's own `Enabled` value
    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) -> Result<()> {
        let value = self.enabled_value(node)?;
        self.set_bool(value, enabled)
    }

    /// The node's own `Enabled` value, ignoring its owner
    pub fn is_enabled(&self, node: NodeId) -> bool {
        self.nodes[node.index()]
            .kind
            .toggle_state()
            .map(|state| self.get_bool(BoolId(state.enabled)))
            .unwrap_or(false)
    }

    /// Effective state: own value AND owner's effective state
    pub fn is_effective(&self, node: NodeId) -> bool {
        self.nodes[node.index()]
            .kind
            .toggle_state()
            .map(|state| state.was_enabled)
            .unwrap_or(false)
    }

    /// Recompute the effective state of an activatable node and propagate
    /// a transition to its hook and dependents
    pub(crate) fn refresh_activation(&mut self, node: NodeId) {
        let (enabled, owner, was_enabled) = match self.nodes[node.index()].kind.toggle_state() {
            Some(state) => (state.enabled, state.owner, state.was_enabled),
            None => return,
        };

        let owner_enabled = owner.map_or(true, |owner| self.is_effective(owner));
        let will_be_enabled = owner_enabled && self.get_bool(BoolId(enabled));
        if will_be_enabled == was_enabled {
            return;
        }

        let dependents = match self.nodes[node.index()].kind.toggle_state_mut() {
            Some(state) => {
                state.was_enabled = will_be_enabled;
                state.dependents.clone()
            }
            None => return,
        };

        tracing::debug!(
            node = %self.nodes[node.index()].name,
            enabled = will_be_enabled,
            "activation changed"
        );

        // Enable top-down, tear down bottom-up
        if will_be_enabled {
            self.run_hook(node, Hook::Enable);
            for dependent in dependents {
                self.push_owner_state(dependent, true);
            }
        } else {
            for dependent in dependents.into_iter().rev() {
                self.push_owner_state(dependent, false);
            }
            self.run_hook(node, Hook::Disable);
        }
    }

    fn push_owner_state(&mut self, dependent: NodeId, on: bool) {
        match &mut self.nodes[dependent.index()].kind {
            NodeKind::Feature(_) | NodeKind::Toggle(_) => self.refresh_activation(dependent),
            NodeKind::Group(state) => {
                if state.on != on {
                    state.on = on;
                    let active = state.active_choice();
                    self.run_hook(active, if on { Hook::Enable } else { Hook::Disable });
                }
            }
            NodeKind::Plain | NodeKind::Choice { .. } => {}
        }
    }

    /// Take a node out of service before it is rolled back
    ///
    /// Runs only the node's own `disable` (or its active choice's, for a
    /// group). Callers retire newer nodes first.
    pub(crate) fn retire(&mut self, node: NodeId) {
        let target = match &mut self.nodes[node.index()].kind {
            NodeKind::Feature(state) | NodeKind::Toggle(state) if state.was_enabled => {
                state.was_enabled = false;
                node
            }
            NodeKind::Group(state) if state.on => {
                state.on = false;
                state.active_choice()
            }
            _ => return,
        };
        self.run_hook(target, Hook::Disable);
    }

    pub(crate) fn run_hook(&mut self, node: NodeId, hook: Hook) {
        if let Some(behavior) = self.behaviors[node.index()].as_mut() {
            match hook {
                Hook::Enable => behavior.enable(),
                Hook::Disable => behavior.disable(),
            }
        }
    }
}
