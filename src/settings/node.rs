//! Node records stored in the config tree arena

use serde::Serialize;

use crate::core::types::{NodeId, ValueId};
use crate::settings::value::Value;

/// One ordered child of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Child {
    Value(ValueId),
    Node(NodeId),
}

/// What a node is, and the activation state it carries
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node with no activation semantics
    Plain,
    /// Top-level switchable unit (a "module")
    Feature(ToggleState),
    /// Switchable sub-unit whose effective state also depends on its owner
    Toggle(ToggleState),
    /// Exclusive selection among [`NodeKind::Choice`] children
    Group(GroupState),
    Choice { group: NodeId },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Plain => "node",
            NodeKind::Feature(_) => "feature",
            NodeKind::Toggle(_) => "toggle",
            NodeKind::Group(_) => "choice group",
            NodeKind::Choice { .. } => "choice",
        }
    }

    pub(crate) fn toggle_state(&self) -> Option<&ToggleState> {
        match self {
            NodeKind::Feature(state) | NodeKind::Toggle(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn toggle_state_mut(&mut self) -> Option<&mut ToggleState> {
        match self {
            NodeKind::Feature(state) | NodeKind::Toggle(state) => Some(state),
            _ => None,
        }
    }
}

/// Activation record shared by features and toggles
#[derive(Debug, Clone)]
pub struct ToggleState {
    /// The node's own `Enabled` value
    pub enabled: ValueId,
    /// Activatable whose effective state gates this one
    pub owner: Option<NodeId>,
    /// Last computed effective state
    pub was_enabled: bool,
    /// Toggles and choice groups gated by this node, in registration order
    pub dependents: Vec<NodeId>,
}

/// Selection record of a choice group
#[derive(Debug, Clone)]
pub struct GroupState {
    pub owner: NodeId,
    pub choices: Vec<NodeId>,
    pub active: usize,
    /// Last state pushed by the owner
    pub on: bool,
    /// `Active` value slot mirroring the selection
    pub selection: ValueId,
}

impl GroupState {
    pub fn active_choice(&self) -> NodeId {
        self.choices[self.active]
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<Child>,
    pub kind: NodeKind,
}

/// Serializable view of a subtree, for external tooling
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub values: Vec<ValueSnapshot>,
    pub children: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueSnapshot {
    pub name: String,
    #[serde(flatten)]
    pub value: Value,
}
