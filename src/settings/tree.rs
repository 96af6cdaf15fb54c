//! The config tree arena
//!
//! Owns every node, value slot and behaviour. Relations between nodes
//! (parent, owner, choice group) are plain handles into this arena, so the
//! tree never forms ownership cycles.

use std::ops::RangeInclusive;

use ahash::AHashMap;

use crate::activation::behavior::Behavior;
use crate::core::error::{CoreError, Result};
use crate::core::types::{NodeId, ValueId};
use crate::settings::node::{Child, Node, NodeKind, NodeSnapshot, ValueSnapshot};
use crate::settings::value::{Input, Value, ValueKind};

/// Case folding shared by root and child name matching
fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) ValueId);

        impl $name {
            pub fn id(self) -> ValueId {
                self.0
            }
        }
    };
}

typed_handle!(
    /// Handle of a boolean setting
    BoolId
);
typed_handle!(
    /// Handle of an integer setting
    IntId
);
typed_handle!(
    /// Handle of a float setting
    FloatId
);
typed_handle!(
    /// Handle of an integer range setting
    IntRangeId
);
typed_handle!(
    /// Handle of a float range setting
    FloatRangeId
);

/// Listener attached to a value slot
pub(crate) enum Observer {
    /// The slot is the `Enabled` value of this activatable node
    Activation(NodeId),
    Callback(Box<dyn FnMut(&Value)>),
}

pub(crate) struct ValueSlot {
    pub name: String,
    pub owner: NodeId,
    pub value: Value,
    pub observers: Vec<Observer>,
}

/// Arena of config nodes, values and behaviours
///
/// All mutation is synchronous: a write returns only after every observer
/// of the written value, and everything they triggered, has run.
pub struct ConfigTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) values: Vec<ValueSlot>,
    pub(crate) behaviors: Vec<Option<Box<dyn Behavior>>>,
    roots: Vec<NodeId>,
    root_index: AHashMap<String, NodeId>,
}

/// Arena sizes captured before a compound registration
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    nodes: usize,
    values: usize,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            values: Vec::new(),
            behaviors: Vec::new(),
            roots: Vec::new(),
            root_index: AHashMap::new(),
        }
    }

    // === STRUCTURE ===

    /// Add a plain root node
    pub fn add_root(&mut self, name: &str) -> Result<NodeId> {
        self.insert_node(None, name, NodeKind::Plain, None)
    }

    /// Add a plain grouping node
    pub fn add_node(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        self.insert_node(Some(parent), name, NodeKind::Plain, None)
    }

    pub(crate) fn insert_node(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        kind: NodeKind,
        behavior: Option<Box<dyn Behavior>>,
    ) -> Result<NodeId> {
        match parent {
            Some(parent) => self.ensure_unique(parent, name)?,
            None => {
                if self.root_index.contains_key(&fold_name(name)) {
                    return Err(CoreError::DuplicateName {
                        parent: "<root>".to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            kind,
        });
        self.behaviors.push(behavior);

        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(Child::Node(id)),
            None => {
                self.roots.push(id);
                self.root_index.insert(fold_name(name), id);
            }
        }

        Ok(id)
    }

    pub(crate) fn insert_value(&mut self, owner: NodeId, name: &str, value: Value) -> Result<ValueId> {
        self.ensure_unique(owner, name)?;

        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueSlot {
            name: name.to_string(),
            owner,
            value,
            observers: Vec::new(),
        });
        self.nodes[owner.index()].children.push(Child::Value(id));
        Ok(id)
    }

    fn ensure_unique(&self, parent: NodeId, name: &str) -> Result<()> {
        if self.find_child(parent, name).is_some() {
            return Err(CoreError::DuplicateName {
                parent: self.nodes[parent.index()].name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            nodes: self.nodes.len(),
            values: self.values.len(),
        }
    }

    /// Drop everything registered after `mark`
    pub(crate) fn rollback(&mut self, mark: Mark) {
        let node_alive = |id: NodeId| id.index() < mark.nodes;
        let value_alive = |id: ValueId| id.index() < mark.values;

        // Newest first, so dependents go down before their owners
        for index in (mark.nodes..self.nodes.len()).rev() {
            self.retire(NodeId(index as u32));
        }

        self.nodes.truncate(mark.nodes);
        self.behaviors.truncate(mark.nodes);
        self.values.truncate(mark.values);

        for node in &mut self.nodes {
            node.children.retain(|child| match child {
                Child::Node(id) => node_alive(*id),
                Child::Value(id) => value_alive(*id),
            });
            if let Some(state) = node.kind.toggle_state_mut() {
                state.dependents.retain(|id| node_alive(*id));
            }
        }
        for slot in &mut self.values {
            slot.observers.retain(|observer| match observer {
                Observer::Activation(id) => node_alive(*id),
                Observer::Callback(_) => true,
            });
        }
        self.roots.retain(|id| node_alive(*id));
        self.root_index.retain(|_, id| node_alive(*id));
    }

    // === REGISTRATION OF VALUES ===

    pub fn add_bool(&mut self, owner: NodeId, name: &str, default: bool) -> Result<BoolId> {
        self.insert_value(owner, name, Value::Bool { value: default })
            .map(BoolId)
    }

    pub fn add_int(
        &mut self,
        owner: NodeId,
        name: &str,
        default: i32,
        bounds: RangeInclusive<i32>,
    ) -> Result<IntId> {
        let start = *bounds.start();
        let value = checked(name, Value::Int { value: start, bounds }, Input::Int(default))?;
        self.insert_value(owner, name, value).map(IntId)
    }

    pub fn add_float(
        &mut self,
        owner: NodeId,
        name: &str,
        default: f32,
        bounds: RangeInclusive<f32>,
    ) -> Result<FloatId> {
        let start = *bounds.start();
        let value = checked(name, Value::Float { value: start, bounds }, Input::Float(default))?;
        self.insert_value(owner, name, value).map(FloatId)
    }

    pub fn add_int_range(
        &mut self,
        owner: NodeId,
        name: &str,
        default: RangeInclusive<i32>,
        bounds: RangeInclusive<i32>,
    ) -> Result<IntRangeId> {
        let start = *bounds.start();
        let value = checked(
            name,
            Value::IntRange { value: start..=start, bounds },
            Input::IntRange(default),
        )?;
        self.insert_value(owner, name, value).map(IntRangeId)
    }

    pub fn add_float_range(
        &mut self,
        owner: NodeId,
        name: &str,
        default: RangeInclusive<f32>,
        bounds: RangeInclusive<f32>,
    ) -> Result<FloatRangeId> {
        let start = *bounds.start();
        let value = checked(
            name,
            Value::FloatRange { value: start..=start, bounds },
            Input::FloatRange(default),
        )?;
        self.insert_value(owner, name, value).map(FloatRangeId)
    }

    // === TYPED READS ===
    //
    // Typed handles are only minted by the matching `add_*` call, so the
    // fallbacks below are unreachable for handles from this tree.

    pub fn get_bool(&self, id: BoolId) -> bool {
        self.value(id.0).as_bool().unwrap_or(false)
    }

    pub fn get_int(&self, id: IntId) -> i32 {
        self.value(id.0).as_int().unwrap_or(0)
    }

    pub fn get_float(&self, id: FloatId) -> f32 {
        self.value(id.0).as_float().unwrap_or(0.0)
    }

    pub fn get_int_range(&self, id: IntRangeId) -> RangeInclusive<i32> {
        self.value(id.0).as_int_range().unwrap_or(0..=0)
    }

    pub fn get_float_range(&self, id: FloatRangeId) -> RangeInclusive<f32> {
        self.value(id.0).as_float_range().unwrap_or(0.0..=0.0)
    }

    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.index()].value
    }

    pub fn value_name(&self, id: ValueId) -> &str {
        &self.values[id.index()].name
    }

    // === WRITES ===

    pub fn set_bool(&mut self, id: BoolId, value: bool) -> Result<()> {
        self.set_input(id.0, Input::Bool(value))
    }

    pub fn set_int(&mut self, id: IntId, value: i32) -> Result<()> {
        self.set_input(id.0, Input::Int(value))
    }

    pub fn set_float(&mut self, id: FloatId, value: f32) -> Result<()> {
        self.set_input(id.0, Input::Float(value))
    }

    pub fn set_int_range(&mut self, id: IntRangeId, value: RangeInclusive<i32>) -> Result<()> {
        self.set_input(id.0, Input::IntRange(value))
    }

    pub fn set_float_range(&mut self, id: FloatRangeId, value: RangeInclusive<f32>) -> Result<()> {
        self.set_input(id.0, Input::FloatRange(value))
    }

    /// Write any value slot
    ///
    /// Choice slots route through [`ConfigTree::select_by_name`] so the
    /// selection hooks run. Every other slot is bounds checked, stored, and
    /// its observers notified if the value changed.
    pub fn set_input(&mut self, id: ValueId, input: Input) -> Result<()> {
        if let Input::Choice(name) = &input {
            if self.values[id.index()].value.kind() == ValueKind::Choice {
                let group = self.values[id.index()].owner;
                return self.select_by_name(group, name);
            }
        }

        let slot = &mut self.values[id.index()];
        let changed = slot.value.accept(&slot.name, input)?;
        if changed {
            self.notify(id);
        }
        Ok(())
    }

    /// Attach a callback run synchronously after every change of `id`
    pub fn observe(&mut self, id: ValueId, callback: impl FnMut(&Value) + 'static) {
        self.values[id.index()]
            .observers
            .push(Observer::Callback(Box::new(callback)));
    }

    pub(crate) fn notify(&mut self, id: ValueId) {
        let mut observers = std::mem::take(&mut self.values[id.index()].observers);

        for observer in observers.iter_mut() {
            match observer {
                Observer::Activation(node) => self.refresh_activation(*node),
                Observer::Callback(callback) => callback(&self.values[id.index()].value),
            }
        }

        let slot = &mut self.values[id.index()];
        observers.append(&mut slot.observers);
        slot.observers = observers;
    }

    // === LOOKUP ===

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn find_root(&self, name: &str) -> Option<NodeId> {
        self.root_index.get(&fold_name(name)).copied()
    }

    /// Case-insensitive child lookup
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<Child> {
        let folded = fold_name(name);
        self.nodes[parent.index()]
            .children
            .iter()
            .copied()
            .find(|child| fold_name(self.child_name(*child)) == folded)
    }

    /// Resolve a path such as `["TpAura", "Cooldown", "Enabled"]`
    pub fn lookup(&self, path: &[&str]) -> Result<Child> {
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| CoreError::NotFound(String::new()))?;
        let mut current = Child::Node(
            self.find_root(first)
                .ok_or_else(|| CoreError::NotFound(first.to_string()))?,
        );

        for segment in rest {
            let Child::Node(node) = current else {
                return Err(CoreError::NotFound(path.join("/")));
            };
            current = self
                .find_child(node, segment)
                .ok_or_else(|| CoreError::NotFound(path.join("/")))?;
        }

        Ok(current)
    }

    pub fn child_name(&self, child: Child) -> &str {
        match child {
            Child::Node(id) => &self.nodes[id.index()].name,
            Child::Value(id) => &self.values[id.index()].name,
        }
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.index()].name
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    pub fn children(&self, node: NodeId) -> &[Child] {
        &self.nodes[node.index()].children
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.index()].kind
    }

    /// Serializable view of a subtree
    pub fn snapshot(&self, node: NodeId) -> NodeSnapshot {
        let record = &self.nodes[node.index()];
        let mut values = Vec::new();
        let mut children = Vec::new();

        for child in &record.children {
            match *child {
                Child::Value(id) => values.push(ValueSnapshot {
                    name: self.values[id.index()].name.clone(),
                    value: self.values[id.index()].value.clone(),
                }),
                Child::Node(id) => children.push(self.snapshot(id)),
            }
        }

        let active = match &record.kind {
            NodeKind::Plain => None,
            NodeKind::Choice { .. } => Some(self.is_choice_active(node)),
            _ => Some(self.handles_events(node)),
        };

        NodeSnapshot {
            name: record.name.clone(),
            kind: record.kind.label(),
            active,
            values,
            children,
        }
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a value by writing `default` into a placeholder, so defaults go
/// through the same bounds check as later writes
fn checked(name: &str, mut placeholder: Value, default: Input) -> Result<Value> {
    placeholder.accept(name, default)?;
    Ok(placeholder)
}
