//! Exclusive selection among named choices
//!
//! Exactly one choice of a group is active at any time. While the group is
//! on (its owner is effectively enabled) the active choice is enabled;
//! switching disables the old choice before enabling the new one, so two
//! choices never hold resources at once.

use crate::activation::behavior::{Behavior, NoneChoice};
use crate::activation::toggle::Hook;
use crate::core::error::{CoreError, Result};
use crate::core::types::NodeId;
use crate::settings::node::{GroupState, NodeKind};
use crate::settings::tree::ConfigTree;
use crate::settings::value::Value;

/// Name of the value slot mirroring a group's selection
pub const ACTIVE: &str = "Active";

/// Handed to the choice factory while a group is being built
pub struct ChoiceBuilder<'a> {
    tree: &'a mut ConfigTree,
    group: NodeId,
    choices: Vec<NodeId>,
}

impl<'a> ChoiceBuilder<'a> {
    /// The group under construction
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// Choices added so far, in order
    pub fn choices(&self) -> &[NodeId] {
        &self.choices
    }

    /// Add a choice; `factory` may register the choice's own settings
    /// before returning its behaviour
    pub fn add<F>(&mut self, name: &str, factory: F) -> Result<NodeId>
    where
        F: FnOnce(&mut ConfigTree, NodeId) -> Result<Box<dyn Behavior>>,
    {
        let node = self.tree.insert_node(
            Some(self.group),
            name,
            NodeKind::Choice { group: self.group },
            None,
        )?;
        let behavior = factory(self.tree, node)?;
        self.tree.behaviors[node.index()] = Some(behavior);
        self.choices.push(node);
        Ok(node)
    }

    /// Add the no-op [`NoneChoice`]
    pub fn add_none(&mut self) -> Result<NodeId> {
        self.add(NoneChoice::NAME, |_, _| Ok(Box::new(NoneChoice)))
    }
}

/// Built choices, handed to the initial-selection callback
pub struct ChoiceList<'a> {
    tree: &'a ConfigTree,
    choices: &'a [NodeId],
}

impl<'a> ChoiceList<'a> {
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.choices.get(index).copied()
    }

    /// Index of the choice with exactly this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.choices
            .iter()
            .position(|choice| self.tree.name(*choice) == name)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.choices.iter().map(|c| self.tree.name(*c)).collect()
    }
}

impl ConfigTree {
    /// Register a choice group gated by `owner`
    ///
    /// `build` adds the choices in order; `select` picks the initially active
    /// one by index. On error nothing is registered.
    pub fn add_choice_group<B, S>(
        &mut self,
        owner: NodeId,
        name: &str,
        build: B,
        select: S,
    ) -> Result<NodeId>
    where
        B: FnOnce(&mut ChoiceBuilder<'_>) -> Result<()>,
        S: FnOnce(&ChoiceList<'_>) -> usize,
    {
        if self.nodes[owner.index()].kind.toggle_state().is_none() {
            return Err(CoreError::WrongNodeKind(owner, "feature or toggle"));
        }

        let mark = self.mark();
        match self.build_group(owner, name, build, select) {
            Ok(group) => Ok(group),
            Err(err) => {
                self.rollback(mark);
                Err(err)
            }
        }
    }

    fn build_group<B, S>(&mut self, owner: NodeId, name: &str, build: B, select: S) -> Result<NodeId>
    where
        B: FnOnce(&mut ChoiceBuilder<'_>) -> Result<()>,
        S: FnOnce(&ChoiceList<'_>) -> usize,
    {
        let group = self.insert_node(Some(owner), name, NodeKind::Plain, None)?;

        let mut builder = ChoiceBuilder {
            tree: self,
            group,
            choices: Vec::new(),
        };
        build(&mut builder)?;
        let choices = builder.choices;

        if choices.is_empty() {
            return Err(CoreError::EmptyChoices(name.to_string()));
        }

        let active = select(&ChoiceList {
            tree: self,
            choices: &choices,
        });
        if active >= choices.len() {
            return Err(CoreError::NotFound(format!("{name}[{active}]")));
        }

        let selection = self.insert_value(
            group,
            ACTIVE,
            Value::Choice {
                active: self.name(choices[active]).to_string(),
                choices: choices.iter().map(|c| self.name(*c).to_string()).collect(),
            },
        )?;

        self.nodes[group.index()].kind = NodeKind::Group(GroupState {
            owner,
            choices,
            active,
            on: false,
            selection,
        });
        self.add_dependent(owner, group);

        if self.is_effective(owner) {
            self.set_group_state(group, true)?;
        }
        Ok(group)
    }

    fn group_state(&self, group: NodeId) -> Result<&GroupState> {
        match &self.nodes[group.index()].kind {
            NodeKind::Group(state) => Ok(state),
            _ => Err(CoreError::WrongNodeKind(group, "choice group")),
        }
    }

    fn group_state_mut(&mut self, group: NodeId) -> Result<&mut GroupState> {
        match &mut self.nodes[group.index()].kind {
            NodeKind::Group(state) => Ok(state),
            _ => Err(CoreError::WrongNodeKind(group, "choice group")),
        }
    }

    /// Make the choice named exactly `name` the active one
    ///
    /// Fails with `NotFound` without touching anything when no choice
    /// matches. Re-selecting the active choice is a no-op.
    pub fn select_by_name(&mut self, group: NodeId, name: &str) -> Result<()> {
        let state = self.group_state(group)?;
        let index = state
            .choices
            .iter()
            .position(|choice| self.nodes[choice.index()].name == name)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;

        if index == state.active {
            return Ok(());
        }

        let previous = state.active_choice();
        let next = state.choices[index];
        let on = state.on;
        let selection = state.selection;

        if on {
            self.run_hook(previous, Hook::Disable);
        }
        self.group_state_mut(group)?.active = index;
        if let Value::Choice { active, .. } = &mut self.values[selection.index()].value {
            *active = name.to_string();
        }
        if on {
            self.run_hook(next, Hook::Enable);
        }

        tracing::debug!(
            group = %self.nodes[group.index()].name,
            from = %self.nodes[previous.index()].name,
            to = name,
            "choice selected"
        );

        self.notify(selection);
        Ok(())
    }

    /// Push the group's on/off state to its active choice
    ///
    /// Normally driven by the owner's effective state. Repeating the
    /// current state does nothing.
    pub fn set_group_state(&mut self, group: NodeId, on: bool) -> Result<()> {
        let state = self.group_state_mut(group)?;
        if state.on == on {
            return Ok(());
        }
        state.on = on;
        let active = state.active_choice();

        self.run_hook(active, if on { Hook::Enable } else { Hook::Disable });
        Ok(())
    }

    /// Whether the group is currently on
    pub fn group_is_on(&self, group: NodeId) -> bool {
        self.group_state(group).map(|s| s.on).unwrap_or(false)
    }

    pub fn active_choice(&self, group: NodeId) -> Result<NodeId> {
        self.group_state(group).map(GroupState::active_choice)
    }

    /// Choice names in declaration order
    pub fn choice_names(&self, group: NodeId) -> Result<Vec<&str>> {
        let state = self.group_state(group)?;
        Ok(state.choices.iter().map(|c| self.name(*c)).collect())
    }

    /// The value slot exposing the group's selection
    pub fn selection_value(&self, group: NodeId) -> Result<crate::core::types::ValueId> {
        self.group_state(group).map(|s| s.selection)
    }

    /// Whether `choice` is its group's active choice
    pub fn is_choice_active(&self, choice: NodeId) -> bool {
        match self.nodes[choice.index()].kind {
            NodeKind::Choice { group } => self
                .group_state(group)
                .map(|state| state.active_choice() == choice)
                .unwrap_or(false),
            _ => false,
        }
    }
}
