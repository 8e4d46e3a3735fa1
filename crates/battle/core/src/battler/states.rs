//! Active state instances on a battler.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::definition::{GroupId, StateDefinition, StateId};

/// One applied state with its remaining-turn counter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateInstance {
    pub definition: StateDefinition,
    /// `None` when the state does not expire by turns.
    pub remaining: Option<u32>,
}

impl StateInstance {
    pub fn new(definition: StateDefinition, remaining: Option<u32>) -> Self {
        Self {
            definition,
            remaining,
        }
    }

    pub fn id(&self) -> StateId {
        self.definition.id
    }
}

/// Bounded set of active states, at most one instance per state id.
///
/// Insertion order is kept; it is the order states are ticked and reported.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStates {
    states: ArrayVec<StateInstance, { BattleConfig::MAX_ACTIVE_STATES }>,
}

impl ActiveStates {
    pub fn new() -> Self {
        Self {
            states: ArrayVec::new(),
        }
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.states.iter().any(|s| s.id() == id)
    }

    pub fn get(&self, id: StateId) -> Option<&StateInstance> {
        self.states.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: StateId) -> Option<&mut StateInstance> {
        self.states.iter_mut().find(|s| s.id() == id)
    }

    /// Adds or replaces the instance with the same id.
    ///
    /// Returns `false` when the set is full and the id is new.
    pub fn insert(&mut self, instance: StateInstance) -> bool {
        if let Some(existing) = self.get_mut(instance.id()) {
            *existing = instance;
            return true;
        }
        self.states.try_push(instance).is_ok()
    }

    pub fn remove(&mut self, id: StateId) -> Option<StateInstance> {
        let position = self.states.iter().position(|s| s.id() == id)?;
        Some(self.states.remove(position))
    }

    /// Removes every state, returning their ids in order.
    pub fn clear(&mut self) -> Vec<StateId> {
        let ids = self.ids();
        self.states.clear();
        ids
    }

    /// Active state belonging to the exclusive group, if any.
    pub fn group_member(&self, group: GroupId) -> Option<&StateInstance> {
        self.states
            .iter()
            .find(|s| s.definition.exclusive_group == Some(group))
    }

    pub fn ids(&self) -> Vec<StateId> {
        self.states.iter().map(StateInstance::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateInstance> {
        self.states.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StateInstance> {
        self.states.iter_mut()
    }

    pub fn is_full(&self) -> bool {
        self.states.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}
