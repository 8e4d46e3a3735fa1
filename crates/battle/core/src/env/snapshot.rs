//! In-memory definitions store.
//!
//! Hosts that load content up front (tests, the content crate) hand a
//! [`DefinitionsSnapshot`] to the engine as its [`DefinitionsOracle`].

use std::collections::BTreeMap;

use super::DefinitionsOracle;
use crate::definition::{
    ActorDefinition, ActorId, EnemyDefinition, EnemyId, StateDefinition, StateId,
    TroopDefinition, TroopId, UsableDefinition, UsableRef,
};

/// Owned, id-keyed collection of every definition kind.
#[derive(Clone, Debug, Default)]
pub struct DefinitionsSnapshot {
    usables: BTreeMap<UsableRef, UsableDefinition>,
    states: BTreeMap<StateId, StateDefinition>,
    enemies: BTreeMap<EnemyId, EnemyDefinition>,
    actors: BTreeMap<ActorId, ActorDefinition>,
    troops: BTreeMap<TroopId, TroopDefinition>,
}

impl DefinitionsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    // Inserting an id twice replaces the earlier definition.

    pub fn insert_usable(&mut self, definition: UsableDefinition) {
        self.usables.insert(definition.id, definition);
    }

    pub fn insert_state(&mut self, definition: StateDefinition) {
        self.states.insert(definition.id, definition);
    }

    pub fn insert_enemy(&mut self, definition: EnemyDefinition) {
        self.enemies.insert(definition.id, definition);
    }

    pub fn insert_actor(&mut self, definition: ActorDefinition) {
        self.actors.insert(definition.id, definition);
    }

    pub fn insert_troop(&mut self, definition: TroopDefinition) {
        self.troops.insert(definition.id, definition);
    }

    pub fn with_usable(mut self, definition: UsableDefinition) -> Self {
        self.insert_usable(definition);
        self
    }

    pub fn with_state(mut self, definition: StateDefinition) -> Self {
        self.insert_state(definition);
        self
    }

    pub fn with_enemy(mut self, definition: EnemyDefinition) -> Self {
        self.insert_enemy(definition);
        self
    }

    pub fn with_actor(mut self, definition: ActorDefinition) -> Self {
        self.insert_actor(definition);
        self
    }

    pub fn with_troop(mut self, definition: TroopDefinition) -> Self {
        self.insert_troop(definition);
        self
    }

    pub fn usables(&self) -> impl Iterator<Item = &UsableDefinition> {
        self.usables.values()
    }

    pub fn states(&self) -> impl Iterator<Item = &StateDefinition> {
        self.states.values()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyDefinition> {
        self.enemies.values()
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorDefinition> {
        self.actors.values()
    }

    pub fn troops(&self) -> impl Iterator<Item = &TroopDefinition> {
        self.troops.values()
    }
}

impl DefinitionsOracle for DefinitionsSnapshot {
    fn usable(&self, id: UsableRef) -> Option<&UsableDefinition> {
        self.usables.get(&id)
    }

    fn state(&self, id: StateId) -> Option<&StateDefinition> {
        self.states.get(&id)
    }

    fn enemy(&self, id: EnemyId) -> Option<&EnemyDefinition> {
        self.enemies.get(&id)
    }

    fn actor(&self, id: ActorId) -> Option<&ActorDefinition> {
        self.actors.get(&id)
    }

    fn troop(&self, id: TroopId) -> Option<&TroopDefinition> {
        self.troops.get(&id)
    }
}
