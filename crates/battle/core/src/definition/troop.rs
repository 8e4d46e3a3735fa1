//! Troop definitions.

use super::{EnemyId, TroopId};
use crate::trigger::TriggerDefinition;

/// An enemy formation plus its battle event triggers.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TroopDefinition {
    pub id: TroopId,
    pub name: String,
    pub members: Vec<EnemyId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub triggers: Vec<TriggerDefinition>,
}

impl TroopDefinition {
    pub fn new(id: TroopId, name: impl Into<String>, members: Vec<EnemyId>) -> Self {
        Self {
            id,
            name: name.into(),
            members,
            triggers: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: TriggerDefinition) -> Self {
        self.triggers.push(trigger);
        self
    }
}
