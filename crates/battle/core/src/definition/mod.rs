//! Read-only definition types consumed from the Definitions Store.
//!
//! Definitions describe skills, items, states, enemies, party actors and
//! troops. They never change during a battle; the engine copies the pieces it
//! needs (base parameters, state rules) into the mutable battler model.

mod battler;
mod params;
mod state;
mod troop;
mod usable;

use core::fmt;

pub use battler::{ActionCondition, ActorDefinition, DropItem, EnemyAction, EnemyDefinition};
pub use params::{BaseParams, ExParamKind, ExParams, Modifier, PARAM_COUNT, ParamKind};
pub use state::{RemovalTiming, Restriction, StateDefinition};
pub use troop::TroopDefinition;
pub use usable::{
    DamageKind, DamageSpec, EffectSpec, HitType, TargetScope, UsableDefinition, UsableRef,
};

macro_rules! definition_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

definition_id!(
    /// Identifier of a skill definition.
    SkillId,
    "skill#"
);
definition_id!(
    /// Identifier of an item definition.
    ItemId,
    "item#"
);
definition_id!(
    /// Identifier of a state definition.
    StateId,
    "state#"
);
definition_id!(
    /// Identifier of an enemy definition.
    EnemyId,
    "enemy#"
);
definition_id!(
    /// Identifier of a party actor definition.
    ActorId,
    "actor#"
);
definition_id!(
    /// Identifier of a troop definition.
    TroopId,
    "troop#"
);
definition_id!(
    /// Identifier of a damage element (fire, ice, ...).
    ElementId,
    "element#"
);
definition_id!(
    /// Tag shared by mutually exclusive states.
    GroupId,
    "group#"
);
