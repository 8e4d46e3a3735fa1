//! Definitions oracle.

use crate::definition::{
    ActorDefinition, ActorId, EnemyDefinition, EnemyId, StateDefinition, StateId,
    TroopDefinition, TroopId, UsableDefinition, UsableRef,
};

/// Read-only lookup of battle content by id.
///
/// Returning `None` means the id is unknown. Setup rejects unknown ids up
/// front; during resolution an unknown id degrades into a warning.
pub trait DefinitionsOracle: Send + Sync {
    /// Skill or item definition.
    fn usable(&self, id: UsableRef) -> Option<&UsableDefinition>;

    fn state(&self, id: StateId) -> Option<&StateDefinition>;

    fn enemy(&self, id: EnemyId) -> Option<&EnemyDefinition>;

    fn actor(&self, id: ActorId) -> Option<&ActorDefinition>;

    fn troop(&self, id: TroopId) -> Option<&TroopDefinition>;
}
