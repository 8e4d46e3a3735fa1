//! Content factory for building the definitions store from data files.

use std::path::{Path, PathBuf};

use battle_core::{
    ActorDefinition, BattleConfig, DefinitionsOracle, DefinitionsSnapshot, EffectSpec,
    EnemyDefinition, StateDefinition, TriggerReaction, TroopDefinition, UsableDefinition,
    UsableRef,
};
use tracing::{debug, info};

use crate::loaders::{
    ActorLoader, ConfigLoader, EnemyLoader, ItemLoader, LoadResult, SkillLoader, StateLoader,
    TroopLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// ├── items.ron
/// ├── states.ron
/// ├── enemies.ron
/// ├── actors.ron
/// └── troops.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    pub fn load_skills(&self) -> LoadResult<Vec<UsableDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    pub fn load_items(&self) -> LoadResult<Vec<UsableDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_states(&self) -> LoadResult<Vec<StateDefinition>> {
        StateLoader::load(&self.data_dir.join("states.ron"))
    }

    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyDefinition>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    pub fn load_actors(&self) -> LoadResult<Vec<ActorDefinition>> {
        ActorLoader::load(&self.data_dir.join("actors.ron"))
    }

    pub fn load_troops(&self) -> LoadResult<Vec<TroopDefinition>> {
        TroopLoader::load(&self.data_dir.join("troops.ron"))
    }

    /// Loads every catalog and assembles a validated [`DefinitionsSnapshot`].
    pub fn load_definitions(&self) -> LoadResult<DefinitionsSnapshot> {
        info!(data_dir = %self.data_dir.display(), "loading battle content");
        let catalogs = Catalogs {
            skills: self.load_skills()?,
            items: self.load_items()?,
            states: self.load_states()?,
            enemies: self.load_enemies()?,
            actors: self.load_actors()?,
            troops: self.load_troops()?,
        };
        catalogs.into_snapshot()
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // ========================================================================
    // Embedded defaults
    // ========================================================================

    /// Definitions shipped with the crate (`data/*.ron`).
    pub fn embedded_definitions() -> LoadResult<DefinitionsSnapshot> {
        let catalogs = Catalogs {
            skills: SkillLoader::parse(include_str!("../../data/skills.ron"))?,
            items: ItemLoader::parse(include_str!("../../data/items.ron"))?,
            states: StateLoader::parse(include_str!("../../data/states.ron"))?,
            enemies: EnemyLoader::parse(include_str!("../../data/enemies.ron"))?,
            actors: ActorLoader::parse(include_str!("../../data/actors.ron"))?,
            troops: TroopLoader::parse(include_str!("../../data/troops.ron"))?,
        };
        catalogs.into_snapshot()
    }

    /// Configuration shipped with the crate (`data/config.toml`).
    pub fn embedded_config() -> LoadResult<BattleConfig> {
        ConfigLoader::parse(include_str!("../../data/config.toml"))
    }
}

/// Parsed catalogs before cross-checking.
struct Catalogs {
    skills: Vec<UsableDefinition>,
    items: Vec<UsableDefinition>,
    states: Vec<StateDefinition>,
    enemies: Vec<EnemyDefinition>,
    actors: Vec<ActorDefinition>,
    troops: Vec<TroopDefinition>,
}

impl Catalogs {
    fn into_snapshot(self) -> LoadResult<DefinitionsSnapshot> {
        let mut snapshot = DefinitionsSnapshot::new();

        for usable in self.skills.into_iter().chain(self.items) {
            if snapshot.usable(usable.id).is_some() {
                anyhow::bail!("duplicate usable id {}", usable.id);
            }
            snapshot.insert_usable(usable);
        }
        for state in self.states {
            if snapshot.state(state.id).is_some() {
                anyhow::bail!("duplicate state id {}", state.id);
            }
            snapshot.insert_state(state);
        }
        for enemy in self.enemies {
            if snapshot.enemy(enemy.id).is_some() {
                anyhow::bail!("duplicate enemy id {}", enemy.id);
            }
            snapshot.insert_enemy(enemy);
        }
        for actor in self.actors {
            if snapshot.actor(actor.id).is_some() {
                anyhow::bail!("duplicate actor id {}", actor.id);
            }
            snapshot.insert_actor(actor);
        }
        for troop in self.troops {
            if snapshot.troop(troop.id).is_some() {
                anyhow::bail!("duplicate troop id {}", troop.id);
            }
            snapshot.insert_troop(troop);
        }

        validate_references(&snapshot)?;
        debug!(
            usables = snapshot.usables().count(),
            states = snapshot.states().count(),
            enemies = snapshot.enemies().count(),
            actors = snapshot.actors().count(),
            troops = snapshot.troops().count(),
            "battle content assembled"
        );
        Ok(snapshot)
    }
}

/// Every id a definition mentions must resolve within the snapshot.
pub fn validate_references(snapshot: &DefinitionsSnapshot) -> LoadResult<()> {
    for usable in snapshot.usables() {
        for effect in &usable.effects {
            if let EffectSpec::AddState { state, .. } | EffectSpec::RemoveState { state, .. } =
                *effect
            {
                if snapshot.state(state).is_none() {
                    anyhow::bail!("usable '{}' references unknown {}", usable.name, state);
                }
            }
        }
    }

    for enemy in snapshot.enemies() {
        for action in &enemy.actions {
            if snapshot.usable(UsableRef::Skill(action.skill)).is_none() {
                anyhow::bail!("enemy '{}' references unknown {}", enemy.name, action.skill);
            }
        }
    }

    for actor in snapshot.actors() {
        let skills = [actor.attack_skill, actor.guard_skill]
            .into_iter()
            .chain(actor.skills.iter().copied());
        for skill in skills {
            if snapshot.usable(UsableRef::Skill(skill)).is_none() {
                anyhow::bail!("actor '{}' references unknown {}", actor.name, skill);
            }
        }
    }

    for troop in snapshot.troops() {
        for member in &troop.members {
            if snapshot.enemy(*member).is_none() {
                anyhow::bail!("troop '{}' references unknown {}", troop.name, member);
            }
        }
        for trigger in &troop.triggers {
            for reaction in &trigger.reactions {
                if let TriggerReaction::Enqueue(forced) = reaction {
                    if snapshot.usable(forced.usable).is_none() {
                        anyhow::bail!(
                            "trigger '{}' of troop '{}' references unknown {}",
                            trigger.name,
                            troop.name,
                            forced.usable
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use battle_core::{ActorId, EnemyId, SkillId, TroopId};

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn embedded_content_is_consistent() {
        let snapshot = ContentFactory::embedded_definitions().expect("embedded definitions");
        assert!(snapshot.troop(TroopId(1)).is_some());
        assert!(snapshot.enemy(EnemyId(1)).is_some());
        assert!(snapshot.actor(ActorId(1)).is_some());
        assert!(snapshot.usable(UsableRef::Skill(SkillId(1))).is_some());

        let config = ContentFactory::embedded_config().expect("embedded config");
        assert_eq!(config.max_tp, BattleConfig::DEFAULT_MAX_TP);
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = [
            ("skills.ron", include_str!("../../data/skills.ron")),
            ("items.ron", include_str!("../../data/items.ron")),
            ("states.ron", include_str!("../../data/states.ron")),
            ("enemies.ron", include_str!("../../data/enemies.ron")),
            ("actors.ron", include_str!("../../data/actors.ron")),
            ("troops.ron", include_str!("../../data/troops.ron")),
            ("config.toml", "max_turns = 12\n"),
        ];
        for (name, content) in files {
            fs::write(dir.path().join(name), content).expect("write");
        }

        let factory = ContentFactory::new(dir.path());
        let snapshot = factory.load_definitions().expect("definitions");
        assert_eq!(
            snapshot.troops().count(),
            ContentFactory::embedded_definitions()
                .expect("embedded")
                .troops()
                .count()
        );
        assert_eq!(factory.load_config().expect("config").max_turns, 12);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ContentFactory::new(dir.path())
            .load_definitions()
            .expect_err("no files");
        assert!(err.to_string().contains("skills.ron"));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let snapshot = DefinitionsSnapshot::new().with_troop(TroopDefinition::new(
            TroopId(1),
            "Phantoms",
            vec![EnemyId(404)],
        ));
        let err = validate_references(&snapshot).expect_err("unknown enemy");
        assert!(err.to_string().contains("enemy#404"));
    }
}
