//! Troop catalog loader.

use std::path::Path;

use battle_core::{BattleConfig, TroopDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Troop catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TroopCatalog {
    pub troops: Vec<TroopDefinition>,
}

/// Loader for the troop catalog, triggers included.
pub struct TroopLoader;

impl TroopLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<TroopDefinition>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a troop catalog. Member counts must fit a battle.
    pub fn parse(content: &str) -> LoadResult<Vec<TroopDefinition>> {
        let catalog: TroopCatalog = parse_ron(content, "troop catalog")?;
        for troop in &catalog.troops {
            let count = troop.members.len();
            if count == 0 || count > BattleConfig::MAX_TROOP_SIZE {
                anyhow::bail!(
                    "troop '{}' has {} members, expected 1..={}",
                    troop.name,
                    count,
                    BattleConfig::MAX_TROOP_SIZE
                );
            }
        }
        Ok(catalog.troops)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{Checkpoint, Checkpoints, FlowDirective, RunPolicy, TriggerReaction};

    use super::*;

    #[test]
    fn parses_triggers() {
        let ron = r#"
            #![enable(implicit_some, unwrap_newtypes)]
            (troops: [
                (
                    id: 3,
                    name: "Boss",
                    members: [3, 1],
                    triggers: [
                        (
                            name: "enrage",
                            condition: HpBelow(battler: Side(Troop), percent: 50),
                            policy: Once,
                            reactions: [Enqueue((subject: (side: Troop, index: 0), usable: Skill(5), target: None))],
                        ),
                        (
                            name: "time up",
                            condition: TurnModulo(start: 10, span: 0),
                            reactions: [Directive(Abort)],
                            checkpoints: "TURN_END",
                        ),
                    ],
                ),
            ])
        "#;
        let troops = TroopLoader::parse(ron).expect("parse");
        let triggers = &troops[0].triggers;
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].policy, RunPolicy::Once);
        assert_eq!(triggers[0].checkpoints, Checkpoints::all());
        assert_eq!(triggers[1].reactions, vec![TriggerReaction::Directive(FlowDirective::Abort)]);
        assert!(!triggers[1].checkpoints.contains(Checkpoint::AfterAction.into()));
    }

    #[test]
    fn empty_troop_is_rejected() {
        assert!(TroopLoader::parse(r#"(troops: [(id: (1), name: "Ghosts", members: [])])"#).is_err());
    }
}
