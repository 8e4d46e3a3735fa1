//! Enemy catalog loader.

use std::path::Path;

use battle_core::EnemyDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyDefinition>,
}

/// Loader for the enemy catalog.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyDefinition>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse an enemy catalog. Action ratings must be within `1..=9` and
    /// max HP must be positive.
    pub fn parse(content: &str) -> LoadResult<Vec<EnemyDefinition>> {
        let catalog: EnemyCatalog = parse_ron(content, "enemy catalog")?;
        for enemy in &catalog.enemies {
            if enemy.params.max_hp == 0 {
                anyhow::bail!("enemy '{}' has zero max_hp", enemy.name);
            }
            if let Some(action) = enemy.actions.iter().find(|a| !(1..=9).contains(&a.rating)) {
                anyhow::bail!(
                    "enemy '{}' rates {} at {}, expected 1..=9",
                    enemy.name,
                    action.skill,
                    action.rating
                );
            }
        }
        Ok(catalog.enemies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIME: &str = r#"
        #![enable(implicit_some, unwrap_newtypes)]
        (enemies: [
            (
                id: 1,
                name: "Slime",
                params: (max_hp: 60, max_mp: 0, atk: 12, def: 6, mat: 4, mdf: 4, agi: 8, luk: 5),
                actions: [(skill: 1, rating: RATING)],
                exp: 4,
                gold: 3,
                drops: [(item: 1, denominator: 2)],
            ),
        ])
    "#;

    #[test]
    fn parses_rewards_and_actions() {
        let enemies = EnemyLoader::parse(&SLIME.replace("RATING", "5")).expect("parse");
        assert_eq!(enemies[0].exp, 4);
        assert_eq!(enemies[0].drops[0].denominator, 2);
        assert_eq!(enemies[0].actions[0].rating, 5);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let err = EnemyLoader::parse(&SLIME.replace("RATING", "12")).expect_err("rating 12");
        assert!(err.to_string().contains("Slime"));
    }
}
