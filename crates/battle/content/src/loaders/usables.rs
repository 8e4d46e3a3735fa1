//! Skill and item catalog loaders.

use std::path::Path;

use battle_core::{UsableDefinition, UsableRef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<UsableDefinition>,
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<UsableDefinition>,
}

/// Loader for the skill catalog.
pub struct SkillLoader;

impl SkillLoader {
    /// Load the skill catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<UsableDefinition>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a skill catalog. Every entry must carry a `Skill(..)` id.
    pub fn parse(content: &str) -> LoadResult<Vec<UsableDefinition>> {
        let catalog: SkillCatalog = parse_ron(content, "skill catalog")?;
        for skill in &catalog.skills {
            if !matches!(skill.id, UsableRef::Skill(_)) {
                anyhow::bail!("skill catalog entry '{}' has item id {}", skill.name, skill.id);
            }
        }
        Ok(catalog.skills)
    }
}

/// Loader for the item catalog.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<UsableDefinition>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse an item catalog. Every entry must carry an `Item(..)` id.
    pub fn parse(content: &str) -> LoadResult<Vec<UsableDefinition>> {
        let catalog: ItemCatalog = parse_ron(content, "item catalog")?;
        for item in &catalog.items {
            if !matches!(item.id, UsableRef::Item(_)) {
                anyhow::bail!("item catalog entry '{}' has skill id {}", item.name, item.id);
            }
        }
        Ok(catalog.items)
    }
}
