//! Party actor catalog loader.

use std::path::Path;

use battle_core::ActorDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Actor catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorCatalog {
    pub actors: Vec<ActorDefinition>,
}

/// Loader for the party actor catalog.
pub struct ActorLoader;

impl ActorLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ActorDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ActorDefinition>> {
        let catalog: ActorCatalog = parse_ron(content, "actor catalog")?;
        if let Some(actor) = catalog.actors.iter().find(|a| a.params.max_hp == 0) {
            anyhow::bail!("actor '{}' has zero max_hp", actor.name);
        }
        Ok(catalog.actors)
    }
}
