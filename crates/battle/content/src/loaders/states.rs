//! State catalog loader.

use std::path::Path;

use battle_core::StateDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// State catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateCatalog {
    pub states: Vec<StateDefinition>,
}

/// Loader for the state catalog.
pub struct StateLoader;

impl StateLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StateDefinition>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a state catalog, rejecting durations with `min_turns > max_turns`
    /// and percentages above 100.
    pub fn parse(content: &str) -> LoadResult<Vec<StateDefinition>> {
        let catalog: StateCatalog = parse_ron(content, "state catalog")?;
        for state in &catalog.states {
            if state.min_turns > state.max_turns {
                anyhow::bail!(
                    "state '{}' has min_turns {} above max_turns {}",
                    state.name,
                    state.min_turns,
                    state.max_turns
                );
            }
            if state.priority > 100 || state.removal_chance > 100 {
                anyhow::bail!("state '{}' has a percentage above 100", state.name);
            }
        }
        Ok(catalog.states)
    }
}
