//! Content loaders for reading battle data from files.
//!
//! Every catalog is a RON document with a single named list; the battle
//! configuration is TOML. Loaders expose `load(path)` for files and
//! `parse(text)` for in-memory sources such as the embedded defaults.

pub mod actors;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod states;
pub mod troops;
pub mod usables;

pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use states::StateLoader;
pub use troops::TroopLoader;
pub use usables::{ItemLoader, SkillLoader};

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON document, naming `what` in the error.
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
