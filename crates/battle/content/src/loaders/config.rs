//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`BattleConfig::default`].
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.critical_multiplier < 1.0 || config.guard_divisor < 1.0 {
            anyhow::bail!("critical_multiplier and guard_divisor must be at least 1.0");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("max_turns = 30\nawait_animation = true\n").expect("parse");
        assert_eq!(config.max_turns, 30);
        assert!(config.await_animation);
        assert_eq!(config.max_tp, BattleConfig::DEFAULT_MAX_TP);
    }

    #[test]
    fn rejects_shrinking_critical() {
        assert!(ConfigLoader::parse("critical_multiplier = 0.5").is_err());
    }
}
