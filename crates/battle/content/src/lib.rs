//! Data-driven battle content and loaders.
//!
//! This crate houses the default battle catalogs and provides loaders for
//! RON/TOML data files:
//! - Skills and items (`skills.ron`, `items.ron`)
//! - States (`states.ron`)
//! - Enemies with their rated action lists and rewards (`enemies.ron`)
//! - Party actors (`actors.ron`)
//! - Troops and their battle triggers (`troops.ron`)
//! - Battle configuration (`config.toml`)
//!
//! Loaded catalogs are assembled into a [`battle_core::DefinitionsSnapshot`],
//! the in-memory definitions oracle consumed by the battle manager.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorLoader, ConfigLoader, ContentFactory, EnemyLoader, ItemLoader, LoadResult, SkillLoader,
    StateLoader, TroopLoader,
};
