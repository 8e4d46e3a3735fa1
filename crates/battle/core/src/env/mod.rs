//! Traits describing read-only collaborators of the engine.
//!
//! Oracles expose definitions (skills, items, states, enemies, actors,
//! troops), the formula evaluation capability and deterministic randomness.
//! The [`Env`] aggregate bundles them so the engine can access everything it
//! needs without hard coupling to concrete implementations.
mod definitions;
mod error;
mod formula;
mod rng;
mod snapshot;

use core::fmt;

pub use definitions::DefinitionsOracle;
pub use error::OracleError;
pub use formula::FormulaEvaluator;
pub use rng::{Dice, PcgRng, RngOracle, compute_seed};
pub use snapshot::DefinitionsSnapshot;

/// Aggregates read-only oracles required by the battle manager and resolver.
///
/// Only references are held, so the aggregate is `Copy` even over trait
/// objects.
pub struct Env<'a, D, F, R>
where
    D: DefinitionsOracle + ?Sized,
    F: FormulaEvaluator + ?Sized,
    R: RngOracle + ?Sized,
{
    definitions: Option<&'a D>,
    formulas: Option<&'a F>,
    rng: Option<&'a R>,
}

impl<D, F, R> Clone for Env<'_, D, F, R>
where
    D: DefinitionsOracle + ?Sized,
    F: FormulaEvaluator + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, F, R> Copy for Env<'_, D, F, R>
where
    D: DefinitionsOracle + ?Sized,
    F: FormulaEvaluator + ?Sized,
    R: RngOracle + ?Sized,
{
}

impl<D, F, R> fmt::Debug for Env<'_, D, F, R>
where
    D: DefinitionsOracle + ?Sized,
    F: FormulaEvaluator + ?Sized,
    R: RngOracle + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("definitions", &self.definitions.is_some())
            .field("formulas", &self.formulas.is_some())
            .field("rng", &self.rng.is_some())
            .finish()
    }
}

pub type BattleEnv<'a> =
    Env<'a, dyn DefinitionsOracle + 'a, dyn FormulaEvaluator + 'a, dyn RngOracle + 'a>;

impl<'a, D, F, R> Env<'a, D, F, R>
where
    D: DefinitionsOracle + ?Sized,
    F: FormulaEvaluator + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(definitions: Option<&'a D>, formulas: Option<&'a F>, rng: Option<&'a R>) -> Self {
        Self {
            definitions,
            formulas,
            rng,
        }
    }

    pub fn with_all(definitions: &'a D, formulas: &'a F, rng: &'a R) -> Self {
        Self::new(Some(definitions), Some(formulas), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            definitions: None,
            formulas: None,
            rng: None,
        }
    }

    /// Returns the DefinitionsOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::DefinitionsNotAvailable` if no definitions oracle was provided.
    pub fn definitions(&self) -> Result<&'a D, OracleError> {
        self.definitions.ok_or(OracleError::DefinitionsNotAvailable)
    }

    /// Returns the FormulaEvaluator, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::FormulasNotAvailable` if no evaluator was provided.
    pub fn formulas(&self) -> Result<&'a F, OracleError> {
        self.formulas.ok_or(OracleError::FormulasNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Checks that every oracle is present.
    pub fn ensure_complete(&self) -> Result<(), OracleError> {
        self.definitions()?;
        self.formulas()?;
        self.rng()?;
        Ok(())
    }
}

impl<'a, D, F, R> Env<'a, D, F, R>
where
    D: DefinitionsOracle + 'a,
    F: FormulaEvaluator + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `BattleEnv` (borrows self).
    pub fn as_battle_env(&self) -> BattleEnv<'a> {
        let definitions: Option<&'a dyn DefinitionsOracle> = self.definitions.map(|d| d as _);
        let formulas: Option<&'a dyn FormulaEvaluator> = self.formulas.map(|f| f as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|r| r as _);
        Env::new(definitions, formulas, rng)
    }
}
