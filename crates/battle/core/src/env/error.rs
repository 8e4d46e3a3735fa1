//! Oracle access errors.

use crate::error::{BattleError, ErrorSeverity};

/// Errors that occur when an oracle required by the engine is missing.
///
/// The engine cannot proceed without definitions, formulas or randomness, so
/// every variant is fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("DefinitionsOracle not available")]
    DefinitionsNotAvailable,

    #[error("FormulaEvaluator not available")]
    FormulasNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl BattleError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DefinitionsNotAvailable => "ORACLE_DEFINITIONS_NOT_AVAILABLE",
            Self::FormulasNotAvailable => "ORACLE_FORMULAS_NOT_AVAILABLE",
            Self::RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}
