//! Recoverable resolution anomalies.

use crate::battler::BattlerId;
use crate::definition::{StateId, UsableRef};
use crate::env::OracleError;
use crate::error::{BattleError, ErrorSeverity};
use crate::formula::FormulaError;

/// Anomaly met while resolving an action.
///
/// Never fatal: the affected result degrades to a no-effect (or partial)
/// outcome and the battle continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionWarning {
    #[error("subject {0} can no longer act")]
    SubjectUnavailable(BattlerId),

    #[error("target {0} is not a valid target")]
    TargetUnavailable(BattlerId),

    #[error("no valid target remains")]
    NoTarget,

    #[error("subject {0} cannot pay the cost")]
    InsufficientCost(BattlerId),

    #[error("usable {0} is not defined")]
    UnknownUsable(UsableRef),

    #[error("state {0} is not defined")]
    UnknownState(StateId),

    #[error("formula failed: {0}")]
    FormulaFailed(FormulaError),

    #[error("cancelled by hook '{0}'")]
    CancelledByHook(String),

    #[error(transparent)]
    OracleUnavailable(OracleError),
}

impl BattleError for ResolutionWarning {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SubjectUnavailable(_) => "RESOLUTION_SUBJECT_UNAVAILABLE",
            Self::TargetUnavailable(_) => "RESOLUTION_TARGET_UNAVAILABLE",
            Self::NoTarget => "RESOLUTION_NO_TARGET",
            Self::InsufficientCost(_) => "RESOLUTION_INSUFFICIENT_COST",
            Self::UnknownUsable(_) => "RESOLUTION_UNKNOWN_USABLE",
            Self::UnknownState(_) => "RESOLUTION_UNKNOWN_STATE",
            Self::FormulaFailed(_) => "RESOLUTION_FORMULA_FAILED",
            Self::CancelledByHook(_) => "RESOLUTION_CANCELLED_BY_HOOK",
            Self::OracleUnavailable(_) => "RESOLUTION_ORACLE_UNAVAILABLE",
        }
    }
}
