use crate::battler::{BattlerId, Side};
use crate::definition::{ActorId, EnemyId, StateId, TroopId, UsableRef};
use crate::env::OracleError;
use crate::error::{BattleError, ErrorSeverity};

use super::BattlePhase;

/// Errors that prevent a battle session from being created or continued.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("troop {0} is not defined")]
    UnknownTroop(TroopId),

    #[error("troop {0} has no members")]
    EmptyTroop(TroopId),

    #[error("{side:?} has {count} battlers, at most {max} are allowed")]
    TooManyBattlers { side: Side, count: usize, max: usize },

    #[error("enemy {0} is not defined")]
    UnknownEnemy(EnemyId),

    #[error("actor {0} is not defined")]
    UnknownActor(ActorId),

    #[error("usable {0} is referenced but not defined")]
    UnknownUsable(UsableRef),

    #[error("state {0} is referenced but not defined")]
    UnknownState(StateId),

    #[error("party is empty")]
    EmptyParty,

    #[error("no party member is alive")]
    NoLivingPartyMember,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTroop(_) => "SETUP_UNKNOWN_TROOP",
            Self::EmptyTroop(_) => "SETUP_EMPTY_TROOP",
            Self::TooManyBattlers { .. } => "SETUP_TOO_MANY_BATTLERS",
            Self::UnknownEnemy(_) => "SETUP_UNKNOWN_ENEMY",
            Self::UnknownActor(_) => "SETUP_UNKNOWN_ACTOR",
            Self::UnknownUsable(_) => "SETUP_UNKNOWN_USABLE",
            Self::UnknownState(_) => "SETUP_UNKNOWN_STATE",
            Self::EmptyParty => "SETUP_EMPTY_PARTY",
            Self::NoLivingPartyMember => "SETUP_NO_LIVING_PARTY_MEMBER",
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Rejected command submissions. The session is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("commands are not accepted during {0}")]
    NotAcceptingCommands(BattlePhase),

    #[error("battler {0} does not exist")]
    UnknownBattler(BattlerId),

    #[error("battler {0} is not a party member")]
    NotAPartyMember(BattlerId),

    #[error("battler {0} cannot receive commands")]
    CannotAct(BattlerId),

    #[error("usable {0} is not defined")]
    UnknownUsable(UsableRef),

    #[error("battler {subject} has not learned {usable}")]
    NotLearned { subject: BattlerId, usable: UsableRef },

    #[error("battler {0} cannot pay the cost")]
    InsufficientCost(BattlerId),

    #[error("{target} is not a valid target for {usable}")]
    InvalidTarget { usable: UsableRef, target: BattlerId },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl BattleError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAcceptingCommands(_) => "COMMAND_NOT_ACCEPTING",
            Self::UnknownBattler(_) => "COMMAND_UNKNOWN_BATTLER",
            Self::NotAPartyMember(_) => "COMMAND_NOT_PARTY_MEMBER",
            Self::CannotAct(_) => "COMMAND_CANNOT_ACT",
            Self::UnknownUsable(_) => "COMMAND_UNKNOWN_USABLE",
            Self::NotLearned { .. } => "COMMAND_NOT_LEARNED",
            Self::InsufficientCost(_) => "COMMAND_INSUFFICIENT_COST",
            Self::InvalidTarget { .. } => "COMMAND_INVALID_TARGET",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
