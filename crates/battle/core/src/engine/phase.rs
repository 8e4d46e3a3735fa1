//! Battle phases and the step results returned by `BattleManager::update`.

use core::fmt;

use crate::battler::BattlerId;

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Abort,
}

impl BattleOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of the session in the turn cycle.
///
/// ```text
/// Init -> Start -> CommandInput -> ActionOrdering -> ActionExecution -> TurnCheck
///                       ^                                                  |
///                       +--------------------------------------------------+
/// ```
///
/// `End` is terminal and reachable from `Start`, `CommandInput` and
/// `TurnCheck`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    Init,
    Start,
    CommandInput,
    ActionOrdering,
    ActionExecution,
    TurnCheck,
    End(BattleOutcome),
}

impl BattlePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End(_))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Start => "start",
            Self::CommandInput => "command_input",
            Self::ActionOrdering => "action_ordering",
            Self::ActionExecution => "action_execution",
            Self::TurnCheck => "turn_check",
            Self::End(_) => "end",
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End(outcome) => write!(f, "end({outcome})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// What one call to `update` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Moved to the given phase; call `update` again.
    Advanced(BattlePhase),
    /// Suspended until commands for these party members are submitted.
    AwaitingCommands(Vec<BattlerId>),
    /// Suspended until the host acknowledges the last executed action.
    AwaitingAnimation,
    /// One queued action was executed.
    ActionExecuted(BattlerId),
    /// The battle is over. Repeated calls keep returning this.
    Finished(BattleOutcome),
}

impl Step {
    /// True when the host must act before the battle can progress.
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::AwaitingCommands(_) | Self::AwaitingAnimation)
    }
}
