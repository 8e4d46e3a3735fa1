use crate::action::{Action, ActionResult};
use crate::battler::BattlerId;
use crate::definition::{ParamKind, StateId};
use crate::trigger::{Checkpoint, TriggerConflict};

use super::{BattlePhase, BattleSummary};

/// Notifications buffered by the manager until the host drains them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    PhaseChanged {
        from: BattlePhase,
        to: BattlePhase,
    },
    /// One action with a result per resolved target (a single skipped
    /// record when it could not be used).
    ActionExecuted {
        action: Action,
        results: Vec<ActionResult>,
    },
    StateExpired {
        battler: BattlerId,
        state: StateId,
    },
    BuffExpired {
        battler: BattlerId,
        param: ParamKind,
    },
    TriggerFired {
        checkpoint: Checkpoint,
        trigger: String,
    },
    TriggerConflict(TriggerConflict),
    TurnEnded {
        turn: u32,
    },
    BattleEnded(BattleSummary),
}
