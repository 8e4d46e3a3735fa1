//! Per-target action results.

use crate::battler::BattlerId;
use crate::definition::{ParamKind, StateId, UsableRef};

use super::ResolutionWarning;

/// Buff stage movement recorded in a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffChange {
    pub param: ParamKind,
    /// Applied change, after clamping.
    pub delta: i8,
    /// Stage afterwards.
    pub stage: i8,
}

/// Outcome of one action against one target.
///
/// Deltas are the values actually applied after clamping (negative for
/// damage). `drained_*` are the amounts the subject gained from a drain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    pub subject: Option<BattlerId>,
    /// `None` for usables without targets and for skipped actions.
    pub target: Option<BattlerId>,
    pub usable: Option<UsableRef>,
    pub used: bool,
    pub hit: bool,
    pub evaded: bool,
    pub missed: bool,
    pub critical: bool,
    pub guarded: bool,
    pub hp_delta: i64,
    pub mp_delta: i64,
    pub tp_delta: i64,
    pub drained_hp: i64,
    pub drained_mp: i64,
    pub added_states: Vec<StateId>,
    pub removed_states: Vec<StateId>,
    pub buff_changes: Vec<BuffChange>,
    pub warning: Option<ResolutionWarning>,
}

impl ActionResult {
    pub fn new(subject: BattlerId, target: Option<BattlerId>, usable: UsableRef) -> Self {
        Self {
            subject: Some(subject),
            target,
            usable: Some(usable),
            ..Self::default()
        }
    }

    /// A `used = false` record carrying the reason.
    pub fn skipped(
        subject: BattlerId,
        target: Option<BattlerId>,
        usable: UsableRef,
        warning: ResolutionWarning,
    ) -> Self {
        Self {
            warning: Some(warning),
            ..Self::new(subject, target, usable)
        }
    }

    /// Records a warning unless an earlier one is already present.
    pub fn warn(&mut self, warning: ResolutionWarning) {
        if self.warning.is_none() {
            self.warning = Some(warning);
        }
    }
}
