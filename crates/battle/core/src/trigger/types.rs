//! Trigger definitions, reactions and evaluation outcomes.

use crate::battler::BattlerId;
use crate::definition::UsableRef;
use crate::error::{BattleError, ErrorSeverity};

use super::{Checkpoint, Checkpoints, TriggerCondition};

/// How often a trigger may fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunPolicy {
    /// Disabled after its first firing.
    #[default]
    Once,
    /// At most once per turn.
    OncePerTurn,
    /// Every time the condition holds.
    Repeat,
}

/// Flow directive issued by a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowDirective {
    /// Ends the battle with `Abort` (escape, scripted interruption).
    Abort,
    /// Discards the remaining actions of the current turn.
    EndTurn,
}

impl FlowDirective {
    /// True when the directive ends the battle, which stops evaluation of
    /// later triggers at the same checkpoint.
    pub const fn preempts(self) -> bool {
        !matches!(self, Self::EndTurn)
    }
}

/// Action injected ahead of the next ordering pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForcedAction {
    pub subject: BattlerId,
    pub usable: UsableRef,
    /// Requested target; the usable's scope decides when absent.
    pub target: Option<BattlerId>,
}

/// What a firing trigger does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerReaction {
    Enqueue(ForcedAction),
    Directive(FlowDirective),
}

/// Troop-level trigger.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerDefinition {
    pub name: String,
    pub condition: TriggerCondition,
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: RunPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reactions: Vec<TriggerReaction>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub checkpoints: Checkpoints,
}

impl TriggerDefinition {
    pub fn new(name: impl Into<String>, condition: TriggerCondition) -> Self {
        Self {
            name: name.into(),
            condition,
            policy: RunPolicy::Once,
            reactions: Vec::new(),
            checkpoints: Checkpoints::all(),
        }
    }

    pub fn with_policy(mut self, policy: RunPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_reaction(mut self, reaction: TriggerReaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    pub fn at(mut self, checkpoints: Checkpoints) -> Self {
        self.checkpoints = checkpoints;
        self
    }
}

/// Two directives issued at one checkpoint; the earlier one is kept.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("trigger '{trigger}' issued {discarded:?} at {checkpoint:?}, but {kept:?} was already issued")]
pub struct TriggerConflict {
    pub checkpoint: Checkpoint,
    /// Name of the trigger whose directive was discarded.
    pub trigger: String,
    pub kept: FlowDirective,
    pub discarded: FlowDirective,
}

impl BattleError for TriggerConflict {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "TRIGGER_CONFLICT"
    }
}

/// Everything one checkpoint evaluation produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerOutcome {
    /// Names of the triggers that fired, in list order.
    pub fired: Vec<String>,
    /// Forced actions in registration order.
    pub actions: Vec<ForcedAction>,
    pub directive: Option<FlowDirective>,
    pub conflicts: Vec<TriggerConflict>,
}

impl TriggerOutcome {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}
