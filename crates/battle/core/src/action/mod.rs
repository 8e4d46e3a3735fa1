//! Actions and their resolution.
//!
//! An [`Action`] is one intended use of a skill or item. The battle manager
//! resolves its targets at execution time ([`targeting`]) and hands each
//! subject-target pair to the [`ActionResolver`], which produces one
//! [`ActionResult`].
//!
//! # Module Structure
//!
//! - `result`: per-target outcome records
//! - `warning`: recoverable anomalies carried in results
//! - `targeting`: scope expansion and retargeting
//! - `resolver`: hit/critical/damage/effect pipeline

mod resolver;
mod result;
pub mod targeting;
mod warning;

pub use resolver::ActionResolver;
pub use result::{ActionResult, BuffChange};
pub use warning::ResolutionWarning;

use crate::battler::{BattlerId, StatView};
use crate::definition::UsableRef;

/// Where an action came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOrigin {
    /// Submitted by the host for a party member.
    #[default]
    Command,
    /// Chosen by the enemy AI.
    Ai,
    /// Generated for a battler under an `AttackAny`/`AttackEnemy`/`Recover`
    /// restriction. Its target may be on either side.
    Auto,
    /// Injected by a troop trigger. Skips restriction and cost checks.
    Trigger,
}

/// One intended use of a usable by a subject.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub subject: BattlerId,
    pub usable: UsableRef,
    /// Requested targets. Scopes choosing one target read the first entry.
    pub targets: Vec<BattlerId>,
    /// Subject stats captured at decision time. Resolution uses live stats
    /// when absent.
    pub snapshot: Option<StatView>,
    pub origin: ActionOrigin,
}

impl Action {
    pub fn new(subject: BattlerId, usable: UsableRef, targets: Vec<BattlerId>) -> Self {
        Self {
            subject,
            usable,
            targets,
            snapshot: None,
            origin: ActionOrigin::Command,
        }
    }

    /// Action aimed at a single requested target.
    pub fn targeting(subject: BattlerId, usable: UsableRef, target: BattlerId) -> Self {
        Self::new(subject, usable, vec![target])
    }

    pub fn with_origin(mut self, origin: ActionOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_snapshot(mut self, snapshot: StatView) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// True for trigger-injected actions.
    pub fn is_forced(&self) -> bool {
        self.origin == ActionOrigin::Trigger
    }
}
