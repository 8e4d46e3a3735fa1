//! Mutable state of one battle.

use std::collections::{BTreeMap, VecDeque};

use crate::action::Action;
use crate::battler::{BattlerId, Roster};
use crate::definition::TroopId;
use crate::env::{Dice, RngOracle};
use crate::trigger::{Checkpoint, FlowDirective, SessionView};

use super::{BattleOutcome, BattlePhase};

/// Everything that changes while a battle runs.
///
/// Owned by the [`super::BattleManager`]; hosts get read access through
/// [`super::BattleManager::session`].
#[derive(Clone, Debug)]
pub struct BattleSession {
    pub troop: TroopId,
    /// Starts at 1 and grows by exactly one per completed turn.
    pub turn: u32,
    pub phase: BattlePhase,
    pub roster: Roster,
    /// Commands gathered during `CommandInput`, keyed by subject.
    pub commands: BTreeMap<BattlerId, Action>,
    /// Actions awaiting execution this turn, in execution order.
    pub queue: VecDeque<Action>,
    /// Trigger-injected actions, run first in the next ordering pass.
    pub forced: Vec<Action>,
    /// Directive waiting for the next execution or turn-check boundary.
    pub pending_directive: Option<FlowDirective>,
    pub outcome: Option<BattleOutcome>,
    seed: u64,
    cursor: u64,
}

impl BattleSession {
    pub(crate) fn new(troop: TroopId, seed: u64) -> Self {
        Self {
            troop,
            turn: 1,
            phase: BattlePhase::Init,
            roster: Roster::new(),
            commands: BTreeMap::new(),
            queue: VecDeque::new(),
            forced: Vec::new(),
            pending_directive: None,
            outcome: None,
            seed,
            cursor: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of random draws taken so far.
    pub fn draws(&self) -> u64 {
        self.cursor
    }

    /// Opens the session's draw stream at its current position.
    pub(crate) fn dice<'r>(&self, rng: &'r dyn RngOracle) -> Dice<'r> {
        Dice::new(rng, self.seed, self.cursor)
    }

    /// Persists the stream position of `dice`.
    pub(crate) fn commit(&mut self, dice: &Dice<'_>) {
        self.cursor = dice.cursor();
    }

    pub fn view(&self, checkpoint: Checkpoint) -> SessionView<'_> {
        SessionView {
            turn: self.turn,
            roster: &self.roster,
            checkpoint,
        }
    }

    /// Records a directive unless one is already waiting.
    ///
    /// Returns the directive that was dropped, if any.
    pub(crate) fn push_directive(&mut self, directive: FlowDirective) -> Option<FlowDirective> {
        match self.pending_directive {
            None => {
                self.pending_directive = Some(directive);
                None
            }
            Some(_) => Some(directive),
        }
    }
}
