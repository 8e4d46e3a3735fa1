//! Trigger conditions and the checkpoints they are evaluated at.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::battler::{Battler, BattlerId, Side};

use super::SessionView;

/// Point in the battle flow where triggers are evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Checkpoint {
    BattleStart,
    AfterAction,
    TurnEnd,
}

bitflags! {
    /// Set of checkpoints a trigger listens to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Checkpoints: u8 {
        const BATTLE_START = 1 << 0;
        const AFTER_ACTION = 1 << 1;
        const TURN_END = 1 << 2;
    }
}

impl Default for Checkpoints {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Checkpoint> for Checkpoints {
    fn from(checkpoint: Checkpoint) -> Self {
        match checkpoint {
            Checkpoint::BattleStart => Self::BATTLE_START,
            Checkpoint::AfterAction => Self::AFTER_ACTION,
            Checkpoint::TurnEnd => Self::TURN_END,
        }
    }
}

/// Which battlers an HP or defeat condition watches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlerSelector {
    Any,
    Side(Side),
    Battler(BattlerId),
}

impl BattlerSelector {
    pub fn matches(self, id: BattlerId) -> bool {
        match self {
            Self::Any => true,
            Self::Side(side) => id.side == side,
            Self::Battler(target) => id == target,
        }
    }
}

/// Host-supplied boolean condition over the session.
pub trait SessionPredicate: Send + Sync {
    fn evaluate(&self, view: &SessionView<'_>) -> bool;
}

impl<F> SessionPredicate for F
where
    F: Fn(&SessionView<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, view: &SessionView<'_>) -> bool {
        self(view)
    }
}

/// Condition of a troop trigger.
///
/// `HpBelow` and `BattlerDefeated` are edge-triggered: they hold only when a
/// watched battler crossed the threshold (or died) since the previous
/// evaluation.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerCondition {
    /// Turn `start`, then every `span` turns (`span == 0`: only `start`).
    /// Holds at turn-end checkpoints only.
    TurnModulo { start: u32, span: u32 },
    /// A watched battler's HP dropped to `percent` of max HP or lower.
    HpBelow {
        battler: BattlerSelector,
        percent: u32,
    },
    /// Holds at the battle-start checkpoint only.
    BattleStart,
    BattlerDefeated(BattlerSelector),
    #[cfg_attr(feature = "serde", serde(skip))]
    Predicate(Arc<dyn SessionPredicate>),
    /// Every inner condition holds.
    All(Vec<TriggerCondition>),
}

impl TriggerCondition {
    pub fn predicate(f: impl Fn(&SessionView<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    pub(crate) fn holds(&self, view: &SessionView<'_>, observed: &Observations) -> bool {
        match self {
            Self::TurnModulo { start, span } => {
                view.checkpoint == Checkpoint::TurnEnd && turn_matches(view.turn, *start, *span)
            }
            Self::HpBelow { battler, percent } => view
                .roster
                .iter()
                .filter(|b| battler.matches(b.id))
                .any(|b| b.hp_percent() <= *percent && observed.hp_percent(b.id) > *percent),
            Self::BattleStart => view.checkpoint == Checkpoint::BattleStart,
            Self::BattlerDefeated(selector) => view
                .roster
                .iter()
                .filter(|b| selector.matches(b.id))
                .any(|b| !b.is_alive() && observed.was_alive(b.id)),
            Self::Predicate(predicate) => predicate.evaluate(view),
            Self::All(conditions) => conditions.iter().all(|c| c.holds(view, observed)),
        }
    }
}

impl fmt::Debug for TriggerCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnModulo { start, span } => f
                .debug_struct("TurnModulo")
                .field("start", start)
                .field("span", span)
                .finish(),
            Self::HpBelow { battler, percent } => f
                .debug_struct("HpBelow")
                .field("battler", battler)
                .field("percent", percent)
                .finish(),
            Self::BattleStart => f.write_str("BattleStart"),
            Self::BattlerDefeated(selector) => {
                f.debug_tuple("BattlerDefeated").field(selector).finish()
            }
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::All(conditions) => f.debug_tuple("All").field(conditions).finish(),
        }
    }
}

pub(crate) fn turn_matches(turn: u32, start: u32, span: u32) -> bool {
    if span == 0 {
        turn == start
    } else {
        turn >= start && (turn - start) % span == 0
    }
}

/// Battler state seen at the previous evaluation, for edge detection.
#[derive(Clone, Debug, Default)]
pub(crate) struct Observations {
    entries: Vec<(BattlerId, u32, bool)>,
}

impl Observations {
    pub(crate) fn capture<'a>(battlers: impl Iterator<Item = &'a Battler>) -> Self {
        Self {
            entries: battlers
                .map(|b| (b.id, b.hp_percent(), b.is_alive()))
                .collect(),
        }
    }

    fn hp_percent(&self, id: BattlerId) -> u32 {
        self.entries
            .iter()
            .find(|(entry, _, _)| *entry == id)
            .map_or(100, |(_, percent, _)| *percent)
    }

    fn was_alive(&self, id: BattlerId) -> bool {
        self.entries
            .iter()
            .find(|(entry, _, _)| *entry == id)
            .is_some_and(|(_, _, alive)| *alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_modulo_schedule() {
        assert!(turn_matches(1, 1, 0));
        assert!(!turn_matches(2, 1, 0));
        assert!(turn_matches(2, 2, 3));
        assert!(turn_matches(5, 2, 3));
        assert!(!turn_matches(4, 2, 3));
        assert!(!turn_matches(1, 2, 3));
    }

    #[test]
    fn selectors() {
        assert!(BattlerSelector::Any.matches(BattlerId::troop(3)));
        assert!(BattlerSelector::Side(Side::Party).matches(BattlerId::party(0)));
        assert!(!BattlerSelector::Side(Side::Party).matches(BattlerId::troop(0)));
        assert!(BattlerSelector::Battler(BattlerId::troop(1)).matches(BattlerId::troop(1)));
    }

    #[test]
    fn checkpoint_mask_defaults_to_all() {
        let mask = Checkpoints::default();
        assert!(mask.contains(Checkpoint::AfterAction.into()));
        assert!(!Checkpoints::TURN_END.contains(Checkpoint::BattleStart.into()));
    }
}
