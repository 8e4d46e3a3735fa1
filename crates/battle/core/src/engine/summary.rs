//! Party carry-over and end-of-battle summary.

use crate::battler::{Battler, BattlerOrigin};
use crate::definition::{ActorId, DropItem, ItemId, StateId};
use crate::env::Dice;

use super::BattleOutcome;

/// A party member entering or leaving a battle.
///
/// On entry, `None` HP/MP mean "full". The summary always reports concrete
/// values so the host can feed them into the next battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub actor: ActorId,
    pub hp: Option<u32>,
    pub mp: Option<u32>,
    pub tp: u32,
    pub states: Vec<StateId>,
}

impl PartyMember {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            hp: None,
            mp: None,
            tp: 0,
            states: Vec::new(),
        }
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_mp(mut self, mp: u32) -> Self {
        self.mp = Some(mp);
        self
    }

    pub fn with_tp(mut self, tp: u32) -> Self {
        self.tp = tp;
        self
    }

    pub fn with_state(mut self, state: StateId) -> Self {
        self.states.push(state);
        self
    }

    pub(crate) fn from_battler(battler: &Battler) -> Option<Self> {
        let BattlerOrigin::Actor(actor) = battler.origin else {
            return None;
        };
        Some(Self {
            actor,
            hp: Some(battler.hp()),
            mp: Some(battler.mp()),
            tp: battler.tp(),
            states: battler.states.ids(),
        })
    }
}

/// Rewards granted on victory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub exp: u32,
    pub gold: u32,
    pub items: Vec<ItemId>,
}

/// Reward table of one troop member, captured at setup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Bounty {
    pub exp: u32,
    pub gold: u32,
    pub drops: Vec<DropItem>,
}

impl Rewards {
    /// Sums experience and gold and rolls each drop at `1 / denominator`.
    pub(crate) fn collect(bounties: &[Bounty], dice: &Dice<'_>) -> Self {
        let mut rewards = Self::default();
        for bounty in bounties {
            rewards.exp = rewards.exp.saturating_add(bounty.exp);
            rewards.gold = rewards.gold.saturating_add(bounty.gold);
            for drop in &bounty.drops {
                if drop.denominator > 0 && dice.range(1, drop.denominator) == 1 {
                    rewards.items.push(drop.item);
                }
            }
        }
        rewards
    }
}

/// Emitted once when the battle reaches `End`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    /// Turn the battle ended in.
    pub turns: u32,
    /// Present on victory only.
    pub rewards: Option<Rewards>,
    /// Party status after battle-end cleanup, in party order.
    pub party: Vec<PartyMember>,
}
