//! Party and troop collections owned by the battle session.

use arrayvec::ArrayVec;

use super::{Battler, BattlerId, Side};
use crate::config::BattleConfig;

/// Every battler in the session, addressed by [`BattlerId`].
///
/// A battler's index equals its position in its side's list.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    party: ArrayVec<Battler, { BattleConfig::MAX_PARTY_SIZE }>,
    troop: ArrayVec<Battler, { BattleConfig::MAX_TROOP_SIZE }>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a battler to its side. Returns `false` when the side is full
    /// or the battler's index does not match its position.
    pub fn push(&mut self, battler: Battler) -> bool {
        let index = battler.id.index as usize;
        match battler.id.side {
            Side::Party if index == self.party.len() => self.party.try_push(battler).is_ok(),
            Side::Troop if index == self.troop.len() => self.troop.try_push(battler).is_ok(),
            _ => false,
        }
    }

    pub fn get(&self, id: BattlerId) -> Option<&Battler> {
        self.side(id.side).get(id.index as usize)
    }

    pub fn get_mut(&mut self, id: BattlerId) -> Option<&mut Battler> {
        match id.side {
            Side::Party => self.party.get_mut(id.index as usize),
            Side::Troop => self.troop.get_mut(id.index as usize),
        }
    }

    pub fn side(&self, side: Side) -> &[Battler] {
        match side {
            Side::Party => &self.party,
            Side::Troop => &self.troop,
        }
    }

    /// Party battlers then troop battlers.
    pub fn iter(&self) -> impl Iterator<Item = &Battler> {
        self.party.iter().chain(self.troop.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Battler> {
        self.party.iter_mut().chain(self.troop.iter_mut())
    }

    pub fn ids(&self) -> Vec<BattlerId> {
        self.iter().map(|b| b.id).collect()
    }

    /// Ids of living battlers on `side`, in index order.
    pub fn living(&self, side: Side) -> Vec<BattlerId> {
        self.side(side)
            .iter()
            .filter(|b| b.is_alive())
            .map(|b| b.id)
            .collect()
    }

    /// Ids of dead battlers on `side`, in index order.
    pub fn dead(&self, side: Side) -> Vec<BattlerId> {
        self.side(side)
            .iter()
            .filter(|b| !b.is_alive())
            .map(|b| b.id)
            .collect()
    }

    pub fn all_dead(&self, side: Side) -> bool {
        self.side(side).iter().all(|b| !b.is_alive())
    }

    /// Every battler on `side` is dead or unable to move.
    pub fn all_incapacitated(&self, side: Side) -> bool {
        self.side(side).iter().all(Battler::is_incapacitated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battler::tests::{actor, enemy};

    #[test]
    fn lookup_and_liveness() {
        let mut roster = Roster::new();
        assert!(roster.push(actor(0, 100, 10, 10, 10)));
        assert!(roster.push(enemy(0, 30, 10, 10, 10)));
        assert!(roster.push(enemy(1, 30, 10, 10, 10)));
        assert!(!roster.push(enemy(5, 30, 10, 10, 10)));

        let id = BattlerId::troop(1);
        assert_eq!(roster.get(id).map(|b| b.id), Some(id));
        if let Some(slime) = roster.get_mut(id) {
            slime.change_hp(-100);
        }

        assert_eq!(roster.living(Side::Troop), vec![BattlerId::troop(0)]);
        assert_eq!(roster.dead(Side::Troop), vec![id]);
        assert!(!roster.all_dead(Side::Troop));
        assert_eq!(roster.ids().len(), 3);
    }
}
