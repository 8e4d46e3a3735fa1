//! Target resolution at execution time.
//!
//! Targets are re-resolved when the action runs, not when it is chosen: a
//! requested target that died (or changed sides' validity) in between is
//! replaced by the first valid battler of the scope's side, or dropped when
//! none remains.

use crate::battler::{BattlerId, Roster};
use crate::definition::TargetScope;
use crate::env::Dice;

use super::{Action, ActionOrigin};

/// Expands `scope` into concrete targets for `action`.
///
/// Returned ids are in resolution order. Random scopes pick with
/// replacement, so an id may appear more than once.
pub fn resolve_targets(
    action: &Action,
    scope: TargetScope,
    roster: &Roster,
    dice: &Dice<'_>,
) -> Vec<BattlerId> {
    let subject = action.subject;
    let own = subject.side;
    let opponents = own.opponent();
    let requested = action.targets.first().copied();

    // Restricted battlers may be aimed at anyone still standing.
    if action.origin == ActionOrigin::Auto {
        if let Some(target) = requested.filter(|id| is_living(roster, *id)) {
            return vec![target];
        }
    }

    match scope {
        TargetScope::None => Vec::new(),
        TargetScope::User => {
            if is_living(roster, subject) {
                vec![subject]
            } else {
                Vec::new()
            }
        }
        TargetScope::OneEnemy => {
            single(requested.filter(|id| id.side == opponents && is_living(roster, *id)), || {
                roster.living(opponents).first().copied()
            })
        }
        TargetScope::OneAlly => {
            single(requested.filter(|id| id.side == own && is_living(roster, *id)), || {
                roster.living(own).first().copied()
            })
        }
        TargetScope::OneAllyDead => {
            single(requested.filter(|id| id.side == own && is_dead(roster, *id)), || {
                roster.dead(own).first().copied()
            })
        }
        TargetScope::AllEnemies => roster.living(opponents),
        TargetScope::AllAllies => roster.living(own),
        TargetScope::AllAlliesDead => roster.dead(own),
        TargetScope::RandomEnemies(count) => {
            let pool = roster.living(opponents);
            if pool.is_empty() {
                return Vec::new();
            }
            (0..count).map(|_| pool[dice.index(pool.len())]).collect()
        }
    }
}

fn single(requested: Option<BattlerId>, fallback: impl FnOnce() -> Option<BattlerId>) -> Vec<BattlerId> {
    requested.or_else(fallback).into_iter().collect()
}

fn is_living(roster: &Roster, id: BattlerId) -> bool {
    roster.get(id).is_some_and(|b| b.is_alive())
}

fn is_dead(roster: &Roster, id: BattlerId) -> bool {
    roster.get(id).is_some_and(|b| !b.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battler::tests::{actor, enemy};
    use crate::definition::{SkillId, UsableRef};
    use crate::env::PcgRng;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.push(actor(0, 100, 10, 10, 10));
        roster.push(actor(1, 100, 10, 10, 10));
        roster.push(enemy(0, 50, 10, 10, 10));
        roster.push(enemy(1, 50, 10, 10, 10));
        roster
    }

    fn attack(target: BattlerId) -> Action {
        Action::targeting(BattlerId::party(0), UsableRef::Skill(SkillId(1)), target)
    }

    #[test]
    fn dead_target_is_replaced_by_first_living() {
        let mut roster = roster();
        if let Some(slime) = roster.get_mut(BattlerId::troop(0)) {
            slime.change_hp(-50);
        }
        let dice = Dice::new(&PcgRng, 1, 0);
        let targets = resolve_targets(
            &attack(BattlerId::troop(0)),
            TargetScope::OneEnemy,
            &roster,
            &dice,
        );
        assert_eq!(targets, vec![BattlerId::troop(1)]);
    }

    #[test]
    fn wiped_side_yields_no_target() {
        let mut roster = roster();
        for index in 0..2 {
            if let Some(slime) = roster.get_mut(BattlerId::troop(index)) {
                slime.change_hp(-50);
            }
        }
        let dice = Dice::new(&PcgRng, 1, 0);
        let targets = resolve_targets(
            &attack(BattlerId::troop(1)),
            TargetScope::OneEnemy,
            &roster,
            &dice,
        );
        assert!(targets.is_empty());
    }

    #[test]
    fn wrong_side_request_falls_back() {
        let roster = roster();
        let dice = Dice::new(&PcgRng, 1, 0);
        let targets = resolve_targets(
            &attack(BattlerId::party(1)),
            TargetScope::OneEnemy,
            &roster,
            &dice,
        );
        assert_eq!(targets, vec![BattlerId::troop(0)]);

        let confused = attack(BattlerId::party(1)).with_origin(ActionOrigin::Auto);
        let targets = resolve_targets(&confused, TargetScope::OneEnemy, &roster, &dice);
        assert_eq!(targets, vec![BattlerId::party(1)]);
    }

    #[test]
    fn dead_ally_scope_picks_the_fallen() {
        let mut roster = roster();
        if let Some(hero) = roster.get_mut(BattlerId::party(1)) {
            hero.change_hp(-100);
        }
        let dice = Dice::new(&PcgRng, 1, 0);
        let raise = Action::new(BattlerId::party(0), UsableRef::Skill(SkillId(9)), vec![]);
        assert_eq!(
            resolve_targets(&raise, TargetScope::OneAllyDead, &roster, &dice),
            vec![BattlerId::party(1)]
        );
        assert_eq!(
            resolve_targets(&raise, TargetScope::AllAllies, &roster, &dice),
            vec![BattlerId::party(0)]
        );
    }

    #[test]
    fn random_scope_picks_living_opponents() {
        let roster = roster();
        let dice = Dice::new(&PcgRng, 5, 0);
        let action = Action::new(BattlerId::party(0), UsableRef::Skill(SkillId(3)), vec![]);
        let targets = resolve_targets(&action, TargetScope::RandomEnemies(4), &roster, &dice);
        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|id| id.side == crate::battler::Side::Troop));
    }
}
