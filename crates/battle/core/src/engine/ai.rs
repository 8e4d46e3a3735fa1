//! Action selection for battlers that do not take commands.
//!
//! Enemies pick from their rated action list. Battlers under an
//! `AttackAny`/`AttackEnemy`/`Recover` restriction get an automatic action
//! regardless of side.

use tracing::debug;

use crate::action::{Action, ActionOrigin};
use crate::battler::{Battler, BattlerId, Roster};
use crate::definition::{ActionCondition, Restriction, TargetScope, UsableRef};
use crate::env::{DefinitionsOracle, Dice};
use crate::trigger::turn_matches;

/// Chooses an enemy's action for `turn`.
///
/// Entries whose condition fails, whose skill is undefined or unaffordable,
/// or whose scope has nobody to aim at are skipped. The highest rating wins;
/// among equal ratings the earliest entry wins. `None` when nothing is
/// usable, in which case the enemy idles.
pub(crate) fn enemy_action(
    battler: &Battler,
    turn: u32,
    definitions: &dyn DefinitionsOracle,
    roster: &Roster,
    dice: &Dice<'_>,
) -> Option<Action> {
    let mut best: Option<(u8, UsableRef, TargetScope)> = None;

    for entry in &battler.actions {
        if !condition_holds(battler, turn, entry.condition) {
            continue;
        }
        let usable = UsableRef::Skill(entry.skill);
        let Some(definition) = definitions.usable(usable) else {
            continue;
        };
        if battler.mp() < definition.mp_cost || battler.tp() < definition.tp_cost {
            continue;
        }
        if !has_candidates(battler.id, definition.scope, roster) {
            continue;
        }
        if best.is_none_or(|(rating, _, _)| entry.rating > rating) {
            best = Some((entry.rating, usable, definition.scope));
        }
    }

    let (rating, usable, scope) = best?;
    let targets = pick_target(battler.id, scope, roster, dice)
        .into_iter()
        .collect();
    debug!(subject = %battler.id, %usable, rating, "enemy action chosen");
    Some(Action::new(battler.id, usable, targets).with_origin(ActionOrigin::Ai))
}

/// Builds the forced action of a restricted battler.
///
/// `None` for unrestricted battlers, `CannotMove` and when no target exists.
pub(crate) fn restricted_action(
    battler: &Battler,
    roster: &Roster,
    dice: &Dice<'_>,
) -> Option<Action> {
    let (usable, target) = match battler.restriction() {
        Restriction::AttackEnemy => {
            let pool = roster.living(battler.id.side.opponent());
            if pool.is_empty() {
                return None;
            }
            (battler.attack_skill, Some(pool[dice.index(pool.len())]))
        }
        Restriction::AttackAny => {
            let pool: Vec<BattlerId> = roster
                .iter()
                .filter(|other| other.is_alive() && other.id != battler.id)
                .map(|other| other.id)
                .collect();
            if pool.is_empty() {
                return None;
            }
            (battler.attack_skill, Some(pool[dice.index(pool.len())]))
        }
        Restriction::Recover => (battler.guard_skill, None),
        Restriction::Normal | Restriction::CannotMove => return None,
    };

    debug!(subject = %battler.id, restriction = ?battler.restriction(), "restricted action generated");
    Some(
        Action::new(battler.id, UsableRef::Skill(usable), target.into_iter().collect())
            .with_origin(ActionOrigin::Auto),
    )
}

fn condition_holds(battler: &Battler, turn: u32, condition: ActionCondition) -> bool {
    match condition {
        ActionCondition::Always => true,
        ActionCondition::Turn { start, span } => turn_matches(turn, start, span),
        ActionCondition::HpBelow(percent) => battler.hp_percent() <= u32::from(percent),
        ActionCondition::MpAbove(mp) => battler.mp() >= mp,
        ActionCondition::StateActive(state) => battler.states.contains(state),
    }
}

fn has_candidates(subject: BattlerId, scope: TargetScope, roster: &Roster) -> bool {
    let own = subject.side;
    if scope.targets_opponents() {
        !roster.living(own.opponent()).is_empty()
    } else if scope.targets_dead() {
        !roster.dead(own).is_empty()
    } else {
        true
    }
}

fn pick_target(
    subject: BattlerId,
    scope: TargetScope,
    roster: &Roster,
    dice: &Dice<'_>,
) -> Option<BattlerId> {
    let pool = match scope {
        TargetScope::OneEnemy => roster.living(subject.side.opponent()),
        TargetScope::OneAlly => roster.living(subject.side),
        TargetScope::OneAllyDead => return roster.dead(subject.side).first().copied(),
        _ => return None,
    };
    if pool.is_empty() {
        None
    } else {
        Some(pool[dice.index(pool.len())])
    }
}
