//! Action ordering.
//!
//! Speed is `agi + usable.speed + r` where `r` is uniform in
//! `[-agi / divisor, +agi / divisor]`. Higher speed acts first; equal speeds
//! fall back to [`BattlerId`] order. Trigger-forced actions run before
//! everything else, in the order they were registered.

use std::cmp::Reverse;
use std::collections::VecDeque;

use tracing::debug;

use crate::action::Action;
use crate::battler::{BattlerId, Roster};
use crate::definition::ParamKind;
use crate::env::{DefinitionsOracle, Dice};

/// Speed of one action. Subjects no longer in the roster rank last.
pub(crate) fn action_speed(
    action: &Action,
    roster: &Roster,
    definitions: &dyn DefinitionsOracle,
    variance_divisor: u32,
    dice: &Dice<'_>,
) -> i64 {
    let Some(subject) = roster.get(action.subject) else {
        return i64::MIN;
    };
    let agi = subject.param(ParamKind::Agi);
    let bonus = definitions
        .usable(action.usable)
        .map_or(0, |usable| i64::from(usable.speed));
    let spread = agi.checked_div(variance_divisor).unwrap_or(0);
    let jitter = if spread == 0 {
        0
    } else {
        i64::from(dice.range(0, spread.saturating_mul(2))) - i64::from(spread)
    };
    i64::from(agi) + bonus + jitter
}

/// Builds the execution queue for one turn.
///
/// `actions` must already be in subject order so the draws are reproducible.
pub(crate) fn order_actions(
    actions: Vec<Action>,
    forced: Vec<Action>,
    roster: &Roster,
    definitions: &dyn DefinitionsOracle,
    variance_divisor: u32,
    dice: &Dice<'_>,
) -> VecDeque<Action> {
    let mut ranked: Vec<(i64, BattlerId, Action)> = actions
        .into_iter()
        .map(|action| {
            let speed = action_speed(&action, roster, definitions, variance_divisor, dice);
            (speed, action.subject, action)
        })
        .collect();
    ranked.sort_by_key(|(speed, subject, _)| (Reverse(*speed), *subject));

    for (speed, subject, action) in &ranked {
        debug!(%subject, usable = %action.usable, speed, "action ordered");
    }

    forced
        .into_iter()
        .chain(ranked.into_iter().map(|(_, _, action)| action))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionOrigin;
    use crate::battler::tests::{actor, enemy};
    use crate::definition::{SkillId, TargetScope, UsableDefinition, UsableRef};
    use crate::env::{DefinitionsSnapshot, PcgRng};

    const ATTACK: UsableRef = UsableRef::Skill(SkillId(1));
    const QUICK: UsableRef = UsableRef::Skill(SkillId(2));

    fn definitions() -> DefinitionsSnapshot {
        DefinitionsSnapshot::new()
            .with_usable(UsableDefinition::new(ATTACK, "Attack", TargetScope::OneEnemy))
            .with_usable(
                UsableDefinition::new(QUICK, "Quick Strike", TargetScope::OneEnemy)
                    .with_speed(100),
            )
    }

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.push(actor(0, 100, 10, 10, 10));
        roster.push(actor(1, 100, 10, 10, 30));
        roster.push(enemy(0, 100, 10, 10, 10));
        roster
    }

    fn subjects(queue: &VecDeque<Action>) -> Vec<BattlerId> {
        queue.iter().map(|action| action.subject).collect()
    }

    #[test]
    fn faster_first_and_ties_by_id_without_variance() {
        let dice = Dice::new(&PcgRng, 1, 0);
        let actions = vec![
            Action::new(BattlerId::party(0), ATTACK, vec![]),
            Action::new(BattlerId::party(1), ATTACK, vec![]),
            Action::new(BattlerId::troop(0), ATTACK, vec![]),
        ];
        let queue = order_actions(actions, Vec::new(), &roster(), &definitions(), 0, &dice);
        assert_eq!(
            subjects(&queue),
            vec![BattlerId::party(1), BattlerId::party(0), BattlerId::troop(0)]
        );
        assert_eq!(dice.cursor(), 0);
    }

    #[test]
    fn usable_speed_and_forced_actions() {
        let dice = Dice::new(&PcgRng, 1, 0);
        let actions = vec![
            Action::new(BattlerId::party(1), ATTACK, vec![]),
            Action::new(BattlerId::troop(0), QUICK, vec![]),
        ];
        let forced = vec![
            Action::new(BattlerId::party(0), ATTACK, vec![]).with_origin(ActionOrigin::Trigger),
        ];
        let queue = order_actions(actions, forced, &roster(), &definitions(), 4, &dice);
        assert_eq!(
            subjects(&queue),
            vec![BattlerId::party(0), BattlerId::troop(0), BattlerId::party(1)]
        );
    }

    #[test]
    fn speed_stays_within_variance_band() {
        let roster = roster();
        let definitions = definitions();
        let action = Action::new(BattlerId::party(1), ATTACK, vec![]);
        for seed in 0..64 {
            let dice = Dice::new(&PcgRng, seed, 0);
            let speed = action_speed(&action, &roster, &definitions, 4, &dice);
            assert!((23..=37).contains(&speed), "speed {speed}");
        }
    }
}
