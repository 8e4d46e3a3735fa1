//! Turn/event trigger engine.
//!
//! Holds the troop's ordered trigger list and evaluates it at the battle
//! start, after every executed action and at turn end. Triggers are checked
//! in list order; a firing trigger does not stop later ones unless it issued
//! a directive that ends the battle.
//!
//! ## Directives
//!
//! Only one directive survives a checkpoint: the first one issued. Later
//! directives are reported as [`TriggerConflict`]s.

mod condition;
mod types;

pub use condition::{BattlerSelector, Checkpoint, Checkpoints, SessionPredicate, TriggerCondition};
pub use types::{
    FlowDirective, ForcedAction, RunPolicy, TriggerConflict, TriggerDefinition, TriggerOutcome,
    TriggerReaction,
};

use tracing::{debug, warn};

use crate::battler::Roster;
use crate::engine::HookRegistry;
pub(crate) use condition::turn_matches;
use condition::Observations;

/// Read-only session state handed to conditions, predicates and hooks.
#[derive(Clone, Copy, Debug)]
pub struct SessionView<'a> {
    pub turn: u32,
    pub roster: &'a Roster,
    pub checkpoint: Checkpoint,
}

#[derive(Clone, Copy, Debug, Default)]
struct RunState {
    fired: bool,
    last_turn: Option<u32>,
}

impl RunState {
    fn armed(&self, policy: RunPolicy, turn: u32) -> bool {
        match policy {
            RunPolicy::Once => !self.fired,
            RunPolicy::OncePerTurn => self.last_turn != Some(turn),
            RunPolicy::Repeat => true,
        }
    }
}

/// Evaluates troop triggers and remembers their run state.
#[derive(Clone, Debug)]
pub struct TriggerEngine {
    triggers: Vec<TriggerDefinition>,
    runs: Vec<RunState>,
    observed: Observations,
}

impl TriggerEngine {
    /// Builds the engine, taking the roster as the baseline for edge
    /// conditions.
    pub fn new(triggers: Vec<TriggerDefinition>, roster: &Roster) -> Self {
        let runs = vec![RunState::default(); triggers.len()];
        Self {
            triggers,
            runs,
            observed: Observations::capture(roster.iter()),
        }
    }

    pub fn triggers(&self) -> &[TriggerDefinition] {
        &self.triggers
    }

    /// Evaluates every trigger at `view.checkpoint`.
    pub fn evaluate(&mut self, view: &SessionView<'_>, hooks: &HookRegistry) -> TriggerOutcome {
        let mut outcome = TriggerOutcome::default();

        for (trigger, run) in self.triggers.iter().zip(self.runs.iter_mut()) {
            if !trigger.checkpoints.contains(view.checkpoint.into())
                || !run.armed(trigger.policy, view.turn)
                || !trigger.condition.holds(view, &self.observed)
            {
                continue;
            }
            if let Some(hook) = hooks.veto_trigger(trigger, view) {
                warn!(trigger = %trigger.name, hook, "trigger vetoed by hook");
                continue;
            }

            run.fired = true;
            run.last_turn = Some(view.turn);
            debug!(trigger = %trigger.name, checkpoint = ?view.checkpoint, turn = view.turn, "trigger fired");
            outcome.fired.push(trigger.name.clone());

            for reaction in &trigger.reactions {
                match *reaction {
                    TriggerReaction::Enqueue(action) => outcome.actions.push(action),
                    TriggerReaction::Directive(directive) => match outcome.directive {
                        None => outcome.directive = Some(directive),
                        Some(kept) => {
                            let conflict = TriggerConflict {
                                checkpoint: view.checkpoint,
                                trigger: trigger.name.clone(),
                                kept,
                                discarded: directive,
                            };
                            warn!(code = "TRIGGER_CONFLICT", "{conflict}");
                            outcome.conflicts.push(conflict);
                        }
                    },
                }
            }

            if outcome.directive.is_some_and(FlowDirective::preempts) {
                break;
            }
        }

        self.observed = Observations::capture(view.roster.iter());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::battler::tests::{actor, enemy};
    use crate::battler::{BattlerId, Side};
    use crate::definition::{SkillId, UsableRef};
    use crate::engine::{HookVerdict, TriggerHook};

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.push(actor(0, 100, 10, 10, 10));
        roster.push(enemy(0, 100, 10, 10, 10));
        roster
    }

    fn view(roster: &Roster, turn: u32, checkpoint: Checkpoint) -> SessionView<'_> {
        SessionView {
            turn,
            roster,
            checkpoint,
        }
    }

    fn call_help() -> ForcedAction {
        ForcedAction {
            subject: BattlerId::troop(0),
            usable: UsableRef::Skill(SkillId(20)),
            target: None,
        }
    }

    #[test]
    fn once_triggers_do_not_refire_at_start() {
        let roster = roster();
        let hooks = HookRegistry::new();
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new("intro", TriggerCondition::BattleStart)
                    .with_reaction(TriggerReaction::Enqueue(call_help())),
                TriggerDefinition::new("taunt", TriggerCondition::BattleStart),
            ],
            &roster,
        );

        let first = engine.evaluate(&view(&roster, 1, Checkpoint::BattleStart), &hooks);
        assert_eq!(first.fired, vec!["intro", "taunt"]);
        assert_eq!(first.actions, vec![call_help()]);

        let second = engine.evaluate(&view(&roster, 1, Checkpoint::BattleStart), &hooks);
        assert!(second.is_empty());
    }

    #[test]
    fn repeat_and_once_per_turn_policies() {
        let roster = roster();
        let hooks = HookRegistry::new();
        let always = || TriggerCondition::predicate(|_| true);
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new("repeat", always()).with_policy(RunPolicy::Repeat),
                TriggerDefinition::new("per-turn", always()).with_policy(RunPolicy::OncePerTurn),
            ],
            &roster,
        );

        let fired = |engine: &mut TriggerEngine, turn| {
            engine
                .evaluate(&view(&roster, turn, Checkpoint::AfterAction), &hooks)
                .fired
        };
        assert_eq!(fired(&mut engine, 1), vec!["repeat", "per-turn"]);
        assert_eq!(fired(&mut engine, 1), vec!["repeat"]);
        assert_eq!(fired(&mut engine, 2), vec!["repeat", "per-turn"]);
    }

    #[test]
    fn turn_modulo_holds_only_at_turn_end() {
        let roster = roster();
        let hooks = HookRegistry::new();
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new("every-other", TriggerCondition::TurnModulo { start: 2, span: 2 })
                    .with_policy(RunPolicy::Repeat),
            ],
            &roster,
        );

        assert!(engine.evaluate(&view(&roster, 2, Checkpoint::AfterAction), &hooks).is_empty());
        assert!(engine.evaluate(&view(&roster, 1, Checkpoint::TurnEnd), &hooks).is_empty());
        assert!(!engine.evaluate(&view(&roster, 2, Checkpoint::TurnEnd), &hooks).is_empty());
        assert!(!engine.evaluate(&view(&roster, 4, Checkpoint::TurnEnd), &hooks).is_empty());
    }

    #[test]
    fn all_requires_every_condition_and_mask_filters_checkpoints() {
        let roster = roster();
        let hooks = HookRegistry::new();
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new(
                    "late-turn-end",
                    TriggerCondition::All(vec![
                        TriggerCondition::TurnModulo { start: 1, span: 1 },
                        TriggerCondition::predicate(|view| view.turn >= 2),
                    ]),
                )
                .with_policy(RunPolicy::Repeat),
                TriggerDefinition::new("after-action-only", TriggerCondition::predicate(|_| true))
                    .with_policy(RunPolicy::Repeat)
                    .at(Checkpoints::AFTER_ACTION),
            ],
            &roster,
        );

        let fired = |engine: &mut TriggerEngine, turn, checkpoint| {
            engine.evaluate(&view(&roster, turn, checkpoint), &hooks).fired
        };
        assert!(fired(&mut engine, 1, Checkpoint::TurnEnd).is_empty());
        assert_eq!(fired(&mut engine, 2, Checkpoint::TurnEnd), vec!["late-turn-end"]);
        assert_eq!(fired(&mut engine, 2, Checkpoint::AfterAction), vec!["after-action-only"]);
        assert!(fired(&mut engine, 2, Checkpoint::BattleStart).is_empty());
    }

    #[test]
    fn hp_threshold_is_edge_triggered() {
        let mut roster = roster();
        let hooks = HookRegistry::new();
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new(
                    "enrage",
                    TriggerCondition::HpBelow {
                        battler: BattlerSelector::Side(Side::Troop),
                        percent: 50,
                    },
                )
                .with_policy(RunPolicy::Repeat),
            ],
            &roster,
        );

        if let Some(slime) = roster.get_mut(BattlerId::troop(0)) {
            slime.change_hp(-60);
        }
        assert_eq!(
            engine.evaluate(&view(&roster, 1, Checkpoint::AfterAction), &hooks).fired,
            vec!["enrage"]
        );
        // Still below, but no new crossing.
        assert!(engine.evaluate(&view(&roster, 1, Checkpoint::AfterAction), &hooks).is_empty());
    }

    #[test]
    fn defeat_condition_fires_once_per_death() {
        let mut roster = roster();
        let hooks = HookRegistry::new();
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new("mourn", TriggerCondition::BattlerDefeated(BattlerSelector::Any))
                    .with_policy(RunPolicy::Repeat),
            ],
            &roster,
        );
        if let Some(hero) = roster.get_mut(BattlerId::party(0)) {
            hero.change_hp(-100);
        }
        assert!(!engine.evaluate(&view(&roster, 1, Checkpoint::AfterAction), &hooks).is_empty());
        assert!(engine.evaluate(&view(&roster, 1, Checkpoint::AfterAction), &hooks).is_empty());
    }

    #[test]
    fn first_directive_wins_and_abort_preempts() {
        let roster = roster();
        let hooks = HookRegistry::new();
        let start = || TriggerCondition::BattleStart;
        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new("end-turn", start())
                    .with_reaction(TriggerReaction::Directive(FlowDirective::EndTurn)),
                TriggerDefinition::new("abort", start())
                    .with_reaction(TriggerReaction::Directive(FlowDirective::Abort)),
                TriggerDefinition::new("never-reached", start()),
            ],
            &roster,
        );

        let outcome = engine.evaluate(&view(&roster, 1, Checkpoint::BattleStart), &hooks);
        assert_eq!(outcome.directive, Some(FlowDirective::EndTurn));
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].discarded, FlowDirective::Abort);
        // EndTurn was kept, so nothing preempted the third trigger.
        assert_eq!(outcome.fired, vec!["end-turn", "abort", "never-reached"]);

        let mut engine = TriggerEngine::new(
            vec![
                TriggerDefinition::new("abort", start())
                    .with_reaction(TriggerReaction::Directive(FlowDirective::Abort)),
                TriggerDefinition::new("skipped", start()),
            ],
            &roster,
        );
        let outcome = engine.evaluate(&view(&roster, 1, Checkpoint::BattleStart), &hooks);
        assert_eq!(outcome.fired, vec!["abort"]);
        assert_eq!(outcome.directive, Some(FlowDirective::Abort));
    }

    struct Silence;

    impl TriggerHook for Silence {
        fn name(&self) -> &'static str {
            "silence"
        }

        fn before_fire(&self, trigger: &TriggerDefinition, _view: &SessionView<'_>) -> HookVerdict {
            if trigger.name == "intro" {
                HookVerdict::Cancel
            } else {
                HookVerdict::Continue
            }
        }
    }

    #[test]
    fn vetoed_once_trigger_stays_armed() {
        let roster = roster();
        let mut hooks = HookRegistry::new();
        hooks.register_trigger(Arc::new(Silence));
        let mut engine = TriggerEngine::new(
            vec![TriggerDefinition::new("intro", TriggerCondition::predicate(|_| true))],
            &roster,
        );

        assert!(engine.evaluate(&view(&roster, 1, Checkpoint::AfterAction), &hooks).is_empty());

        let hooks = HookRegistry::new();
        assert_eq!(
            engine.evaluate(&view(&roster, 1, Checkpoint::AfterAction), &hooks).fired,
            vec!["intro"]
        );
    }
}
