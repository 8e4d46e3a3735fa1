//! Battle manager: the phase machine that owns a battle session.
//!
//! The host drives the battle by calling [`BattleManager::update`] in a loop.
//! Each call performs one bounded step (a phase transition or a single
//! action) and returns a [`Step`] telling the host whether it has to submit
//! commands, wait for an animation, or keep going. Everything the host needs
//! to present is buffered as [`BattleEvent`]s and drained with
//! [`BattleManager::drain_events`].
//!
//! # Module Structure
//!
//! - `phase`: phases, outcomes and step results
//! - `session`: mutable battle state
//! - `ai`: enemy and restricted-battler action selection
//! - `ordering`: speed-based execution order
//! - `hook`: host extension points
//! - `event`/`summary`: host-facing records
//!
//! # Determinism
//!
//! All randomness comes from the session seed through [`crate::env::Dice`],
//! so two managers with the same seed, definitions and commands produce the
//! same event stream.

mod ai;
mod errors;
mod event;
mod hook;
mod ordering;
mod phase;
mod session;
mod summary;

pub use errors::{CommandError, SetupError};
pub use event::BattleEvent;
pub use hook::{HookRegistry, HookVerdict, ResolutionContext, ResolutionHook, TriggerHook};
pub use phase::{BattleOutcome, BattlePhase, Step};
pub use session::BattleSession;
pub use summary::{BattleSummary, PartyMember, Rewards};

use tracing::{debug, info, warn};

use crate::action::{
    Action, ActionOrigin, ActionResolver, ActionResult, ResolutionWarning, targeting,
};
use crate::battler::{Battler, BattlerId, Roster, Side};
use crate::config::BattleConfig;
use crate::definition::{EffectSpec, TargetScope, TroopId, UsableRef};
use crate::env::{BattleEnv, DefinitionsOracle, Dice, RngOracle};
use crate::error::BattleError;
use crate::status::{self, TickReport};
use crate::trigger::{Checkpoint, FlowDirective, TriggerEngine, TriggerReaction};
use summary::Bounty;

/// Runs one battle from setup to its outcome.
///
/// Created in [`BattlePhase::Init`]; the first `update` validates the troop
/// and party against the definitions and builds the roster.
pub struct BattleManager {
    session: BattleSession,
    config: BattleConfig,
    hooks: HookRegistry,
    triggers: TriggerEngine,
    party: Vec<PartyMember>,
    bounties: Vec<Bounty>,
    events: Vec<BattleEvent>,
    summary: Option<BattleSummary>,
    awaiting_animation: bool,
    abort_requested: bool,
    commands_prepared: bool,
}

impl BattleManager {
    pub fn new(troop: TroopId, party: Vec<PartyMember>, config: BattleConfig, seed: u64) -> Self {
        let session = BattleSession::new(troop, seed);
        let triggers = TriggerEngine::new(Vec::new(), &session.roster);
        Self {
            session,
            config,
            hooks: HookRegistry::new(),
            triggers,
            party,
            bounties: Vec::new(),
            events: Vec::new(),
            summary: None,
            awaiting_animation: false,
            abort_requested: false,
            commands_prepared: false,
        }
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    pub fn phase(&self) -> BattlePhase {
        self.session.phase
    }

    pub fn turn(&self) -> u32 {
        self.session.turn
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.session.outcome
    }

    /// Summary of a finished battle.
    pub fn summary(&self) -> Option<&BattleSummary> {
        self.summary.as_ref()
    }

    /// Takes every event buffered since the last call.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Party members still waiting for a command this turn.
    pub fn pending_commands(&self) -> Vec<BattlerId> {
        if self.session.phase != BattlePhase::CommandInput {
            return Vec::new();
        }
        self.session
            .roster
            .side(Side::Party)
            .iter()
            .filter(|b| b.can_input() && !self.session.commands.contains_key(&b.id))
            .map(|b| b.id)
            .collect()
    }

    /// Asks the battle to end with `Abort` at the next safe boundary.
    pub fn request_abort(&mut self) {
        if !self.session.phase.is_terminal() {
            info!(turn = self.session.turn, "battle abort requested");
            self.abort_requested = true;
        }
    }

    /// Resumes a manager suspended in [`Step::AwaitingAnimation`].
    pub fn acknowledge_animation(&mut self) {
        self.awaiting_animation = false;
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Records the command of a party member for the current turn.
    ///
    /// A second submission for the same member replaces the first.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] and leaves the session untouched when the
    /// manager is not collecting commands or the command is invalid.
    pub fn submit_command(
        &mut self,
        env: BattleEnv<'_>,
        action: Action,
    ) -> Result<(), CommandError> {
        if self.session.phase != BattlePhase::CommandInput {
            return Err(CommandError::NotAcceptingCommands(self.session.phase));
        }
        let definitions = env.definitions()?;
        let subject = action.subject;

        let battler = self
            .session
            .roster
            .get(subject)
            .ok_or(CommandError::UnknownBattler(subject))?;
        if subject.side != Side::Party {
            return Err(CommandError::NotAPartyMember(subject));
        }
        if !battler.can_input() {
            return Err(CommandError::CannotAct(subject));
        }

        let usable = definitions
            .usable(action.usable)
            .ok_or(CommandError::UnknownUsable(action.usable))?;
        if let UsableRef::Skill(skill) = action.usable {
            let known = skill == battler.attack_skill
                || skill == battler.guard_skill
                || battler.skills.contains(&skill);
            if !known {
                return Err(CommandError::NotLearned {
                    subject,
                    usable: action.usable,
                });
            }
        }
        if battler.mp() < usable.mp_cost || battler.tp() < usable.tp_cost {
            return Err(CommandError::InsufficientCost(subject));
        }

        if usable.scope.is_single() {
            if let Some(&target) = action.targets.first() {
                let side = if usable.scope.targets_opponents() {
                    subject.side.opponent()
                } else {
                    subject.side
                };
                if target.side != side || self.session.roster.get(target).is_none() {
                    return Err(CommandError::InvalidTarget {
                        usable: action.usable,
                        target,
                    });
                }
            }
        }

        debug!(%subject, usable = %action.usable, targets = ?action.targets, "command accepted");
        self.session
            .commands
            .insert(subject, action.with_origin(ActionOrigin::Command));
        Ok(())
    }

    // ========================================================================
    // Phase machine
    // ========================================================================

    /// Advances the battle by one step.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when the troop or party cannot be built, or
    /// when a required oracle is missing. Everything else degrades into
    /// warnings on action results.
    pub fn update(&mut self, env: BattleEnv<'_>) -> Result<Step, SetupError> {
        if let BattlePhase::End(outcome) = self.session.phase {
            return Ok(Step::Finished(outcome));
        }
        if self.awaiting_animation {
            return Ok(Step::AwaitingAnimation);
        }

        let definitions = env.definitions()?;
        let rng = env.rng()?;

        let step = match self.session.phase {
            BattlePhase::Init => self.setup(definitions, rng)?,
            BattlePhase::Start => self.start(rng),
            BattlePhase::CommandInput => self.command_input(definitions, rng),
            BattlePhase::ActionOrdering => self.order(definitions, rng),
            BattlePhase::ActionExecution => self.execute_next(env, definitions, rng),
            BattlePhase::TurnCheck => self.turn_check(rng),
            BattlePhase::End(outcome) => Step::Finished(outcome),
        };
        Ok(step)
    }

    fn setup(
        &mut self,
        definitions: &dyn DefinitionsOracle,
        rng: &dyn RngOracle,
    ) -> Result<Step, SetupError> {
        let troop_id = self.session.troop;
        let troop = definitions
            .troop(troop_id)
            .ok_or(SetupError::UnknownTroop(troop_id))?;

        if troop.members.is_empty() {
            return Err(SetupError::EmptyTroop(troop_id));
        }
        if troop.members.len() > BattleConfig::MAX_TROOP_SIZE {
            return Err(SetupError::TooManyBattlers {
                side: Side::Troop,
                count: troop.members.len(),
                max: BattleConfig::MAX_TROOP_SIZE,
            });
        }
        if self.party.is_empty() {
            return Err(SetupError::EmptyParty);
        }
        if self.party.len() > BattleConfig::MAX_PARTY_SIZE {
            return Err(SetupError::TooManyBattlers {
                side: Side::Party,
                count: self.party.len(),
                max: BattleConfig::MAX_PARTY_SIZE,
            });
        }

        let mut roster = Roster::new();
        let mut bounties = Vec::with_capacity(troop.members.len());
        for (index, &enemy_id) in troop.members.iter().enumerate() {
            let enemy = definitions
                .enemy(enemy_id)
                .ok_or(SetupError::UnknownEnemy(enemy_id))?;
            for entry in &enemy.actions {
                check_usable(definitions, UsableRef::Skill(entry.skill))?;
            }
            roster.push(Battler::from_enemy(
                BattlerId::troop(index as u8),
                enemy,
                self.config.max_tp,
            ));
            bounties.push(Bounty {
                exp: enemy.exp,
                gold: enemy.gold,
                drops: enemy.drops.clone(),
            });
        }

        let dice = self.session.dice(rng);
        for (index, member) in self.party.iter().enumerate() {
            let actor = definitions
                .actor(member.actor)
                .ok_or(SetupError::UnknownActor(member.actor))?;
            let skills = [actor.attack_skill, actor.guard_skill]
                .into_iter()
                .chain(actor.skills.iter().copied());
            for skill in skills {
                check_usable(definitions, UsableRef::Skill(skill))?;
            }

            let mut battler =
                Battler::from_actor(BattlerId::party(index as u8), actor, self.config.max_tp);
            if let Some(hp) = member.hp {
                battler.set_hp(hp);
            }
            if let Some(mp) = member.mp {
                battler.set_mp(mp);
            }
            battler.set_tp(member.tp);
            for &state in &member.states {
                let definition = definitions
                    .state(state)
                    .ok_or(SetupError::UnknownState(state))?;
                status::add_state(&mut battler, definition, &dice);
            }
            roster.push(battler);
        }
        if roster.living(Side::Party).is_empty() {
            return Err(SetupError::NoLivingPartyMember);
        }

        for trigger in &troop.triggers {
            for reaction in &trigger.reactions {
                if let TriggerReaction::Enqueue(forced) = reaction {
                    check_usable(definitions, forced.usable)?;
                }
            }
        }

        self.session.commit(&dice);
        self.triggers = TriggerEngine::new(troop.triggers.clone(), &roster);
        self.session.roster = roster;
        self.bounties = bounties;

        info!(
            troop = %troop_id,
            name = %troop.name,
            party = self.party.len(),
            enemies = troop.members.len(),
            seed = self.session.seed(),
            "battle started"
        );
        Ok(self.enter(BattlePhase::Start))
    }

    fn start(&mut self, rng: &dyn RngOracle) -> Step {
        self.run_triggers(Checkpoint::BattleStart);
        if let Some(outcome) = self.session.pending_directive.and_then(directive_outcome) {
            self.session.pending_directive = None;
            return self.finish(outcome, rng);
        }
        self.enter(BattlePhase::CommandInput)
    }

    fn command_input(&mut self, definitions: &dyn DefinitionsOracle, rng: &dyn RngOracle) -> Step {
        if self.abort_requested {
            return self.finish(BattleOutcome::Abort, rng);
        }
        if !self.commands_prepared {
            self.prepare_commands(definitions, rng);
            self.commands_prepared = true;
        }

        let missing = self.pending_commands();
        if !missing.is_empty() {
            return Step::AwaitingCommands(missing);
        }
        self.enter(BattlePhase::ActionOrdering)
    }

    /// Generates actions for enemies and restricted battlers.
    fn prepare_commands(&mut self, definitions: &dyn DefinitionsOracle, rng: &dyn RngOracle) {
        let dice = self.session.dice(rng);
        let roster = &self.session.roster;
        let turn = self.session.turn;

        let generated: Vec<Action> = roster
            .iter()
            .filter(|battler| battler.can_move())
            .filter_map(|battler| {
                if battler.restriction().forces_action() {
                    ai::restricted_action(battler, roster, &dice)
                } else if battler.is_enemy() {
                    ai::enemy_action(battler, turn, definitions, roster, &dice)
                } else {
                    None
                }
            })
            .collect();

        self.session.commit(&dice);
        for action in generated {
            self.session.commands.insert(action.subject, action);
        }
    }

    fn order(&mut self, definitions: &dyn DefinitionsOracle, rng: &dyn RngOracle) -> Step {
        let dice = self.session.dice(rng);
        let commands: Vec<Action> = std::mem::take(&mut self.session.commands)
            .into_values()
            .collect();
        let forced = std::mem::take(&mut self.session.forced);

        self.session.queue = ordering::order_actions(
            commands,
            forced,
            &self.session.roster,
            definitions,
            self.config.speed_variance_divisor,
            &dice,
        );
        self.session.commit(&dice);
        self.enter(BattlePhase::ActionExecution)
    }

    fn execute_next(
        &mut self,
        env: BattleEnv<'_>,
        definitions: &dyn DefinitionsOracle,
        rng: &dyn RngOracle,
    ) -> Step {
        match self.session.pending_directive {
            Some(FlowDirective::EndTurn) => {
                debug!(turn = self.session.turn, "turn ended by directive");
                self.session.pending_directive = None;
                self.session.queue.clear();
                return self.enter(BattlePhase::TurnCheck);
            }
            Some(_) => {
                self.session.queue.clear();
                return self.enter(BattlePhase::TurnCheck);
            }
            None => {}
        }

        let roster = &self.session.roster;
        let wiped = roster.all_dead(Side::Party) || roster.all_dead(Side::Troop);
        if self.abort_requested || wiped {
            self.session.queue.clear();
            return self.enter(BattlePhase::TurnCheck);
        }

        let Some(action) = self.session.queue.pop_front() else {
            return self.enter(BattlePhase::TurnCheck);
        };

        let dice = self.session.dice(rng);
        let results = self.perform(env, definitions, &action, &dice);

        let subject = action.subject;
        let report = self
            .session
            .roster
            .get_mut(subject)
            .map(|battler| status::tick_action_end(battler, &dice));
        self.session.commit(&dice);
        if let Some(report) = report {
            self.record_expiry(subject, report);
        }

        self.events.push(BattleEvent::ActionExecuted { action, results });
        self.run_triggers(Checkpoint::AfterAction);

        if self.config.await_animation {
            self.awaiting_animation = true;
        }
        Step::ActionExecuted(subject)
    }

    /// Validates, pays for and resolves one action against all its targets.
    fn perform(
        &mut self,
        env: BattleEnv<'_>,
        definitions: &dyn DefinitionsOracle,
        action: &Action,
        dice: &Dice<'_>,
    ) -> Vec<ActionResult> {
        let subject_id = action.subject;
        let skip = |warning: ResolutionWarning| {
            warn!(
                subject = %subject_id,
                usable = %action.usable,
                code = warning.error_code(),
                "{warning}"
            );
            vec![ActionResult::skipped(
                subject_id,
                action.targets.first().copied(),
                action.usable,
                warning,
            )]
        };

        let Some(usable) = definitions.usable(action.usable) else {
            return skip(ResolutionWarning::UnknownUsable(action.usable));
        };
        let forced = action.is_forced();
        let Some(subject) = self.session.roster.get(subject_id) else {
            return skip(ResolutionWarning::SubjectUnavailable(subject_id));
        };
        if !subject.is_alive() || (!forced && !subject.can_move()) {
            return skip(ResolutionWarning::SubjectUnavailable(subject_id));
        }
        if !forced && (subject.mp() < usable.mp_cost || subject.tp() < usable.tp_cost) {
            return skip(ResolutionWarning::InsufficientCost(subject_id));
        }

        let targets = targeting::resolve_targets(action, usable.scope, &self.session.roster, dice);
        if usable.scope != TargetScope::None && targets.is_empty() {
            return skip(ResolutionWarning::NoTarget);
        }

        if !forced {
            if let Some(subject) = self.session.roster.get_mut(subject_id) {
                subject.change_mp(-i64::from(usable.mp_cost));
                subject.change_tp(-i64::from(usable.tp_cost));
            }
        }

        let resolver = ActionResolver::new(env, &self.config, &self.hooks);
        let roster = &mut self.session.roster;
        let results: Vec<ActionResult> = if targets.is_empty() {
            vec![resolver.resolve(action, usable, None, roster, dice)]
        } else {
            targets
                .iter()
                .map(|&target| resolver.resolve(action, usable, Some(target), roster, dice))
                .collect()
        };

        if usable.tp_gain > 0 && results.iter().any(|result| result.used) {
            if let Some(subject) = roster.get_mut(subject_id) {
                if subject.is_alive() {
                    subject.change_tp(i64::from(usable.tp_gain));
                }
            }
        }
        results
    }

    fn turn_check(&mut self, rng: &dyn RngOracle) -> Step {
        let dice = self.session.dice(rng);
        let mut expiries = Vec::new();
        for battler in self.session.roster.iter_mut() {
            battler.guarding = false;
            let report = status::tick_turn_end(battler, &dice);
            if !report.is_empty() {
                expiries.push((battler.id, report));
            }
        }
        self.session.commit(&dice);
        for (battler, report) in expiries {
            self.record_expiry(battler, report);
        }

        self.run_triggers(Checkpoint::TurnEnd);
        let turn = self.session.turn;
        self.events.push(BattleEvent::TurnEnded { turn });

        if let Some(outcome) = self.judge() {
            return self.finish(outcome, rng);
        }

        self.session.turn += 1;
        self.commands_prepared = false;
        debug!(turn = self.session.turn, "turn started");
        self.enter(BattlePhase::CommandInput)
    }

    /// Decides whether the battle ends after a turn. Annihilation outranks
    /// directives, which outrank abort requests and the turn limit.
    fn judge(&mut self) -> Option<BattleOutcome> {
        let directive = self.session.pending_directive.take();
        let roster = &self.session.roster;

        if roster.all_dead(Side::Troop) {
            return Some(BattleOutcome::Victory);
        }
        if roster.all_incapacitated(Side::Party) {
            return Some(BattleOutcome::Defeat);
        }
        if let Some(outcome) = directive.and_then(directive_outcome) {
            return Some(outcome);
        }
        if self.abort_requested {
            return Some(BattleOutcome::Abort);
        }
        if self.config.max_turns > 0 && self.session.turn >= self.config.max_turns {
            info!(turn = self.session.turn, "turn limit reached");
            return Some(BattleOutcome::Abort);
        }
        None
    }

    fn finish(&mut self, outcome: BattleOutcome, rng: &dyn RngOracle) -> Step {
        let dice = self.session.dice(rng);
        for battler in self.session.roster.iter_mut() {
            if battler.id.side == Side::Party {
                status::clear_battle_end_states(battler);
            }
        }
        let rewards = (outcome == BattleOutcome::Victory)
            .then(|| Rewards::collect(&self.bounties, &dice));
        self.session.commit(&dice);

        let summary = BattleSummary {
            outcome,
            turns: self.session.turn,
            rewards,
            party: self
                .session
                .roster
                .side(Side::Party)
                .iter()
                .filter_map(PartyMember::from_battler)
                .collect(),
        };

        self.session.outcome = Some(outcome);
        self.session.queue.clear();
        self.session.commands.clear();
        self.session.forced.clear();
        self.session.pending_directive = None;

        info!(%outcome, turns = summary.turns, "battle ended");
        self.enter(BattlePhase::End(outcome));
        self.summary = Some(summary.clone());
        self.events.push(BattleEvent::BattleEnded(summary));
        Step::Finished(outcome)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn enter(&mut self, phase: BattlePhase) -> Step {
        let from = self.session.phase;
        self.session.phase = phase;
        debug!(%from, to = %phase, turn = self.session.turn, "phase changed");
        self.events.push(BattleEvent::PhaseChanged { from, to: phase });
        Step::Advanced(phase)
    }

    fn run_triggers(&mut self, checkpoint: Checkpoint) {
        let outcome = self
            .triggers
            .evaluate(&self.session.view(checkpoint), &self.hooks);

        for trigger in outcome.fired {
            self.events.push(BattleEvent::TriggerFired {
                checkpoint,
                trigger,
            });
        }
        for conflict in outcome.conflicts {
            self.events.push(BattleEvent::TriggerConflict(conflict));
        }
        for forced in outcome.actions {
            self.session.forced.push(
                Action::new(forced.subject, forced.usable, forced.target.into_iter().collect())
                    .with_origin(ActionOrigin::Trigger),
            );
        }
        if let Some(directive) = outcome.directive {
            if let Some(dropped) = self.session.push_directive(directive) {
                warn!(
                    code = "TRIGGER_CONFLICT",
                    ?checkpoint,
                    ?dropped,
                    kept = ?self.session.pending_directive,
                    "directive dropped, another one is pending"
                );
            }
        }
    }

    fn record_expiry(&mut self, battler: BattlerId, report: TickReport) {
        for state in report.expired_states {
            self.events.push(BattleEvent::StateExpired { battler, state });
        }
        for param in report.expired_buffs {
            self.events.push(BattleEvent::BuffExpired { battler, param });
        }
    }
}

/// Outcome a directive forces, `None` for `EndTurn`.
fn directive_outcome(directive: FlowDirective) -> Option<BattleOutcome> {
    match directive {
        FlowDirective::Abort => Some(BattleOutcome::Abort),
        FlowDirective::EndTurn => None,
    }
}

/// A usable and every state its effects reference must be defined.
fn check_usable(definitions: &dyn DefinitionsOracle, usable: UsableRef) -> Result<(), SetupError> {
    let definition = definitions
        .usable(usable)
        .ok_or(SetupError::UnknownUsable(usable))?;
    for effect in &definition.effects {
        if let EffectSpec::AddState { state, .. } | EffectSpec::RemoveState { state, .. } = *effect {
            if definitions.state(state).is_none() {
                return Err(SetupError::UnknownState(state));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{
        ActorDefinition, ActorId, BaseParams, DamageKind, DamageSpec, EnemyAction,
        EnemyDefinition, EnemyId, HitType, ItemId, ParamKind, RemovalTiming, Restriction,
        SkillId, StateDefinition, StateId, TroopDefinition, UsableDefinition,
    };
    use crate::env::{DefinitionsSnapshot, Env, OracleError, PcgRng};
    use crate::formula::{Formula, StandardEvaluator};
    use crate::trigger::{ForcedAction, TriggerCondition, TriggerDefinition};

    const ATTACK: UsableRef = UsableRef::Skill(SkillId(1));
    const GUARD: UsableRef = UsableRef::Skill(SkillId(2));
    const SLEEP: StateId = StateId(1);
    const REGEN: StateId = StateId(2);
    const HERO: ActorId = ActorId(1);

    fn params(max_hp: u32, atk: u32, def: u32, agi: u32) -> BaseParams {
        BaseParams {
            max_hp,
            max_mp: 20,
            atk,
            def,
            mat: 10,
            mdf: 10,
            agi,
            luk: 10,
        }
    }

    /// Hero: 100 HP, atk 20. Slime (troop 1) dies to one hit, Golem
    /// (troop 2) one-shots the hero first, Statue (troop 3) only guards.
    fn definitions() -> DefinitionsSnapshot {
        let damage = Formula::subject(ParamKind::Atk)
            .scaled(4.0)
            .minus(Formula::target(ParamKind::Def).scaled(2.0));

        DefinitionsSnapshot::new()
            .with_usable(
                UsableDefinition::new(ATTACK, "Attack", TargetScope::OneEnemy)
                    .with_damage(DamageSpec::new(DamageKind::HpDamage, damage)),
            )
            .with_usable(
                UsableDefinition::new(GUARD, "Guard", TargetScope::User)
                    .with_effect(EffectSpec::Guard),
            )
            .with_state(
                StateDefinition::new(SLEEP, "Sleep")
                    .with_priority(80)
                    .with_restriction(Restriction::CannotMove),
            )
            .with_state(
                StateDefinition::new(REGEN, "Regen")
                    .expiring(RemovalTiming::TurnEnd, 2)
                    .removed_at_battle_end(),
            )
            .with_actor(ActorDefinition::new(HERO, "Hero", params(100, 20, 10, 20)))
            .with_enemy(
                EnemyDefinition::new(EnemyId(1), "Slime", params(50, 10, 10, 5))
                    .with_action(EnemyAction::new(SkillId(1), 5))
                    .with_rewards(10, 5)
                    .with_drop(ItemId(7), 1),
            )
            .with_enemy(
                EnemyDefinition::new(EnemyId(2), "Golem", params(500, 30, 10, 50))
                    .with_action(EnemyAction::new(SkillId(1), 5)),
            )
            .with_enemy(
                EnemyDefinition::new(EnemyId(3), "Statue", params(500, 10, 10, 1))
                    .with_action(EnemyAction::new(SkillId(2), 5)),
            )
            .with_troop(TroopDefinition::new(TroopId(1), "Slime", vec![EnemyId(1)]))
            .with_troop(TroopDefinition::new(TroopId(2), "Golem", vec![EnemyId(2)]))
            .with_troop(TroopDefinition::new(TroopId(3), "Statue", vec![EnemyId(3)]))
    }

    fn party() -> Vec<PartyMember> {
        vec![PartyMember::new(HERO)]
    }

    /// Runs the battle, answering every command request with `usable`.
    fn drive(manager: &mut BattleManager, env: BattleEnv<'_>, usable: UsableRef) -> BattleOutcome {
        for _ in 0..500 {
            match manager.update(env).expect("update") {
                Step::Finished(outcome) => return outcome,
                Step::AwaitingCommands(ids) => {
                    for id in ids {
                        manager
                            .submit_command(env, Action::targeting(id, usable, BattlerId::troop(0)))
                            .expect("command");
                    }
                }
                Step::AwaitingAnimation => manager.acknowledge_animation(),
                _ => {}
            }
        }
        panic!("battle did not finish");
    }

    fn turns_ended(events: &[BattleEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::TurnEnded { turn } => Some(*turn),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn victory_in_one_turn_grants_rewards() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let mut manager = BattleManager::new(TroopId(1), party(), BattleConfig::default(), 7);

        assert_eq!(drive(&mut manager, env, ATTACK), BattleOutcome::Victory);
        let summary = manager.summary().expect("summary");
        assert_eq!(summary.turns, 1);
        let rewards = summary.rewards.as_ref().expect("rewards");
        assert_eq!((rewards.exp, rewards.gold), (10, 5));
        assert_eq!(rewards.items, vec![ItemId(7)]);
        assert_eq!(summary.party[0].hp, Some(100));

        let events = manager.drain_events();
        let executed = events
            .iter()
            .filter(|event| matches!(event, BattleEvent::ActionExecuted { .. }))
            .count();
        assert_eq!(executed, 1, "the slime dies before it acts");
        assert!(matches!(events.last(), Some(BattleEvent::BattleEnded(_))));
        assert_eq!(manager.update(env), Ok(Step::Finished(BattleOutcome::Victory)));
        assert!(manager.drain_events().is_empty());
    }

    #[test]
    fn faster_enemy_defeats_party() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let mut manager = BattleManager::new(TroopId(2), party(), BattleConfig::default(), 7);

        assert_eq!(drive(&mut manager, env, ATTACK), BattleOutcome::Defeat);
        let summary = manager.summary().expect("summary");
        assert!(summary.rewards.is_none());
        assert_eq!(summary.party[0].hp, Some(0));
    }

    #[test]
    fn sleeping_party_counts_as_defeated() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let party = vec![PartyMember::new(HERO).with_state(SLEEP)];
        let mut manager = BattleManager::new(TroopId(3), party, BattleConfig::default(), 7);

        let mut steps = Vec::new();
        while !manager.phase().is_terminal() {
            steps.push(manager.update(env).expect("update"));
        }
        assert!(!steps.iter().any(|step| matches!(step, Step::AwaitingCommands(_))));
        assert_eq!(manager.outcome(), Some(BattleOutcome::Defeat));
        assert_eq!(manager.summary().map(|s| s.party[0].hp), Some(Some(100)));
    }

    #[test]
    fn turn_end_state_expires_and_turns_count_up() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let party = vec![PartyMember::new(HERO).with_state(REGEN)];
        let config = BattleConfig::default().with_max_turns(3);
        let mut manager = BattleManager::new(TroopId(3), party, config, 11);

        assert_eq!(drive(&mut manager, env, GUARD), BattleOutcome::Abort);
        let events = manager.drain_events();
        assert_eq!(turns_ended(&events), vec![1, 2, 3]);

        let expired = events
            .iter()
            .position(|event| {
                *event
                    == BattleEvent::StateExpired {
                        battler: BattlerId::party(0),
                        state: REGEN,
                    }
            })
            .expect("regen expires");
        let second_turn_end = events
            .iter()
            .position(|event| *event == BattleEvent::TurnEnded { turn: 2 })
            .expect("turn 2 ends");
        let first_turn_end = events
            .iter()
            .position(|event| *event == BattleEvent::TurnEnded { turn: 1 })
            .expect("turn 1 ends");
        assert!(first_turn_end < expired && expired < second_turn_end);
        assert_eq!(manager.summary().map(|s| s.turns), Some(3));
    }

    #[test]
    fn battle_end_clears_flagged_states() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let party = vec![PartyMember::new(HERO).with_state(REGEN)];
        let mut manager = BattleManager::new(TroopId(1), party, BattleConfig::default(), 5);

        assert_eq!(drive(&mut manager, env, ATTACK), BattleOutcome::Victory);
        assert_eq!(manager.summary().map(|s| s.party[0].states.clone()), Some(vec![]));
    }

    #[test]
    fn abort_request_ends_at_command_input() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let mut manager = BattleManager::new(TroopId(3), party(), BattleConfig::default(), 1);

        loop {
            if let Step::AwaitingCommands(_) = manager.update(env).expect("update") {
                break;
            }
        }
        manager.request_abort();
        assert_eq!(manager.update(env), Ok(Step::Finished(BattleOutcome::Abort)));
        assert!(manager.summary().is_some_and(|s| s.rewards.is_none()));
    }

    #[test]
    fn invalid_commands_are_rejected() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let mut manager = BattleManager::new(TroopId(1), party(), BattleConfig::default(), 1);

        let hero = BattlerId::party(0);
        let early = manager.submit_command(env, Action::targeting(hero, ATTACK, BattlerId::troop(0)));
        assert_eq!(early, Err(CommandError::NotAcceptingCommands(BattlePhase::Init)));

        while manager.pending_commands().is_empty() {
            manager.update(env).expect("update");
        }

        let unknown = UsableRef::Skill(SkillId(42));
        assert_eq!(
            manager.submit_command(env, Action::targeting(hero, unknown, BattlerId::troop(0))),
            Err(CommandError::UnknownUsable(unknown))
        );
        assert_eq!(
            manager.submit_command(env, Action::targeting(hero, ATTACK, hero)),
            Err(CommandError::InvalidTarget {
                usable: ATTACK,
                target: hero
            })
        );
        let slime = BattlerId::troop(0);
        assert_eq!(
            manager.submit_command(env, Action::targeting(slime, ATTACK, hero)),
            Err(CommandError::NotAPartyMember(slime))
        );
        assert_eq!(manager.pending_commands(), vec![hero]);

        manager
            .submit_command(env, Action::targeting(hero, ATTACK, slime))
            .expect("valid command");
        assert!(manager.pending_commands().is_empty());
    }

    #[test]
    fn same_seed_same_events() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();

        let run = |seed| {
            let mut manager =
                BattleManager::new(TroopId(3), party(), BattleConfig::default().with_max_turns(4), seed);
            drive(&mut manager, env, ATTACK);
            manager.drain_events()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn battle_start_directive_ends_immediately() {
        let defs = definitions().with_troop(
            TroopDefinition::new(TroopId(9), "Ambush", vec![EnemyId(3)]).with_trigger(
                TriggerDefinition::new("retreat", TriggerCondition::BattleStart)
                    .with_reaction(TriggerReaction::Directive(FlowDirective::Abort)),
            ),
        );
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let mut manager = BattleManager::new(TroopId(9), party(), BattleConfig::default(), 1);

        assert_eq!(manager.update(env), Ok(Step::Advanced(BattlePhase::Start)));
        assert_eq!(manager.update(env), Ok(Step::Finished(BattleOutcome::Abort)));
        let events = manager.drain_events();
        assert!(events.contains(&BattleEvent::TriggerFired {
            checkpoint: Checkpoint::BattleStart,
            trigger: "retreat".into(),
        }));
        let summary = manager.summary().expect("summary");
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.rewards, None);
        let enemy = manager.session().roster.get(BattlerId::troop(0)).expect("enemy");
        assert!(enemy.is_alive());
    }

    #[test]
    fn trigger_action_runs_first_and_skips_costs() {
        const QUAKE: UsableRef = UsableRef::Skill(SkillId(30));
        let quake = Formula::subject(ParamKind::Atk)
            .scaled(4.0)
            .minus(Formula::target(ParamKind::Def).scaled(2.0));
        let defs = definitions()
            .with_usable(
                UsableDefinition::new(QUAKE, "Quake", TargetScope::OneEnemy)
                    .with_hit_type(HitType::Certain)
                    .with_costs(999, 0)
                    .with_damage(DamageSpec::new(DamageKind::HpDamage, quake)),
            )
            .with_troop(
                TroopDefinition::new(TroopId(9), "Awakened Statue", vec![EnemyId(3)]).with_trigger(
                    TriggerDefinition::new("tremor", TriggerCondition::BattleStart).with_reaction(
                        TriggerReaction::Enqueue(ForcedAction {
                            subject: BattlerId::troop(0),
                            usable: QUAKE,
                            target: Some(BattlerId::party(0)),
                        }),
                    ),
                ),
            );
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let config = BattleConfig::default().with_max_turns(1);
        let mut manager = BattleManager::new(TroopId(9), party(), config, 21);

        assert_eq!(drive(&mut manager, env, ATTACK), BattleOutcome::Abort);
        let executed: Vec<(Action, Vec<ActionResult>)> = manager
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                BattleEvent::ActionExecuted { action, results } => Some((action, results)),
                _ => None,
            })
            .collect();

        // Forced first despite the statue's speed, then the regular order.
        let (first, results) = &executed[0];
        assert_eq!(first.subject, BattlerId::troop(0));
        assert_eq!(first.usable, QUAKE);
        assert_eq!(first.origin, ActionOrigin::Trigger);
        assert!(results[0].used);
        assert_eq!(results[0].hp_delta, -20);
        assert_eq!(executed[1].0.subject, BattlerId::party(0));
        assert_eq!(executed.len(), 3);

        let statue = manager.session().roster.get(BattlerId::troop(0)).expect("statue");
        assert_eq!(statue.mp(), 20);
    }

    #[test]
    fn animation_gate_suspends_after_each_action() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();
        let config = BattleConfig::default().with_await_animation(true);
        let mut manager = BattleManager::new(TroopId(1), party(), config, 3);

        let hero = BattlerId::party(0);
        loop {
            match manager.update(env).expect("update") {
                Step::AwaitingCommands(_) => manager
                    .submit_command(env, Action::targeting(hero, ATTACK, BattlerId::troop(0)))
                    .expect("command"),
                Step::ActionExecuted(subject) => {
                    assert_eq!(subject, hero);
                    break;
                }
                _ => {}
            }
        }
        assert_eq!(manager.update(env), Ok(Step::AwaitingAnimation));
        assert_eq!(manager.update(env), Ok(Step::AwaitingAnimation));
        manager.acknowledge_animation();
        assert_eq!(manager.update(env), Ok(Step::Advanced(BattlePhase::TurnCheck)));
    }

    #[test]
    fn setup_errors_are_fatal() {
        let defs = definitions();
        let env = Env::with_all(&defs, &StandardEvaluator, &PcgRng);
        let env = env.as_battle_env();

        let mut unknown = BattleManager::new(TroopId(77), party(), BattleConfig::default(), 1);
        let err = unknown.update(env).expect_err("unknown troop");
        assert_eq!(err, SetupError::UnknownTroop(TroopId(77)));
        assert!(err.severity().is_fatal());

        let knocked_out = vec![PartyMember::new(HERO).with_hp(0)];
        let mut manager = BattleManager::new(TroopId(1), knocked_out, BattleConfig::default(), 1);
        assert_eq!(manager.update(env), Err(SetupError::NoLivingPartyMember));

        let mut empty = BattleManager::new(TroopId(1), Vec::new(), BattleConfig::default(), 1);
        assert_eq!(empty.update(env), Err(SetupError::EmptyParty));

        let mut blind = BattleManager::new(TroopId(1), party(), BattleConfig::default(), 1);
        assert_eq!(
            blind.update(BattleEnv::empty()),
            Err(SetupError::Oracle(OracleError::DefinitionsNotAvailable))
        );
    }
}
