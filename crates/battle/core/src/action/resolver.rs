//! Action resolution pipeline.
//!
//! For one subject-target pair, in order:
//!
//! 1. pre-resolution hooks (may cancel)
//! 2. validity check
//! 3. hit determination (one draw)
//! 4. critical determination (damage kinds flagged `critical` only)
//! 5. formula evaluation and scaling
//! 6. clamped application
//! 7. secondary effects
//! 8. post-resolution hooks
//!
//! Only the target and, for drains, the subject are mutated.

use tracing::{debug, warn};

use super::{Action, ActionResult, BuffChange, ResolutionWarning};
use crate::battler::{Battler, BattlerId, Roster};
use crate::combat::{
    DamageScaling, HitJudgement, apply_variance, critical_probability, hit_check, scale_damage,
    truncate,
};
use crate::config::BattleConfig;
use crate::definition::{
    DamageKind, EffectSpec, ExParamKind, HitType, StateDefinition, StateId, UsableDefinition,
};
use crate::engine::{HookRegistry, ResolutionContext};
use crate::env::{BattleEnv, Dice};
use crate::formula::FormulaContext;
use crate::status::{self, StateApplication};

/// TP gained per full max-HP of damage taken (`50 × damage / max_hp`).
const TP_CHARGE_SCALE: i64 = 50;

/// Resolves actions against the session roster.
///
/// Borrowed per action by the battle manager; holds no state of its own.
pub struct ActionResolver<'a> {
    env: BattleEnv<'a>,
    config: &'a BattleConfig,
    hooks: &'a HookRegistry,
}

impl<'a> ActionResolver<'a> {
    pub fn new(env: BattleEnv<'a>, config: &'a BattleConfig, hooks: &'a HookRegistry) -> Self {
        Self { env, config, hooks }
    }

    /// Resolves `action` against one target (`None` for target-less usables).
    pub fn resolve(
        &self,
        action: &Action,
        usable: &UsableDefinition,
        target: Option<BattlerId>,
        roster: &mut Roster,
        dice: &Dice<'_>,
    ) -> ActionResult {
        let result = self.resolve_target(action, usable, target, roster, dice);

        if let Some(warning) = &result.warning {
            warn!(
                subject = %action.subject,
                usable = %action.usable,
                code = crate::error::BattleError::error_code(warning),
                "{warning}"
            );
        }
        debug!(
            subject = %action.subject,
            target = ?target,
            used = result.used,
            hit = result.hit,
            critical = result.critical,
            hp_delta = result.hp_delta,
            "action resolved"
        );

        self.hooks.notify_resolved(action, &result);
        result
    }

    fn resolve_target(
        &self,
        action: &Action,
        usable: &UsableDefinition,
        target: Option<BattlerId>,
        roster: &mut Roster,
        dice: &Dice<'_>,
    ) -> ActionResult {
        let mut result = ActionResult::new(action.subject, target, action.usable);

        let ctx = ResolutionContext {
            action,
            usable,
            target,
            roster,
        };
        if let Some(name) = self.hooks.veto_resolution(&ctx) {
            result.warning = Some(ResolutionWarning::CancelledByHook(name.to_string()));
            return result;
        }

        // ===== validity =====
        let Some(subject) = roster.get(action.subject).filter(|b| b.is_alive()) else {
            result.warning = Some(ResolutionWarning::SubjectUnavailable(action.subject));
            return result;
        };
        let Some(target_id) = target else {
            result.used = true;
            return result;
        };
        let wants_dead = usable.scope.targets_dead();
        let Some(target) = roster
            .get(target_id)
            .filter(|b| b.is_alive() != wants_dead)
        else {
            result.warning = Some(ResolutionWarning::TargetUnavailable(target_id));
            return result;
        };
        result.used = true;

        // ===== hit =====
        let check = hit_check(
            usable.hit_type,
            usable.success_rate,
            subject.ex_param(ExParamKind::Hit),
            target.ex_param(ExParamKind::Eva),
            target.ex_param(ExParamKind::Mev),
        );
        match check.judge(dice.chance()) {
            HitJudgement::Hit => result.hit = true,
            HitJudgement::Evaded => {
                result.evaded = true;
                return result;
            }
            HitJudgement::Missed => {
                result.evaded = true;
                result.missed = true;
                return result;
            }
        }

        // ===== critical =====
        let damage = &usable.damage;
        if damage.kind.is_damage() && damage.critical {
            let probability = critical_probability(
                damage.critical_rate,
                subject.ex_param(ExParamKind::Cri),
                target.ex_param(ExParamKind::Cev),
            );
            result.critical = dice.check(probability);
        }

        // ===== damage =====
        if damage.kind != DamageKind::None {
            if let Some(amount) = self.compute_damage(action, usable, subject, target, dice, &mut result)
            {
                self.apply_damage(action, usable, target_id, amount, roster, dice, &mut result);
            }
        }

        // ===== effects =====
        self.apply_effects(usable, target_id, roster, dice, &mut result);

        result
    }

    /// Evaluates, scales and varies the damage value. `None` when the
    /// formula could not be evaluated.
    fn compute_damage(
        &self,
        action: &Action,
        usable: &UsableDefinition,
        subject: &Battler,
        target: &Battler,
        dice: &Dice<'_>,
        result: &mut ActionResult,
    ) -> Option<i64> {
        let damage = &usable.damage;
        let formulas = match self.env.formulas() {
            Ok(formulas) => formulas,
            Err(err) => {
                result.warn(ResolutionWarning::OracleUnavailable(err));
                return None;
            }
        };

        let subject_view = action.snapshot.unwrap_or_else(|| subject.stat_view());
        let target_view = target.stat_view();
        let base = match formulas.evaluate(
            &damage.formula,
            &FormulaContext::new(&subject_view, &target_view),
        ) {
            Ok(value) => value,
            Err(err) => {
                result.warn(ResolutionWarning::FormulaFailed(err));
                return None;
            }
        };

        let scaling = if damage.kind.is_damage() {
            result.guarded = target.guarding;
            DamageScaling {
                critical: result.critical.then_some(self.config.critical_multiplier),
                element_rate: damage.element.map_or(1.0, |e| target.element_rate(e)),
                damage_rate: match usable.hit_type {
                    HitType::Physical => target.damage_rate(true),
                    HitType::Magical => target.damage_rate(false),
                    HitType::Certain => 1.0,
                },
                guard_divisor: target.guarding.then_some(self.config.guard_divisor),
            }
        } else {
            DamageScaling::default()
        };

        let value = apply_variance(scale_damage(base, &scaling), damage.variance, dice);
        Some(truncate(value).max(0))
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_damage(
        &self,
        action: &Action,
        usable: &UsableDefinition,
        target_id: BattlerId,
        amount: i64,
        roster: &mut Roster,
        dice: &Dice<'_>,
        result: &mut ActionResult,
    ) {
        let kind = usable.damage.kind;
        let Some(target) = roster.get_mut(target_id) else {
            return;
        };

        let mut drained = (0, 0);
        match kind {
            DamageKind::HpDamage | DamageKind::HpDrain => {
                let amount = if usable.damage.non_lethal {
                    amount.min(i64::from(target.hp().saturating_sub(1)))
                } else {
                    amount
                };
                let applied = target.change_hp(-amount);
                result.hp_delta += applied;
                if applied < 0 {
                    self.on_hp_damage(target, -applied, dice, result);
                }
                if kind == DamageKind::HpDrain {
                    drained.0 = -applied;
                }
            }
            DamageKind::MpDamage | DamageKind::MpDrain => {
                let applied = target.change_mp(-amount);
                result.mp_delta += applied;
                if kind == DamageKind::MpDrain {
                    drained.1 = -applied;
                }
            }
            DamageKind::HpRecover => result.hp_delta += target.change_hp(amount),
            DamageKind::MpRecover => result.mp_delta += target.change_mp(amount),
            DamageKind::None => {}
        }

        if drained != (0, 0) {
            if let Some(subject) = roster.get_mut(action.subject) {
                result.drained_hp = subject.change_hp(drained.0);
                result.drained_mp = subject.change_mp(drained.1);
            }
        }
    }

    /// TP charge, damage-removal rolls and knock-out after HP damage.
    fn on_hp_damage(
        &self,
        target: &mut Battler,
        dealt: i64,
        dice: &Dice<'_>,
        result: &mut ActionResult,
    ) {
        if self.config.tp_charge_on_damage {
            let charge = TP_CHARGE_SCALE * dealt / i64::from(target.max_hp());
            result.tp_delta += target.change_tp(charge);
        }
        if target.is_alive() {
            result
                .removed_states
                .extend(status::remove_states_on_damage(target, dice));
        } else {
            result.removed_states.extend(status::knock_out(target));
        }
    }

    fn apply_effects(
        &self,
        usable: &UsableDefinition,
        target_id: BattlerId,
        roster: &mut Roster,
        dice: &Dice<'_>,
        result: &mut ActionResult,
    ) {
        let revival = usable.scope.targets_dead();

        for effect in &usable.effects {
            let Some(target) = roster.get_mut(target_id) else {
                return;
            };
            let reviving = revival
                && matches!(effect, EffectSpec::RecoverHp { .. } | EffectSpec::RecoverAll);
            if !target.is_alive() && !reviving {
                continue;
            }

            match *effect {
                EffectSpec::RecoverHp { rate, flat } => {
                    let amount = truncate(f64::from(target.max_hp()) * rate + f64::from(flat));
                    result.hp_delta += target.change_hp(amount.max(0));
                }
                EffectSpec::RecoverMp { rate, flat } => {
                    let amount = truncate(f64::from(target.max_mp()) * rate + f64::from(flat));
                    result.mp_delta += target.change_mp(amount.max(0));
                }
                EffectSpec::GainTp(amount) => {
                    result.tp_delta += target.change_tp(i64::from(amount));
                }
                EffectSpec::AddState { state, chance } => {
                    let Some(definition) = self.state_definition(state, result) else {
                        continue;
                    };
                    if !dice.percent(chance) {
                        continue;
                    }
                    match status::add_state(target, definition, dice) {
                        StateApplication::Added { evicted } => {
                            result.added_states.push(state);
                            result.removed_states.extend(evicted);
                        }
                        StateApplication::Refreshed => {}
                        StateApplication::Refused(reason) => {
                            debug!(target = %target_id, %state, ?reason, "state refused");
                        }
                    }
                }
                EffectSpec::RemoveState { state, chance } => {
                    if target.states.contains(state)
                        && dice.percent(chance)
                        && status::remove_state(target, state)
                    {
                        result.removed_states.push(state);
                    }
                }
                EffectSpec::ChangeBuff {
                    param,
                    delta,
                    turns,
                } => {
                    let before = target.buffs.stage(param);
                    let stage = status::change_buff(target, param, delta, turns);
                    result.buff_changes.push(BuffChange {
                        param,
                        delta: stage - before,
                        stage,
                    });
                }
                EffectSpec::RemoveBuff(param) => {
                    let before = target.buffs.stage(param);
                    if status::remove_buff(target, param) {
                        result.buff_changes.push(BuffChange {
                            param,
                            delta: -before,
                            stage: 0,
                        });
                    }
                }
                EffectSpec::RecoverAll => {
                    result.removed_states.extend(target.states.clear());
                    target.buffs.clear();
                    target.refresh();
                    result.hp_delta += target.change_hp(i64::from(target.max_hp()));
                    result.mp_delta += target.change_mp(i64::from(target.max_mp()));
                }
                EffectSpec::Guard => target.guarding = true,
            }
        }
    }

    fn state_definition(
        &self,
        state: StateId,
        result: &mut ActionResult,
    ) -> Option<&'a StateDefinition> {
        let definitions = match self.env.definitions() {
            Ok(definitions) => definitions,
            Err(err) => {
                result.warn(ResolutionWarning::OracleUnavailable(err));
                return None;
            }
        };
        let definition = definitions.state(state);
        if definition.is_none() {
            result.warn(ResolutionWarning::UnknownState(state));
        }
        definition
    }
}
