//! Skill and item definitions ("usables").
//!
//! Skills and items share one shape: a target scope, a hit type, an optional
//! damage block and a list of secondary effects. The resolver does not care
//! which of the two it is handed; only the id spaces differ.

use core::fmt;

use super::{ElementId, ItemId, ParamKind, SkillId, StateId};
use crate::formula::Formula;

/// Reference to a skill or an item definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UsableRef {
    Skill(SkillId),
    Item(ItemId),
}

impl fmt::Display for UsableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill(id) => write!(f, "{id}"),
            Self::Item(id) => write!(f, "{id}"),
        }
    }
}

// ============================================================================
// Targeting
// ============================================================================

/// Which battlers a usable affects, relative to the subject's side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetScope {
    /// No target at all.
    #[default]
    None,
    OneEnemy,
    AllEnemies,
    /// `n` independent random picks among living opponents.
    RandomEnemies(u8),
    OneAlly,
    AllAllies,
    OneAllyDead,
    AllAlliesDead,
    /// The subject itself.
    User,
}

impl TargetScope {
    /// True when the scope picks from the subject's opponents.
    pub const fn targets_opponents(self) -> bool {
        matches!(
            self,
            Self::OneEnemy | Self::AllEnemies | Self::RandomEnemies(_)
        )
    }

    /// True when the scope picks from the subject's own side.
    pub const fn targets_allies(self) -> bool {
        matches!(
            self,
            Self::OneAlly | Self::AllAllies | Self::OneAllyDead | Self::AllAlliesDead | Self::User
        )
    }

    /// True when the scope is meant for knocked-out allies (revival).
    pub const fn targets_dead(self) -> bool {
        matches!(self, Self::OneAllyDead | Self::AllAlliesDead)
    }

    /// True when a single explicit target is chosen at command time.
    pub const fn is_single(self) -> bool {
        matches!(self, Self::OneEnemy | Self::OneAlly | Self::OneAllyDead)
    }
}

/// How hit determination treats the usable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitType {
    /// Only the success rate applies.
    #[default]
    Certain,
    /// Subject hit rate against target physical evasion.
    Physical,
    /// Target magical evasion only.
    Magical,
}

// ============================================================================
// Damage
// ============================================================================

/// What the damage formula does to the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    #[default]
    None,
    HpDamage,
    MpDamage,
    HpRecover,
    MpRecover,
    /// HP damage transferred to the subject.
    HpDrain,
    /// MP damage transferred to the subject.
    MpDrain,
}

impl DamageKind {
    /// True for kinds that subtract from the target (critical-eligible).
    pub const fn is_damage(self) -> bool {
        matches!(
            self,
            Self::HpDamage | Self::MpDamage | Self::HpDrain | Self::MpDrain
        )
    }

    pub const fn is_recover(self) -> bool {
        matches!(self, Self::HpRecover | Self::MpRecover)
    }

    pub const fn is_drain(self) -> bool {
        matches!(self, Self::HpDrain | Self::MpDrain)
    }
}

/// Damage block of a usable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageSpec {
    pub kind: DamageKind,
    /// Element used for the target's element rate. `None` is neutral.
    pub element: Option<ElementId>,
    pub formula: Formula,
    /// Random spread in percent of the computed value.
    pub variance: u8,
    /// Whether the damage may become critical.
    pub critical: bool,
    /// Base critical rate, multiplied by the subject's critical modifier.
    pub critical_rate: f64,
    /// Damage cannot take the target below 1 HP.
    pub non_lethal: bool,
}

impl DamageSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(kind: DamageKind, formula: Formula) -> Self {
        Self {
            kind,
            formula,
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_variance(mut self, variance: u8) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_critical(mut self, critical_rate: f64) -> Self {
        self.critical = true;
        self.critical_rate = critical_rate;
        self
    }

    pub fn non_lethal(mut self) -> Self {
        self.non_lethal = true;
        self
    }
}

impl Default for DamageSpec {
    fn default() -> Self {
        Self {
            kind: DamageKind::None,
            element: None,
            formula: Formula::Constant(0.0),
            variance: 0,
            critical: false,
            critical_rate: 1.0,
            non_lethal: false,
        }
    }
}

// ============================================================================
// Secondary Effects
// ============================================================================

/// Secondary effect applied after damage when the usable hits.
///
/// Chances are percentages rolled independently per effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    /// Recover `max_hp * rate + flat` HP. Revives when aimed at the dead.
    RecoverHp { rate: f64, flat: u32 },
    /// Recover `max_mp * rate + flat` MP.
    RecoverMp { rate: f64, flat: u32 },
    GainTp(u32),
    AddState { state: StateId, chance: u8 },
    RemoveState { state: StateId, chance: u8 },
    /// Move a buff stage by `delta` for `turns` turns.
    ChangeBuff {
        param: ParamKind,
        delta: i8,
        turns: u32,
    },
    /// Reset a buff stage to 0.
    RemoveBuff(ParamKind),
    /// Full HP/MP and every state removed.
    RecoverAll,
    /// Target guards until the end of the turn.
    Guard,
}

// ============================================================================
// Usable Definition
// ============================================================================

/// Complete definition of a skill or item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UsableDefinition {
    pub id: UsableRef,
    pub name: String,
    pub scope: TargetScope,
    pub hit_type: HitType,
    /// Base success rate in percent.
    pub success_rate: u8,
    /// Added to the subject's speed during action ordering.
    pub speed: i32,
    pub mp_cost: u32,
    pub tp_cost: u32,
    /// TP the subject gains after using it.
    pub tp_gain: u32,
    pub damage: DamageSpec,
    pub effects: Vec<EffectSpec>,
}

impl UsableDefinition {
    pub fn new(id: UsableRef, name: impl Into<String>, scope: TargetScope) -> Self {
        Self {
            id,
            name: name.into(),
            scope,
            ..Self::default()
        }
    }

    pub fn with_hit_type(mut self, hit_type: HitType) -> Self {
        self.hit_type = hit_type;
        self
    }

    pub fn with_success_rate(mut self, success_rate: u8) -> Self {
        self.success_rate = success_rate;
        self
    }

    pub fn with_damage(mut self, damage: DamageSpec) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_costs(mut self, mp_cost: u32, tp_cost: u32) -> Self {
        self.mp_cost = mp_cost;
        self.tp_cost = tp_cost;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_tp_gain(mut self, tp_gain: u32) -> Self {
        self.tp_gain = tp_gain;
        self
    }
}

impl Default for UsableDefinition {
    fn default() -> Self {
        Self {
            id: UsableRef::Skill(SkillId(0)),
            name: String::new(),
            scope: TargetScope::None,
            hit_type: HitType::Certain,
            success_rate: 100,
            speed: 0,
            mp_cost: 0,
            tp_cost: 0,
            tp_gain: 0,
            damage: DamageSpec::default(),
            effects: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_sides_are_disjoint() {
        for scope in [
            TargetScope::OneEnemy,
            TargetScope::AllEnemies,
            TargetScope::RandomEnemies(2),
            TargetScope::OneAlly,
            TargetScope::AllAllies,
            TargetScope::OneAllyDead,
            TargetScope::AllAlliesDead,
            TargetScope::User,
        ] {
            assert_ne!(scope.targets_opponents(), scope.targets_allies(), "{scope:?}");
        }
        assert!(!TargetScope::None.targets_opponents());
        assert!(!TargetScope::None.targets_allies());
    }

    #[test]
    fn only_subtracting_kinds_are_damage() {
        assert!(DamageKind::HpDrain.is_damage());
        assert!(!DamageKind::HpRecover.is_damage());
        assert!(DamageKind::MpRecover.is_recover());
        assert!(!DamageKind::None.is_damage());
    }
}
