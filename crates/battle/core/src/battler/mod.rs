//! Battler model: the mutable combat entity for actors and enemies.
//!
//! A [`Battler`] is built from a definition at battle setup and owned by the
//! session [`Roster`]. Current HP/MP/TP are private and only change through
//! the clamping mutators below, so `0 <= hp <= max_hp` (and the MP/TP
//! equivalents) hold after every mutation. States and buffs are mutated by
//! the [`crate::status`] engine.

mod buffs;
mod roster;
mod states;
mod view;

use core::fmt;

use strum::IntoEnumIterator;

pub use buffs::{BuffStage, BuffStages};
pub use roster::Roster;
pub use states::{ActiveStates, StateInstance};
pub use view::StatView;

use crate::definition::{
    ActorDefinition, ActorId, BaseParams, ElementId, EnemyAction, EnemyDefinition, EnemyId,
    ExParamKind, ExParams, Modifier, ParamKind, Restriction, SkillId,
};

// ============================================================================
// Identity
// ============================================================================

/// Which side of the battle a battler fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Party,
    Troop,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Party => Self::Troop,
            Self::Troop => Self::Party,
        }
    }
}

/// Position of a battler in the session roster.
///
/// Ordering is party first, then by index. Action ordering uses it to break
/// speed ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlerId {
    pub side: Side,
    pub index: u8,
}

impl BattlerId {
    pub const fn party(index: u8) -> Self {
        Self {
            side: Side::Party,
            index,
        }
    }

    pub const fn troop(index: u8) -> Self {
        Self {
            side: Side::Troop,
            index,
        }
    }
}

impl fmt::Display for BattlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.side {
            Side::Party => 'P',
            Side::Troop => 'E',
        };
        write!(f, "{prefix}{}", self.index as u32 + 1)
    }
}

/// Definition a battler was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlerOrigin {
    Actor(ActorId),
    Enemy(EnemyId),
}

// ============================================================================
// Battler
// ============================================================================

/// A participant in combat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battler {
    pub id: BattlerId,
    pub origin: BattlerOrigin,
    pub name: String,
    pub params: BaseParams,
    pub ex: ExParams,
    /// Innate modifiers from the actor/enemy definition.
    pub modifiers: Vec<Modifier>,
    pub states: ActiveStates,
    pub buffs: BuffStages,
    /// Set by the guard effect, cleared at turn end.
    pub guarding: bool,
    /// Skills a party member may submit besides attack and guard.
    pub skills: Vec<SkillId>,
    /// Rated action list consulted by the enemy AI.
    pub actions: Vec<EnemyAction>,
    pub attack_skill: SkillId,
    pub guard_skill: SkillId,
    hp: u32,
    mp: u32,
    tp: u32,
    max_tp: u32,
}

impl Battler {
    /// Builds an enemy at full HP/MP.
    pub fn from_enemy(id: BattlerId, definition: &EnemyDefinition, max_tp: u32) -> Self {
        let mut battler = Self {
            id,
            origin: BattlerOrigin::Enemy(definition.id),
            name: definition.name.clone(),
            params: definition.params,
            ex: definition.ex,
            modifiers: definition.modifiers.clone(),
            states: ActiveStates::new(),
            buffs: BuffStages::new(),
            guarding: false,
            skills: definition.actions.iter().map(|a| a.skill).collect(),
            actions: definition.actions.clone(),
            attack_skill: ActorDefinition::default().attack_skill,
            guard_skill: ActorDefinition::default().guard_skill,
            hp: 0,
            mp: 0,
            tp: 0,
            max_tp,
        };
        battler.recover_all();
        battler
    }

    /// Builds a party member at full HP/MP. Carried-over values are applied by the caller.
    pub fn from_actor(id: BattlerId, definition: &ActorDefinition, max_tp: u32) -> Self {
        let mut battler = Self {
            id,
            origin: BattlerOrigin::Actor(definition.id),
            name: definition.name.clone(),
            params: definition.params,
            ex: definition.ex,
            modifiers: definition.modifiers.clone(),
            states: ActiveStates::new(),
            buffs: BuffStages::new(),
            guarding: false,
            skills: definition.skills.clone(),
            actions: Vec::new(),
            attack_skill: definition.attack_skill,
            guard_skill: definition.guard_skill,
            hp: 0,
            mp: 0,
            tp: 0,
            max_tp,
        };
        battler.recover_all();
        battler
    }

    pub fn side(&self) -> Side {
        self.id.side
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.origin, BattlerOrigin::Enemy(_))
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn tp(&self) -> u32 {
        self.tp
    }

    pub fn max_tp(&self) -> u32 {
        self.max_tp
    }

    // ------------------------------------------------------------------------
    // Derived parameters
    // ------------------------------------------------------------------------

    /// All modifiers currently affecting the battler: innate, then per state.
    pub fn active_modifiers(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.iter().chain(
            self.states
                .iter()
                .flat_map(|instance| instance.definition.modifiers.iter()),
        )
    }

    /// Effective parameter: base × buff multiplier × state rates, floored.
    pub fn param(&self, kind: ParamKind) -> u32 {
        let rate: f64 = self
            .active_modifiers()
            .filter_map(|m| match m {
                Modifier::ParamRate(k, rate) if *k == kind => Some(*rate),
                _ => None,
            })
            .product();
        let value = self.params.get(kind) as f64 * self.buffs.multiplier(kind) * rate;
        let value = if value.is_finite() { value.max(0.0).floor() } else { 0.0 };
        let value = value.min(u32::MAX as f64) as u32;
        match kind {
            ParamKind::MaxHp => value.max(1),
            _ => value,
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.param(ParamKind::MaxHp)
    }

    pub fn max_mp(&self) -> u32 {
        self.param(ParamKind::MaxMp)
    }

    /// Every effective parameter at once.
    pub fn effective_params(&self) -> BaseParams {
        let mut params = BaseParams::default();
        for kind in ParamKind::iter() {
            params.set(kind, self.param(kind));
        }
        params
    }

    /// Innate rate plus additive modifiers.
    pub fn ex_param(&self, kind: ExParamKind) -> f64 {
        let bonus: f64 = self
            .active_modifiers()
            .filter_map(|m| match m {
                Modifier::ExParam(k, value) if *k == kind => Some(*value),
                _ => None,
            })
            .sum();
        self.ex.get(kind) + bonus
    }

    /// Multiplier for damage of `element` taken by this battler.
    pub fn element_rate(&self, element: ElementId) -> f64 {
        self.active_modifiers()
            .filter_map(|m| match m {
                Modifier::ElementRate(e, rate) if *e == element => Some(*rate),
                _ => None,
            })
            .product()
    }

    /// Multiplier for physical (`true`) or magical damage taken.
    pub fn damage_rate(&self, physical: bool) -> f64 {
        self.active_modifiers()
            .filter_map(|m| match (m, physical) {
                (Modifier::PhysicalDamageRate(rate), true) => Some(*rate),
                (Modifier::MagicalDamageRate(rate), false) => Some(*rate),
                _ => None,
            })
            .product()
    }

    /// Restriction of the highest-priority restricting state.
    pub fn restriction(&self) -> Restriction {
        self.states
            .iter()
            .filter(|instance| instance.definition.restriction != Restriction::Normal)
            .max_by_key(|instance| instance.definition.priority)
            .map(|instance| instance.definition.restriction)
            .unwrap_or(Restriction::Normal)
    }

    /// Alive and not under `CannotMove`.
    pub fn can_move(&self) -> bool {
        self.is_alive() && self.restriction() != Restriction::CannotMove
    }

    /// Alive and free to receive commands.
    pub fn can_input(&self) -> bool {
        self.is_alive() && self.restriction() == Restriction::Normal
    }

    /// Dead or unable to move; counts toward defeat.
    pub fn is_incapacitated(&self) -> bool {
        !self.can_move()
    }

    /// HP as a percentage of max HP (0..=100).
    pub fn hp_percent(&self) -> u32 {
        ((self.hp as u64 * 100) / self.max_hp() as u64) as u32
    }

    // ------------------------------------------------------------------------
    // Resource mutation
    // ------------------------------------------------------------------------

    /// Adds `delta` to HP within `0..=max_hp`, returning the applied change.
    pub fn change_hp(&mut self, delta: i64) -> i64 {
        let before = self.hp;
        self.hp = clamp_add(self.hp, delta, self.max_hp());
        self.hp as i64 - before as i64
    }

    /// Adds `delta` to MP within `0..=max_mp`, returning the applied change.
    pub fn change_mp(&mut self, delta: i64) -> i64 {
        let before = self.mp;
        self.mp = clamp_add(self.mp, delta, self.max_mp());
        self.mp as i64 - before as i64
    }

    /// Adds `delta` to TP within `0..=max_tp`, returning the applied change.
    pub fn change_tp(&mut self, delta: i64) -> i64 {
        let before = self.tp;
        self.tp = clamp_add(self.tp, delta, self.max_tp);
        self.tp as i64 - before as i64
    }

    /// Sets HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }

    /// Sets MP, clamped to `0..=max_mp`.
    pub fn set_mp(&mut self, mp: u32) {
        self.mp = mp.min(self.max_mp());
    }

    /// Sets TP, clamped to `0..=max_tp`.
    pub fn set_tp(&mut self, tp: u32) {
        self.tp = tp.min(self.max_tp);
    }

    /// Full HP and MP.
    pub fn recover_all(&mut self) {
        self.hp = self.max_hp();
        self.mp = self.max_mp();
    }

    /// Re-clamps HP/MP after a max-value change (buff or state expiry).
    pub fn refresh(&mut self) {
        self.hp = self.hp.min(self.max_hp());
        self.mp = self.mp.min(self.max_mp());
    }

    /// Snapshot of effective parameters and current resources.
    pub fn stat_view(&self) -> StatView {
        StatView {
            params: self.effective_params(),
            hp: self.hp,
            mp: self.mp,
            tp: self.tp,
        }
    }
}

fn clamp_add(current: u32, delta: i64, max: u32) -> u32 {
    (current as i64)
        .saturating_add(delta)
        .clamp(0, max as i64) as u32
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use crate::definition::{StateDefinition, StateId};

    pub(crate) fn enemy(index: u8, hp: u32, atk: u32, def: u32, agi: u32) -> Battler {
        let params = BaseParams {
            max_hp: hp,
            max_mp: 50,
            atk,
            def,
            mat: 10,
            mdf: 10,
            agi,
            luk: 10,
        };
        let definition = EnemyDefinition::new(EnemyId(index as u32 + 1), "Slime", params);
        Battler::from_enemy(BattlerId::troop(index), &definition, BattleConfig::DEFAULT_MAX_TP)
    }

    pub(crate) fn actor(index: u8, hp: u32, atk: u32, def: u32, agi: u32) -> Battler {
        let params = BaseParams {
            max_hp: hp,
            max_mp: 50,
            atk,
            def,
            mat: 10,
            mdf: 10,
            agi,
            luk: 10,
        };
        let definition = ActorDefinition::new(ActorId(index as u32 + 1), "Hero", params);
        Battler::from_actor(BattlerId::party(index), &definition, BattleConfig::DEFAULT_MAX_TP)
    }

    #[test]
    fn ids_order_party_first() {
        let mut ids = vec![BattlerId::troop(0), BattlerId::party(1), BattlerId::party(0)];
        ids.sort();
        assert_eq!(
            ids,
            vec![BattlerId::party(0), BattlerId::party(1), BattlerId::troop(0)]
        );
        assert_eq!(BattlerId::troop(2).to_string(), "E3");
    }

    #[test]
    fn resources_stay_in_bounds() {
        let mut hero = actor(0, 100, 10, 10, 10);
        assert_eq!(hero.change_hp(-250), -100);
        assert_eq!(hero.hp(), 0);
        assert!(!hero.is_alive());
        assert_eq!(hero.change_hp(500), 100);
        assert_eq!(hero.change_mp(-80), -50);
        assert_eq!(hero.change_tp(180), 100);
        assert_eq!(hero.tp(), 100);
    }

    #[test]
    fn buff_and_state_rates_scale_params() {
        let mut hero = actor(0, 100, 40, 10, 10);
        hero.buffs.change(ParamKind::Atk, 1, 3);
        assert_eq!(hero.param(ParamKind::Atk), 50);

        let weaken = StateDefinition::new(StateId(7), "Weaken")
            .with_modifier(Modifier::ParamRate(ParamKind::Atk, 0.5));
        hero.states.insert(StateInstance::new(weaken, None));
        assert_eq!(hero.param(ParamKind::Atk), 25);
    }

    #[test]
    fn max_hp_never_drops_below_one() {
        let mut hero = actor(0, 3, 10, 10, 10);
        let curse = StateDefinition::new(StateId(9), "Curse")
            .with_modifier(Modifier::ParamRate(ParamKind::MaxHp, 0.0));
        hero.states.insert(StateInstance::new(curse, None));
        hero.refresh();
        assert_eq!(hero.max_hp(), 1);
        assert_eq!(hero.hp(), 1);
    }

    #[test]
    fn highest_priority_restriction_wins() {
        let mut hero = actor(0, 100, 10, 10, 10);
        let confuse = StateDefinition::new(StateId(1), "Confusion")
            .with_priority(40)
            .with_restriction(Restriction::AttackAny);
        let sleep = StateDefinition::new(StateId(2), "Sleep")
            .with_priority(80)
            .with_restriction(Restriction::CannotMove);
        hero.states.insert(StateInstance::new(confuse, None));
        assert_eq!(hero.restriction(), Restriction::AttackAny);
        assert!(hero.can_move());
        assert!(!hero.can_input());

        hero.states.insert(StateInstance::new(sleep, None));
        assert_eq!(hero.restriction(), Restriction::CannotMove);
        assert!(hero.is_incapacitated());
    }
}
