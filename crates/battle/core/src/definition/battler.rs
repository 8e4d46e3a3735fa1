//! Actor and enemy definitions.

use super::{ActorId, BaseParams, EnemyId, ExParams, ItemId, Modifier, SkillId, StateId};

/// Condition gating an entry of an enemy's rated action list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCondition {
    #[default]
    Always,
    /// Turn `start`, then every `span` turns (`span == 0`: only `start`).
    Turn { start: u32, span: u32 },
    /// HP at or below the given percent of max HP.
    HpBelow(u8),
    /// MP at or above the given amount.
    MpAbove(u32),
    /// The enemy currently has the state.
    StateActive(StateId),
}

/// One entry of an enemy's rated action list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAction {
    pub skill: SkillId,
    /// 1..=9, higher is preferred.
    pub rating: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: ActionCondition,
}

impl EnemyAction {
    pub fn new(skill: SkillId, rating: u8) -> Self {
        Self {
            skill,
            rating,
            condition: ActionCondition::Always,
        }
    }

    pub fn when(mut self, condition: ActionCondition) -> Self {
        self.condition = condition;
        self
    }
}

/// Item dropped with probability `1 / denominator` on victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropItem {
    pub item: ItemId,
    pub denominator: u32,
}

/// Complete definition of an enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyDefinition {
    pub id: EnemyId,
    pub name: String,
    pub params: BaseParams,
    pub ex: ExParams,
    pub modifiers: Vec<Modifier>,
    pub actions: Vec<EnemyAction>,
    pub exp: u32,
    pub gold: u32,
    pub drops: Vec<DropItem>,
}

impl EnemyDefinition {
    pub fn new(id: EnemyId, name: impl Into<String>, params: BaseParams) -> Self {
        Self {
            id,
            name: name.into(),
            params,
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: EnemyAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_ex(mut self, ex: ExParams) -> Self {
        self.ex = ex;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_rewards(mut self, exp: u32, gold: u32) -> Self {
        self.exp = exp;
        self.gold = gold;
        self
    }

    pub fn with_drop(mut self, item: ItemId, denominator: u32) -> Self {
        self.drops.push(DropItem { item, denominator });
        self
    }
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            id: EnemyId(0),
            name: String::new(),
            params: BaseParams::default(),
            ex: ExParams::default(),
            modifiers: Vec::new(),
            actions: Vec::new(),
            exp: 0,
            gold: 0,
            drops: Vec::new(),
        }
    }
}

/// Complete definition of a party actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorDefinition {
    pub id: ActorId,
    pub name: String,
    pub params: BaseParams,
    pub ex: ExParams,
    pub modifiers: Vec<Modifier>,
    /// Skills the actor may submit besides attack and guard.
    pub skills: Vec<SkillId>,
    pub attack_skill: SkillId,
    pub guard_skill: SkillId,
}

impl ActorDefinition {
    pub fn new(id: ActorId, name: impl Into<String>, params: BaseParams) -> Self {
        Self {
            id,
            name: name.into(),
            params,
            ..Self::default()
        }
    }

    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_ex(mut self, ex: ExParams) -> Self {
        self.ex = ex;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// True when the actor may submit the given skill.
    pub fn knows(&self, skill: SkillId) -> bool {
        skill == self.attack_skill || skill == self.guard_skill || self.skills.contains(&skill)
    }
}

impl Default for ActorDefinition {
    fn default() -> Self {
        Self {
            id: ActorId(0),
            name: String::new(),
            params: BaseParams::default(),
            ex: ExParams::default(),
            modifiers: Vec::new(),
            skills: Vec::new(),
            attack_skill: SkillId(1),
            guard_skill: SkillId(2),
        }
    }
}
