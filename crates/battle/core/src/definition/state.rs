//! State (status effect) definitions.

use super::{GroupId, Modifier, StateId};

/// What a state prevents its holder from doing.
///
/// Ordered from least to most restrictive; when several states are active the
/// one belonging to the highest-priority state wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Restriction {
    #[default]
    Normal,
    /// Attacks a random battler on either side.
    AttackAny,
    /// Attacks a random opponent.
    AttackEnemy,
    /// Skips its action to guard.
    Recover,
    /// Cannot act at all. Counts as incapacitated for defeat checks.
    CannotMove,
}

impl Restriction {
    /// True when the holder is excluded from command input.
    pub const fn blocks_input(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// True when the engine must auto-generate the holder's action.
    pub const fn forces_action(self) -> bool {
        matches!(self, Self::AttackAny | Self::AttackEnemy | Self::Recover)
    }
}

/// When a state's turn counter is decremented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalTiming {
    /// Does not expire by turns.
    #[default]
    Never,
    /// Decremented during the turn check.
    TurnEnd,
    /// Decremented right after the holder's own action.
    ActionEnd,
}

/// Complete definition of a state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateDefinition {
    pub id: StateId,
    pub name: String,
    /// 0..=100, higher wins exclusive-group contests and restriction lookup.
    pub priority: u8,
    pub restriction: Restriction,
    pub removal: RemovalTiming,
    /// Duration is rolled uniformly in `min_turns..=max_turns` on application.
    pub min_turns: u32,
    pub max_turns: u32,
    /// Percent chance the state is removed once its counter reaches zero.
    pub removal_chance: u8,
    /// Percent chance the state is removed whenever the holder takes HP damage.
    pub remove_on_damage: Option<u8>,
    /// Removed from surviving party members when the battle ends.
    pub remove_at_battle_end: bool,
    pub exclusive_group: Option<GroupId>,
    pub modifiers: Vec<Modifier>,
}

impl StateDefinition {
    pub fn new(id: StateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = restriction;
        self
    }

    /// Sets removal timing and a fixed duration.
    pub fn expiring(mut self, removal: RemovalTiming, turns: u32) -> Self {
        self.removal = removal;
        self.min_turns = turns;
        self.max_turns = turns;
        self
    }

    pub fn with_turn_range(mut self, min_turns: u32, max_turns: u32) -> Self {
        self.min_turns = min_turns;
        self.max_turns = max_turns.max(min_turns);
        self
    }

    pub fn with_removal_chance(mut self, removal_chance: u8) -> Self {
        self.removal_chance = removal_chance;
        self
    }

    pub fn in_group(mut self, group: GroupId) -> Self {
        self.exclusive_group = Some(group);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn removed_on_damage(mut self, chance: u8) -> Self {
        self.remove_on_damage = Some(chance);
        self
    }

    pub fn removed_at_battle_end(mut self) -> Self {
        self.remove_at_battle_end = true;
        self
    }

    /// True when the state carries a turn counter.
    pub fn expires_by_turn(&self) -> bool {
        !matches!(self.removal, RemovalTiming::Never)
    }
}

impl Default for StateDefinition {
    fn default() -> Self {
        Self {
            id: StateId(0),
            name: String::new(),
            priority: 50,
            restriction: Restriction::Normal,
            removal: RemovalTiming::Never,
            min_turns: 1,
            max_turns: 1,
            removal_chance: 100,
            remove_on_damage: None,
            remove_at_battle_end: false,
            exclusive_group: None,
            modifiers: Vec::new(),
        }
    }
}
