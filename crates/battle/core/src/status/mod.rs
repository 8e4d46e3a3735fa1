//! State/Buff engine.
//!
//! Applies and expires timed modifiers on a [`Battler`]. The action resolver
//! calls it for secondary effects; the battle manager calls it at action end,
//! turn end, on knock-out and when the battle ends.
//!
//! # Exclusive groups
//!
//! At most one state per exclusive group is active. Applying a state whose
//! group is occupied by a different state evicts the incumbent only when the
//! new state has strictly higher priority; otherwise the application is
//! refused. Re-applying an active state resets its counter without stacking.
//!
//! # Expiry
//!
//! A state's counter is decremented at its [`RemovalTiming`] check. Once it
//! reaches zero the state's removal chance is rolled; on failure the counter
//! stays at zero and the roll is retried at the next check.

use crate::battler::{Battler, StateInstance};
use crate::definition::{ParamKind, RemovalTiming, StateDefinition, StateId};
use crate::env::Dice;

// ============================================================================
// Reports
// ============================================================================

/// Outcome of [`add_state`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateApplication {
    /// The state is now active; lower-priority group members were removed.
    Added { evicted: Vec<StateId> },
    /// The state was already active and its counter was reset.
    Refreshed,
    Refused(StateRefusal),
}

impl StateApplication {
    /// True when the state is active afterwards.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Refused(_))
    }
}

/// Why a state could not be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateRefusal {
    TargetDead,
    /// The exclusive group is held by a state of equal or higher priority.
    GroupOccupied(StateId),
    CapacityReached,
}

/// What expired during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub expired_states: Vec<StateId>,
    pub expired_buffs: Vec<ParamKind>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.expired_states.is_empty() && self.expired_buffs.is_empty()
    }
}

// ============================================================================
// States
// ============================================================================

/// Applies `definition` to `battler` following the exclusive-group rule.
pub fn add_state(
    battler: &mut Battler,
    definition: &StateDefinition,
    dice: &Dice<'_>,
) -> StateApplication {
    if !battler.is_alive() {
        return StateApplication::Refused(StateRefusal::TargetDead);
    }

    if let Some(existing) = battler.states.get_mut(definition.id) {
        existing.remaining = roll_duration(definition, dice);
        return StateApplication::Refreshed;
    }

    let incumbent = definition
        .exclusive_group
        .and_then(|group| battler.states.group_member(group))
        .map(|instance| (instance.id(), instance.definition.priority));

    if let Some((incumbent_id, priority)) = incumbent {
        if priority >= definition.priority {
            return StateApplication::Refused(StateRefusal::GroupOccupied(incumbent_id));
        }
    }

    if incumbent.is_none() && battler.states.is_full() {
        return StateApplication::Refused(StateRefusal::CapacityReached);
    }

    let mut evicted = Vec::new();
    if let Some((incumbent_id, _)) = incumbent {
        battler.states.remove(incumbent_id);
        evicted.push(incumbent_id);
    }

    let instance = StateInstance::new(definition.clone(), roll_duration(definition, dice));
    battler.states.insert(instance);
    battler.refresh();

    StateApplication::Added { evicted }
}

/// Removes a state, returning whether it was active.
pub fn remove_state(battler: &mut Battler, id: StateId) -> bool {
    let removed = battler.states.remove(id).is_some();
    if removed {
        battler.refresh();
    }
    removed
}

/// Rolls every "removed by damage" state, removing the ones that hit.
pub fn remove_states_on_damage(battler: &mut Battler, dice: &Dice<'_>) -> Vec<StateId> {
    let candidates: Vec<(StateId, u8)> = battler
        .states
        .iter()
        .filter_map(|s| s.definition.remove_on_damage.map(|chance| (s.id(), chance)))
        .collect();

    let mut removed = Vec::new();
    for (id, chance) in candidates {
        if dice.percent(chance) && remove_state(battler, id) {
            removed.push(id);
        }
    }
    removed
}

/// Clears states, buffs and guard from a battler whose HP reached zero.
pub fn knock_out(battler: &mut Battler) -> Vec<StateId> {
    let removed = battler.states.clear();
    battler.buffs.clear();
    battler.guarding = false;
    removed
}

/// Battle teardown for one battler: removes states flagged for battle end,
/// resets buffs and guard.
pub fn clear_battle_end_states(battler: &mut Battler) -> Vec<StateId> {
    let ids: Vec<StateId> = battler
        .states
        .iter()
        .filter(|s| s.definition.remove_at_battle_end)
        .map(StateInstance::id)
        .collect();
    for id in &ids {
        battler.states.remove(*id);
    }
    battler.buffs.clear();
    battler.guarding = false;
    battler.refresh();
    ids
}

fn roll_duration(definition: &StateDefinition, dice: &Dice<'_>) -> Option<u32> {
    definition
        .expires_by_turn()
        .then(|| dice.range(definition.min_turns, definition.max_turns).max(1))
}

// ============================================================================
// Buffs
// ============================================================================

/// Moves a parameter's buff stage by `delta` for `turns` turns.
///
/// Returns the resulting stage, always within `-2..=2`.
pub fn change_buff(battler: &mut Battler, param: ParamKind, delta: i8, turns: u32) -> i8 {
    let stage = battler.buffs.change(param, delta, turns);
    battler.refresh();
    stage
}

/// Resets a parameter's buff, returning whether one was active.
pub fn remove_buff(battler: &mut Battler, param: ParamKind) -> bool {
    let removed = battler.buffs.reset(param);
    battler.refresh();
    removed
}

// ============================================================================
// Ticks
// ============================================================================

/// Turn boundary: `TurnEnd` state counters and every buff counter.
pub fn tick_turn_end(battler: &mut Battler, dice: &Dice<'_>) -> TickReport {
    if !battler.is_alive() {
        return TickReport::default();
    }
    let expired_states = tick_states(battler, RemovalTiming::TurnEnd, dice);
    let expired_buffs = battler.buffs.tick();
    battler.refresh();
    TickReport {
        expired_states,
        expired_buffs,
    }
}

/// Right after the battler's own action: `ActionEnd` state counters.
pub fn tick_action_end(battler: &mut Battler, dice: &Dice<'_>) -> TickReport {
    if !battler.is_alive() {
        return TickReport::default();
    }
    let expired_states = tick_states(battler, RemovalTiming::ActionEnd, dice);
    battler.refresh();
    TickReport {
        expired_states,
        expired_buffs: Vec::new(),
    }
}

fn tick_states(battler: &mut Battler, timing: RemovalTiming, dice: &Dice<'_>) -> Vec<StateId> {
    let mut due = Vec::new();
    for instance in battler.states.iter_mut() {
        if instance.definition.removal != timing {
            continue;
        }
        if let Some(remaining) = instance.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                due.push((instance.id(), instance.definition.removal_chance));
            }
        }
    }

    let mut expired = Vec::new();
    for (id, chance) in due {
        if dice.percent(chance) {
            battler.states.remove(id);
            expired.push(id);
        }
    }
    expired
}
