//! Extension points for resolution and trigger firing.
//!
//! Hosts register callbacks instead of replacing engine methods. Hooks run in
//! priority order (lower values first, registration order among equals) and
//! only see read-only views, so they cannot break battler invariants.

use std::fmt;
use std::sync::Arc;

use crate::action::{Action, ActionResult};
use crate::battler::{BattlerId, Roster};
use crate::definition::UsableDefinition;
use crate::trigger::{SessionView, TriggerDefinition};

/// Decision returned by a pre-hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HookVerdict {
    #[default]
    Continue,
    Cancel,
}

/// What a resolution pre-hook gets to inspect.
#[derive(Clone, Copy, Debug)]
pub struct ResolutionContext<'a> {
    pub action: &'a Action,
    pub usable: &'a UsableDefinition,
    pub target: Option<BattlerId>,
    pub roster: &'a Roster,
}

/// Hook around one subject-target resolution.
pub trait ResolutionHook: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    /// Runs before hit determination. `Cancel` turns the result into a
    /// `used = false` record.
    fn before_resolve(&self, _ctx: &ResolutionContext<'_>) -> HookVerdict {
        HookVerdict::Continue
    }

    /// Observes every finished result, including skipped ones.
    fn after_resolve(&self, _action: &Action, _result: &ActionResult) {}
}

/// Hook consulted before a trigger fires.
pub trait TriggerHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    /// `Cancel` vetoes this firing. A vetoed `Once` trigger stays armed.
    fn before_fire(&self, trigger: &TriggerDefinition, view: &SessionView<'_>) -> HookVerdict;
}

/// Registered hooks, kept sorted by priority.
#[derive(Clone, Default)]
pub struct HookRegistry {
    resolution: Vec<Arc<dyn ResolutionHook>>,
    trigger: Vec<Arc<dyn TriggerHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_resolution(&mut self, hook: Arc<dyn ResolutionHook>) {
        self.resolution.push(hook);
        // Stable sort keeps registration order among equal priorities.
        self.resolution.sort_by_key(|h| h.priority());
    }

    pub fn register_trigger(&mut self, hook: Arc<dyn TriggerHook>) {
        self.trigger.push(hook);
        self.trigger.sort_by_key(|h| h.priority());
    }

    pub fn resolution_hooks(&self) -> impl Iterator<Item = &Arc<dyn ResolutionHook>> {
        self.resolution.iter()
    }

    pub fn trigger_hooks(&self) -> impl Iterator<Item = &Arc<dyn TriggerHook>> {
        self.trigger.iter()
    }

    /// First resolution hook that cancels, if any.
    pub fn veto_resolution(&self, ctx: &ResolutionContext<'_>) -> Option<&'static str> {
        self.resolution
            .iter()
            .find(|hook| hook.before_resolve(ctx) == HookVerdict::Cancel)
            .map(|hook| hook.name())
    }

    pub fn notify_resolved(&self, action: &Action, result: &ActionResult) {
        for hook in &self.resolution {
            hook.after_resolve(action, result);
        }
    }

    /// First trigger hook that vetoes, if any.
    pub fn veto_trigger(
        &self,
        trigger: &TriggerDefinition,
        view: &SessionView<'_>,
    ) -> Option<&'static str> {
        self.trigger
            .iter()
            .find(|hook| hook.before_fire(trigger, view) == HookVerdict::Cancel)
            .map(|hook| hook.name())
    }

    pub fn len(&self) -> usize {
        self.resolution.len() + self.trigger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hook names and priorities in execution order (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.resolution
            .iter()
            .map(|h| (h.name(), h.priority()))
            .chain(self.trigger.iter().map(|h| (h.name(), h.priority())))
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("resolution", &self.resolution.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("trigger", &self.trigger.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, i32);

    impl ResolutionHook for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn priority(&self) -> i32 {
            self.1
        }
    }

    #[test]
    fn hooks_run_in_priority_then_registration_order() {
        let mut registry = HookRegistry::new();
        registry.register_resolution(Arc::new(Named("late", 10)));
        registry.register_resolution(Arc::new(Named("first", -5)));
        registry.register_resolution(Arc::new(Named("second", -5)));

        let names: Vec<_> = registry.hooks().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second", "late"]);
        assert_eq!(registry.len(), 3);
    }
}
