//! Deterministic turn-based battle engine.
//!
//! `battle-core` drives combat from initiation through action resolution to
//! victory or defeat. It consumes read-only definitions through
//! [`env::DefinitionsOracle`], evaluates damage through a
//! [`env::FormulaEvaluator`], and emits [`action::ActionResult`] records and
//! [`engine::BattleEvent`]s for the host to present. All battler mutation flows
//! through [`engine::BattleManager`], the action resolver and the state/buff
//! engine so invariants (HP/MP/TP bounds, buff stage bounds, exclusive state
//! groups) always hold.
pub mod action;
pub mod battler;
pub mod combat;
pub mod config;
pub mod definition;
pub mod engine;
pub mod env;
pub mod error;
pub mod formula;
pub mod status;
pub mod trigger;

pub use action::{
    Action, ActionOrigin, ActionResolver, ActionResult, BuffChange, ResolutionWarning,
};
pub use battler::{
    ActiveStates, Battler, BattlerId, BattlerOrigin, BuffStage, BuffStages, Roster, Side,
    StateInstance, StatView,
};
pub use config::BattleConfig;
pub use definition::{
    ActionCondition, ActorDefinition, ActorId, BaseParams, DamageKind, DamageSpec, DropItem,
    EffectSpec, ElementId, EnemyAction, EnemyDefinition, EnemyId, ExParamKind, ExParams, GroupId,
    HitType, ItemId, Modifier, ParamKind, RemovalTiming, Restriction, SkillId, StateDefinition,
    StateId, TargetScope, TroopDefinition, TroopId, UsableDefinition, UsableRef,
};
pub use engine::{
    BattleEvent, BattleManager, BattleOutcome, BattlePhase, BattleSession, BattleSummary,
    CommandError, HookRegistry, HookVerdict, PartyMember, ResolutionContext, ResolutionHook,
    Rewards, SetupError, Step, TriggerHook,
};
pub use env::{
    BattleEnv, DefinitionsOracle, DefinitionsSnapshot, Dice, Env, FormulaEvaluator, OracleError,
    PcgRng, RngOracle, compute_seed,
};
pub use error::{BattleError, ErrorSeverity};
pub use formula::{Formula, FormulaContext, FormulaError, StandardEvaluator};
pub use status::{StateApplication, StateRefusal, TickReport};
pub use trigger::{
    BattlerSelector, Checkpoint, Checkpoints, FlowDirective, ForcedAction, RunPolicy,
    SessionPredicate, SessionView, TriggerCondition, TriggerConflict, TriggerDefinition,
    TriggerEngine, TriggerOutcome, TriggerReaction,
};
