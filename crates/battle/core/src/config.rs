/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Upper bound for every battler's TP meter.
    pub max_tp: u32,

    /// Damage multiplier applied on a critical hit.
    pub critical_multiplier: f64,

    /// Divisor applied to positive damage against a guarding target.
    pub guard_divisor: f64,

    /// Ordering speed varies by up to `agi / speed_variance_divisor` in either direction.
    pub speed_variance_divisor: u32,

    /// Whether targets gain TP proportional to the HP damage they take.
    pub tp_charge_on_damage: bool,

    /// When set, the manager pauses after every executed action until the host
    /// calls `acknowledge_animation`.
    pub await_animation: bool,

    /// Turn limit after which the battle is aborted. `0` disables the limit.
    pub max_turns: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of party members in one battle.
    pub const MAX_PARTY_SIZE: usize = 8;
    /// Maximum number of enemies in one troop.
    pub const MAX_TROOP_SIZE: usize = 8;
    /// Maximum number of simultaneously active states on one battler.
    pub const MAX_ACTIVE_STATES: usize = 16;
    /// Buff stages are bounded to `-MAX_BUFF_STAGE..=MAX_BUFF_STAGE`.
    pub const MAX_BUFF_STAGE: i8 = 2;
    /// Parameter multiplier contributed by one buff stage.
    pub const BUFF_RATE_PER_STAGE: f64 = 0.25;
    /// Maximum nesting depth accepted by the standard formula evaluator.
    pub const MAX_FORMULA_DEPTH: usize = 32;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_TP: u32 = 100;
    pub const DEFAULT_CRITICAL_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_GUARD_DIVISOR: f64 = 2.0;
    pub const DEFAULT_SPEED_VARIANCE_DIVISOR: u32 = 4;

    pub fn new() -> Self {
        Self {
            max_tp: Self::DEFAULT_MAX_TP,
            critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            guard_divisor: Self::DEFAULT_GUARD_DIVISOR,
            speed_variance_divisor: Self::DEFAULT_SPEED_VARIANCE_DIVISOR,
            tp_charge_on_damage: true,
            await_animation: false,
            max_turns: 0,
        }
    }

    pub fn with_await_animation(mut self, await_animation: bool) -> Self {
        self.await_animation = await_animation;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_tp_charge_on_damage(mut self, enabled: bool) -> Self {
        self.tp_charge_on_damage = enabled;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
