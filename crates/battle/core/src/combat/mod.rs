//! Combat math.
//!
//! Pure functions shared by the action resolver: hit and critical
//! probabilities, damage scaling, variance and truncation. They hold no
//! battler references, so every rule can be checked in isolation.

pub mod damage;
pub mod hit;

pub use damage::{DamageScaling, apply_variance, scale_damage, truncate};
pub use hit::{HitCheck, HitJudgement, critical_probability, hit_check};
