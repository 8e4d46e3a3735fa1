//! Damage scaling, variance and truncation.

use crate::env::Dice;

/// Multipliers applied to a formula result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageScaling {
    /// `Some(multiplier)` on a critical hit.
    pub critical: Option<f64>,
    pub element_rate: f64,
    /// Physical or magical damage rate of the target.
    pub damage_rate: f64,
    /// `Some(divisor)` when the target is guarding.
    pub guard_divisor: Option<f64>,
}

impl Default for DamageScaling {
    fn default() -> Self {
        Self {
            critical: None,
            element_rate: 1.0,
            damage_rate: 1.0,
            guard_divisor: None,
        }
    }
}

/// Applies critical, element, damage-type and guard scaling.
///
/// Guard only reduces positive (harmful) values; a non-positive divisor is
/// ignored.
pub fn scale_damage(value: f64, scaling: &DamageScaling) -> f64 {
    let mut value = value;
    if let Some(multiplier) = scaling.critical {
        value *= multiplier;
    }
    value *= scaling.element_rate;
    value *= scaling.damage_rate;
    if let Some(divisor) = scaling.guard_divisor {
        if value > 0.0 && divisor > 0.0 {
            value /= divisor;
        }
    }
    value
}

/// Spreads `value` by up to `variance` percent in either direction.
///
/// The offset is the sum of two uniform draws, so values near the centre are
/// more likely. A zero variance or a zero amplitude consumes no draws.
pub fn apply_variance(value: f64, variance: u8, dice: &Dice<'_>) -> f64 {
    if variance == 0 {
        return value;
    }
    let amplitude = (value.abs() * f64::from(variance) / 100.0).floor();
    if amplitude < 1.0 || !amplitude.is_finite() {
        return value;
    }
    let amplitude = amplitude.min(u32::MAX as f64 / 2.0) as u32;
    let offset = dice.range(0, amplitude) as i64 + dice.range(0, amplitude) as i64
        - amplitude as i64;
    if value >= 0.0 {
        value + offset as f64
    } else {
        value - offset as f64
    }
}

/// Truncates toward zero; non-finite values become zero.
pub fn truncate(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64
    } else {
        0
    }
}
