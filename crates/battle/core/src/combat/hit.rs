//! Hit and critical determination.

use crate::definition::HitType;

/// Probabilities behind one hit draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitCheck {
    /// Overall chance the usable connects, in `[0, 1]`.
    pub probability: f64,
    /// The subject-side part of `probability` (success rate × hit rate).
    pub accuracy: f64,
}

/// Classification of a hit draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitJudgement {
    Hit,
    /// The target dodged.
    Evaded,
    /// The draw failed the subject's own accuracy as well.
    Missed,
}

/// Combines success rate and rate parameters into a [`HitCheck`].
///
/// ```text
/// Certain:  success
/// Physical: success × hit × (1 − eva)
/// Magical:  success × (1 − mev)
/// ```
pub fn hit_check(
    hit_type: HitType,
    success_rate: u8,
    subject_hit: f64,
    target_eva: f64,
    target_mev: f64,
) -> HitCheck {
    let success = f64::from(success_rate) / 100.0;
    let (accuracy, probability) = match hit_type {
        HitType::Certain => (success, success),
        HitType::Physical => {
            let accuracy = success * subject_hit;
            (accuracy, accuracy * (1.0 - target_eva))
        }
        HitType::Magical => (success, success * (1.0 - target_mev)),
    };
    HitCheck {
        probability: clamp_unit(probability),
        accuracy: clamp_unit(accuracy),
    }
}

impl HitCheck {
    /// Judges a uniform draw in `[0, 1)` against this check.
    pub fn judge(&self, draw: f64) -> HitJudgement {
        if draw < self.probability {
            HitJudgement::Hit
        } else if draw >= self.accuracy {
            HitJudgement::Missed
        } else {
            HitJudgement::Evaded
        }
    }
}

/// `base × cri × (1 − cev)`, clamped to `[0, 1]`.
pub fn critical_probability(base_rate: f64, subject_cri: f64, target_cev: f64) -> f64 {
    clamp_unit(base_rate * subject_cri * (1.0 - target_cev))
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_success_never_hits() {
        let check = hit_check(HitType::Physical, 0, 1.0, 0.0, 0.0);
        assert_eq!(check.probability, 0.0);
        for draw in [0.0, 0.25, 0.5, 0.999_999] {
            assert_ne!(check.judge(draw), HitJudgement::Hit);
        }
    }

    #[test]
    fn physical_uses_hit_and_evasion() {
        let check = hit_check(HitType::Physical, 100, 0.9, 0.5, 1.0);
        assert!((check.probability - 0.45).abs() < 1e-12);
        assert_eq!(check.judge(0.2), HitJudgement::Hit);
        assert_eq!(check.judge(0.6), HitJudgement::Evaded);
        assert_eq!(check.judge(0.95), HitJudgement::Missed);
    }

    #[test]
    fn certain_ignores_rates() {
        let check = hit_check(HitType::Certain, 100, 0.0, 1.0, 1.0);
        assert_eq!(check.probability, 1.0);
    }

    #[test]
    fn magical_uses_magic_evasion_only() {
        let check = hit_check(HitType::Magical, 100, 0.0, 1.0, 0.25);
        assert_eq!(check.probability, 0.75);
    }

    #[test]
    fn critical_is_clamped() {
        assert_eq!(critical_probability(1.0, 3.0, 0.0), 1.0);
        assert_eq!(critical_probability(1.0, 0.5, 2.0), 0.0);
        assert_eq!(critical_probability(1.0, 0.2, 0.5), 0.1);
    }
}
