//! Buff stages per parameter.

use strum::IntoEnumIterator;

use crate::config::BattleConfig;
use crate::definition::{PARAM_COUNT, ParamKind};

/// Stage and remaining turns of one parameter's buff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffStage {
    /// Always within `-MAX_BUFF_STAGE..=MAX_BUFF_STAGE`.
    pub stage: i8,
    pub turns: u32,
}

/// One [`BuffStage`] per [`ParamKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffStages {
    stages: [BuffStage; PARAM_COUNT],
}

impl BuffStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, param: ParamKind) -> BuffStage {
        self.stages[param.index()]
    }

    pub fn stage(&self, param: ParamKind) -> i8 {
        self.stages[param.index()].stage
    }

    /// Moves the stage by `delta` (clamped) and sets its duration to `turns`.
    ///
    /// Returns the stage actually applied afterwards. A stage that lands on
    /// zero carries no duration.
    pub fn change(&mut self, param: ParamKind, delta: i8, turns: u32) -> i8 {
        let slot = &mut self.stages[param.index()];
        let stage = slot
            .stage
            .saturating_add(delta)
            .clamp(-BattleConfig::MAX_BUFF_STAGE, BattleConfig::MAX_BUFF_STAGE);
        slot.stage = stage;
        slot.turns = if stage == 0 { 0 } else { turns };
        stage
    }

    /// Parameter multiplier `1 + stage × 0.25`.
    pub fn multiplier(&self, param: ParamKind) -> f64 {
        1.0 + self.stage(param) as f64 * BattleConfig::BUFF_RATE_PER_STAGE
    }

    /// Resets one parameter, returning whether it was buffed.
    pub fn reset(&mut self, param: ParamKind) -> bool {
        let slot = &mut self.stages[param.index()];
        let was_active = slot.stage != 0;
        *slot = BuffStage::default();
        was_active
    }

    pub fn clear(&mut self) {
        self.stages = [BuffStage::default(); PARAM_COUNT];
    }

    /// Decrements every active counter; stages reaching zero turns reset.
    ///
    /// Returns the parameters whose buff expired.
    pub fn tick(&mut self) -> Vec<ParamKind> {
        let mut expired = Vec::new();
        for param in ParamKind::iter() {
            let slot = &mut self.stages[param.index()];
            if slot.stage == 0 {
                continue;
            }
            slot.turns = slot.turns.saturating_sub(1);
            if slot.turns == 0 {
                *slot = BuffStage::default();
                expired.push(param);
            }
        }
        expired
    }

    /// Parameters with a non-zero stage.
    pub fn active(&self) -> impl Iterator<Item = (ParamKind, BuffStage)> + '_ {
        ParamKind::iter()
            .map(|param| (param, self.get(param)))
            .filter(|(_, buff)| buff.stage != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_stays_within_bounds() {
        let mut buffs = BuffStages::new();
        for delta in [1, 1, 1, 5, -3, -3, -1, 127, -128, 2] {
            let stage = buffs.change(ParamKind::Atk, delta, 3);
            assert!((-2..=2).contains(&stage), "delta {delta} produced {stage}");
        }
    }

    #[test]
    fn multiplier_tracks_stage() {
        let mut buffs = BuffStages::new();
        assert_eq!(buffs.multiplier(ParamKind::Def), 1.0);
        buffs.change(ParamKind::Def, 2, 1);
        assert_eq!(buffs.multiplier(ParamKind::Def), 1.5);
        buffs.change(ParamKind::Def, -4, 1);
        assert_eq!(buffs.multiplier(ParamKind::Def), 0.5);
    }

    #[test]
    fn tick_resets_expired_stage() {
        let mut buffs = BuffStages::new();
        buffs.change(ParamKind::Agi, 1, 2);
        buffs.change(ParamKind::Luk, -1, 1);

        assert_eq!(buffs.tick(), vec![ParamKind::Luk]);
        assert_eq!(buffs.stage(ParamKind::Agi), 1);
        assert_eq!(buffs.tick(), vec![ParamKind::Agi]);
        assert_eq!(buffs.stage(ParamKind::Agi), 0);
        assert!(buffs.tick().is_empty());
    }
}
