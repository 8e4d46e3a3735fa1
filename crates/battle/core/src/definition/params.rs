//! Battler parameters and the modifiers that scale them.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use super::ElementId;

// ============================================================================
// Base Parameters
// ============================================================================

/// The eight base parameters every battler carries.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ParamKind {
    MaxHp,
    MaxMp,
    Atk,
    Def,
    Mat,
    Mdf,
    Agi,
    Luk,
}

/// Number of base parameters (array length for per-parameter tables).
pub const PARAM_COUNT: usize = <ParamKind as EnumCount>::COUNT;

impl ParamKind {
    /// Position of this parameter in per-parameter tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name (`"atk"`, `"max_hp"`, ...).
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Base parameter values as defined for an actor or enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseParams {
    pub max_hp: u32,
    pub max_mp: u32,
    pub atk: u32,
    pub def: u32,
    pub mat: u32,
    pub mdf: u32,
    pub agi: u32,
    pub luk: u32,
}

impl BaseParams {
    /// Builds parameters in [`ParamKind`] order.
    pub const fn from_array(values: [u32; PARAM_COUNT]) -> Self {
        Self {
            max_hp: values[0],
            max_mp: values[1],
            atk: values[2],
            def: values[3],
            mat: values[4],
            mdf: values[5],
            agi: values[6],
            luk: values[7],
        }
    }

    pub fn get(&self, kind: ParamKind) -> u32 {
        match kind {
            ParamKind::MaxHp => self.max_hp,
            ParamKind::MaxMp => self.max_mp,
            ParamKind::Atk => self.atk,
            ParamKind::Def => self.def,
            ParamKind::Mat => self.mat,
            ParamKind::Mdf => self.mdf,
            ParamKind::Agi => self.agi,
            ParamKind::Luk => self.luk,
        }
    }

    pub fn set(&mut self, kind: ParamKind, value: u32) {
        let slot = match kind {
            ParamKind::MaxHp => &mut self.max_hp,
            ParamKind::MaxMp => &mut self.max_mp,
            ParamKind::Atk => &mut self.atk,
            ParamKind::Def => &mut self.def,
            ParamKind::Mat => &mut self.mat,
            ParamKind::Mdf => &mut self.mdf,
            ParamKind::Agi => &mut self.agi,
            ParamKind::Luk => &mut self.luk,
        };
        *slot = value;
    }
}

// ============================================================================
// Ex-Parameters (rates)
// ============================================================================

/// Rate parameters consulted by hit and critical determination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExParamKind {
    /// Hit rate modifier (physical).
    Hit,
    /// Physical evasion rate.
    Eva,
    /// Critical rate modifier.
    Cri,
    /// Critical evasion rate.
    Cev,
    /// Magical evasion rate.
    Mev,
}

/// Innate rate parameters of a battler, expressed as fractions (`0.95` = 95%).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExParams {
    pub hit: f64,
    pub eva: f64,
    pub cri: f64,
    pub cev: f64,
    pub mev: f64,
}

impl ExParams {
    /// Neutral rates: every hit connects, nothing is evaded, no criticals.
    pub const NEUTRAL: Self = Self {
        hit: 1.0,
        eva: 0.0,
        cri: 0.0,
        cev: 0.0,
        mev: 0.0,
    };

    pub fn get(&self, kind: ExParamKind) -> f64 {
        match kind {
            ExParamKind::Hit => self.hit,
            ExParamKind::Eva => self.eva,
            ExParamKind::Cri => self.cri,
            ExParamKind::Cev => self.cev,
            ExParamKind::Mev => self.mev,
        }
    }
}

impl Default for ExParams {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

// ============================================================================
// Modifiers
// ============================================================================

/// Passive modifier carried by an actor, enemy or state definition.
///
/// Rates multiply; ex-parameter modifiers add.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modifier {
    /// Multiplies a base parameter.
    ParamRate(ParamKind, f64),
    /// Adds to an ex-parameter.
    ExParam(ExParamKind, f64),
    /// Multiplies damage of the given element taken by the holder.
    ElementRate(ElementId, f64),
    /// Multiplies physical damage taken.
    PhysicalDamageRate(f64),
    /// Multiplies magical damage taken.
    MagicalDamageRate(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn param_table_matches_enum_order() {
        let params = BaseParams::from_array([100, 20, 30, 40, 50, 60, 70, 80]);
        let values: Vec<u32> = ParamKind::iter().map(|kind| params.get(kind)).collect();
        assert_eq!(values, vec![100, 20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(PARAM_COUNT, 8);
        assert_eq!(ParamKind::Agi.as_str(), "agi");
    }

    #[test]
    fn set_overwrites_single_param() {
        let mut params = BaseParams::default();
        params.set(ParamKind::Def, 12);
        assert_eq!(params.def, 12);
        assert_eq!(params.atk, 0);
    }
}
