//! Read-only stat view handed to formulas.

use crate::definition::{BaseParams, ParamKind};

/// Effective parameters plus current resources of one battler.
///
/// Captured live at resolution time, or once at decision time when an action
/// carries a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatView {
    pub params: BaseParams,
    pub hp: u32,
    pub mp: u32,
    pub tp: u32,
}

impl StatView {
    pub fn param(&self, kind: ParamKind) -> u32 {
        self.params.get(kind)
    }

    pub fn mhp(&self) -> u32 {
        self.params.max_hp
    }

    pub fn mmp(&self) -> u32 {
        self.params.max_mp
    }

    pub fn atk(&self) -> u32 {
        self.params.atk
    }

    pub fn def(&self) -> u32 {
        self.params.def
    }

    pub fn mat(&self) -> u32 {
        self.params.mat
    }

    pub fn mdf(&self) -> u32 {
        self.params.mdf
    }

    pub fn agi(&self) -> u32 {
        self.params.agi
    }

    pub fn luk(&self) -> u32 {
        self.params.luk
    }
}
