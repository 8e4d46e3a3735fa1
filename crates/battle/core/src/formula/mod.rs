//! Formula system for damage and recovery values.
//!
//! Formulas are a closed expression tree over the subject's and target's
//! stats. They stand in for free-form expression text: hosts that need
//! user-authored formulas plug their own [`crate::env::FormulaEvaluator`]
//! and the engine still clamps whatever comes back.
//!
//! ## Examples
//!
//! ```
//! use battle_core::{Formula, ParamKind};
//!
//! // a.atk * 4 - b.def * 2
//! let formula = Formula::subject(ParamKind::Atk)
//!     .scaled(4.0)
//!     .minus(Formula::target(ParamKind::Def).scaled(2.0));
//! # let _ = formula;
//! ```

mod evaluate;

pub use evaluate::StandardEvaluator;

use crate::battler::StatView;
use crate::definition::ParamKind;
use crate::error::{BattleError, ErrorSeverity};

// ============================================================================
// Formula Definition
// ============================================================================

/// A battler value a formula can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Effective (buffed) parameter.
    Param(ParamKind),
    Hp,
    Mp,
    Tp,
}

/// Formula for calculating numeric values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    /// Fixed constant value.
    Constant(f64),

    /// A value of the acting battler (`a`).
    Subject(Operand),

    /// A value of the target battler (`b`).
    Target(Operand),

    /// Sum of multiple formulas.
    Sum(Vec<Formula>),

    /// Left minus right.
    Difference(Box<Formula>, Box<Formula>),

    /// Product of multiple formulas.
    Product(Vec<Formula>),

    /// Left divided by right.
    Quotient(Box<Formula>, Box<Formula>),

    /// Minimum of multiple formulas.
    Min(Vec<Formula>),

    /// Maximum of multiple formulas.
    Max(Vec<Formula>),
}

impl Formula {
    /// Subject's effective parameter.
    pub fn subject(param: ParamKind) -> Self {
        Self::Subject(Operand::Param(param))
    }

    /// Target's effective parameter.
    pub fn target(param: ParamKind) -> Self {
        Self::Target(Operand::Param(param))
    }

    /// `self * factor`
    pub fn scaled(self, factor: f64) -> Self {
        Self::Product(vec![self, Self::Constant(factor)])
    }

    /// `self - other`
    pub fn minus(self, other: Formula) -> Self {
        Self::Difference(Box::new(self), Box::new(other))
    }

    /// `self + other`
    pub fn plus(self, other: Formula) -> Self {
        Self::Sum(vec![self, other])
    }
}

impl Default for Formula {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

// ============================================================================
// Evaluation Context
// ============================================================================

/// Read-only view handed to the formula evaluator.
///
/// The subject view is either the live battler or the snapshot captured when
/// the action was decided.
#[derive(Clone, Copy, Debug)]
pub struct FormulaContext<'a> {
    pub subject: &'a StatView,
    pub target: &'a StatView,
}

impl<'a> FormulaContext<'a> {
    pub fn new(subject: &'a StatView, target: &'a StatView) -> Self {
        Self { subject, target }
    }

    /// Subject accessor (`a` in formula text).
    pub fn a(&self) -> &StatView {
        self.subject
    }

    /// Target accessor (`b` in formula text).
    pub fn b(&self) -> &StatView {
        self.target
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while evaluating a formula.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("formula produced a non-finite value")]
    NonFinite,

    #[error("formula nesting exceeds depth {0}")]
    TooDeep(usize),

    #[error("formula evaluation failed: {0}")]
    Custom(String),
}

impl BattleError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "FORMULA_DIVISION_BY_ZERO",
            Self::NonFinite => "FORMULA_NON_FINITE",
            Self::TooDeep(_) => "FORMULA_TOO_DEEP",
            Self::Custom(_) => "FORMULA_CUSTOM",
        }
    }
}
