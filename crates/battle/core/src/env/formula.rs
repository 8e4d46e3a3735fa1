//! Formula evaluation oracle.

use crate::formula::{Formula, FormulaContext, FormulaError};

/// Evaluates damage/recovery formulas.
///
/// Implementations must be pure: the same formula and context always yield
/// the same value. The engine clamps whatever is returned, so an evaluator
/// only has to report failures it can detect.
pub trait FormulaEvaluator: Send + Sync {
    fn evaluate(&self, formula: &Formula, ctx: &FormulaContext<'_>) -> Result<f64, FormulaError>;
}
