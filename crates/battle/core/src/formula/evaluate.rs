//! Formula evaluation logic.
//!
//! This module implements the standard evaluator for [`Formula`] trees.

use super::{Formula, FormulaContext, FormulaError, Operand};
use crate::battler::StatView;
use crate::config::BattleConfig;
use crate::env::FormulaEvaluator;

/// Evaluator for the built-in [`Formula`] tree.
///
/// Pure and deterministic. Rejects division by zero, non-finite results and
/// trees nested deeper than [`BattleConfig::MAX_FORMULA_DEPTH`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardEvaluator;

impl FormulaEvaluator for StandardEvaluator {
    fn evaluate(&self, formula: &Formula, ctx: &FormulaContext<'_>) -> Result<f64, FormulaError> {
        let value = evaluate(formula, ctx, 0)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite)
        }
    }
}

fn evaluate(formula: &Formula, ctx: &FormulaContext<'_>, depth: usize) -> Result<f64, FormulaError> {
    if depth > BattleConfig::MAX_FORMULA_DEPTH {
        return Err(FormulaError::TooDeep(BattleConfig::MAX_FORMULA_DEPTH));
    }
    let next = depth + 1;

    match formula {
        Formula::Constant(value) => Ok(*value),

        Formula::Subject(operand) => Ok(read_operand(ctx.subject, *operand)),

        Formula::Target(operand) => Ok(read_operand(ctx.target, *operand)),

        Formula::Sum(formulas) => formulas
            .iter()
            .try_fold(0.0, |total, f| -> Result<f64, FormulaError> {
                Ok(total + evaluate(f, ctx, next)?)
            }),

        Formula::Difference(left, right) => {
            Ok(evaluate(left, ctx, next)? - evaluate(right, ctx, next)?)
        }

        Formula::Product(formulas) => {
            if formulas.is_empty() {
                return Ok(0.0);
            }
            formulas
                .iter()
                .try_fold(1.0, |product, f| -> Result<f64, FormulaError> {
                    Ok(product * evaluate(f, ctx, next)?)
                })
        }

        Formula::Quotient(left, right) => {
            let divisor = evaluate(right, ctx, next)?;
            if divisor == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            Ok(evaluate(left, ctx, next)? / divisor)
        }

        Formula::Min(formulas) => formulas
            .iter()
            .map(|f| evaluate(f, ctx, next))
            .try_fold(f64::INFINITY, |min, res| res.map(|v| min.min(v)))
            .map(|v| if formulas.is_empty() { 0.0 } else { v }),

        Formula::Max(formulas) => formulas
            .iter()
            .map(|f| evaluate(f, ctx, next))
            .try_fold(f64::NEG_INFINITY, |max, res| res.map(|v| max.max(v)))
            .map(|v| if formulas.is_empty() { 0.0 } else { v }),
    }
}

fn read_operand(view: &StatView, operand: Operand) -> f64 {
    match operand {
        Operand::Param(kind) => view.param(kind) as f64,
        Operand::Hp => view.hp as f64,
        Operand::Mp => view.mp as f64,
        Operand::Tp => view.tp as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{BaseParams, ParamKind};

    fn view(atk: u32, def: u32) -> StatView {
        let mut params = BaseParams::default();
        params.max_hp = 100;
        params.atk = atk;
        params.def = def;
        StatView {
            params,
            hp: 80,
            mp: 10,
            tp: 0,
        }
    }

    #[test]
    fn attack_minus_defense() {
        let a = view(20, 0);
        let b = view(0, 10);
        let formula = Formula::subject(ParamKind::Atk)
            .scaled(4.0)
            .minus(Formula::target(ParamKind::Def).scaled(2.0));

        let value = StandardEvaluator
            .evaluate(&formula, &FormulaContext::new(&a, &b))
            .unwrap();
        assert_eq!(value, 60.0);
    }

    #[test]
    fn reads_current_resources() {
        let a = view(0, 0);
        let b = view(0, 0);
        let formula = Formula::Sum(vec![
            Formula::Target(Operand::Hp),
            Formula::Subject(Operand::Mp),
        ]);
        let value = StandardEvaluator
            .evaluate(&formula, &FormulaContext::new(&a, &b))
            .unwrap();
        assert_eq!(value, 90.0);
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let a = view(10, 0);
        let b = view(0, 0);
        let formula = Formula::Quotient(
            Box::new(Formula::subject(ParamKind::Atk)),
            Box::new(Formula::target(ParamKind::Def)),
        );
        let err = StandardEvaluator
            .evaluate(&formula, &FormulaContext::new(&a, &b))
            .unwrap_err();
        assert_eq!(err, FormulaError::DivisionByZero);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let a = view(1, 1);
        let mut formula = Formula::Constant(1.0);
        for _ in 0..(BattleConfig::MAX_FORMULA_DEPTH + 2) {
            formula = Formula::Sum(vec![formula]);
        }
        let err = StandardEvaluator
            .evaluate(&formula, &FormulaContext::new(&a, &a))
            .unwrap_err();
        assert!(matches!(err, FormulaError::TooDeep(_)));
    }

    #[test]
    fn min_max_of_empty_lists_are_zero() {
        let a = view(1, 1);
        let ctx = FormulaContext::new(&a, &a);
        assert_eq!(StandardEvaluator.evaluate(&Formula::Min(vec![]), &ctx), Ok(0.0));
        assert_eq!(StandardEvaluator.evaluate(&Formula::Max(vec![]), &ctx), Ok(0.0));
    }
}
