//! Math stdlib functions

use super::args;
use crate::executor::expressions::EvalResult;
use crate::executor::types::Val;

fn unary(args: &[Val], op: fn(f64) -> f64) -> EvalResult {
    args::expect_count(args, 1)?;
    Ok(Val::Num(op(args::number(args, 0)?)))
}

/// math.floor(x)
pub fn floor(args: &[Val]) -> EvalResult {
    unary(args, f64::floor)
}

/// math.ceil(x)
pub fn ceil(args: &[Val]) -> EvalResult {
    unary(args, f64::ceil)
}

/// math.abs(x)
pub fn abs(args: &[Val]) -> EvalResult {
    unary(args, f64::abs)
}

/// math.round(x) - halves round away from zero
pub fn round(args: &[Val]) -> EvalResult {
    unary(args, f64::round)
}

/// math.sqrt(x) - NaN for negative input
pub fn sqrt(args: &[Val]) -> EvalResult {
    unary(args, f64::sqrt)
}

/// math.pow(base, exponent)
pub fn pow(args: &[Val]) -> EvalResult {
    args::expect_count(args, 2)?;
    let base = args::number(args, 0)?;
    let exponent = args::number(args, 1)?;
    Ok(Val::Num(base.powf(exponent)))
}

fn fold(args: &[Val], pick: fn(f64, f64) -> f64) -> EvalResult {
    args::expect_at_least(args, 1)?;
    let mut acc = args::number(args, 0)?;
    for i in 1..args.len() {
        acc = pick(acc, args::number(args, i)?);
    }
    Ok(Val::Num(acc))
}

/// math.min(a, b, ...)
pub fn min(args: &[Val]) -> EvalResult {
    fold(args, f64::min)
}

/// math.max(a, b, ...)
pub fn max(args: &[Val]) -> EvalResult {
    fold(args, f64::max)
}
