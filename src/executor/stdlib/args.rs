//! Argument checking shared by stdlib functions

use crate::executor::errors::{self, error_val};
use crate::executor::types::Val;

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "argument"
    } else {
        "arguments"
    }
}

pub fn expect_count(args: &[Val], expected: usize) -> Result<(), Val> {
    if args.len() != expected {
        return Err(error_val(
            errors::WRONG_ARG_COUNT,
            format!(
                "Expected {} {}, got {}",
                expected,
                plural(expected),
                args.len()
            ),
        ));
    }
    Ok(())
}

pub fn expect_at_least(args: &[Val], min: usize) -> Result<(), Val> {
    if args.len() < min {
        return Err(error_val(
            errors::WRONG_ARG_COUNT,
            format!(
                "Expected at least {} {}, got {}",
                min,
                plural(min),
                args.len()
            ),
        ));
    }
    Ok(())
}

fn wrong_type(index: usize, expected: &str, got: &Val) -> Val {
    error_val(
        errors::WRONG_ARG_TYPE,
        format!(
            "Argument {} must be a {}, got {}",
            index + 1,
            expected,
            got.kind()
        ),
    )
}

pub fn number(args: &[Val], index: usize) -> Result<f64, Val> {
    match &args[index] {
        Val::Num(n) => Ok(*n),
        other => Err(wrong_type(index, "number", other)),
    }
}

pub fn string(args: &[Val], index: usize) -> Result<&str, Val> {
    match &args[index] {
        Val::Str(s) => Ok(s),
        other => Err(wrong_type(index, "string", other)),
    }
}

pub fn list(args: &[Val], index: usize) -> Result<&[Val], Val> {
    match &args[index] {
        Val::List(items) => Ok(items),
        other => Err(wrong_type(index, "list", other)),
    }
}

/// Non-negative whole number, e.g. a count
pub fn count(args: &[Val], index: usize) -> Result<usize, Val> {
    let n = number(args, index)?;
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(error_val(
            errors::WRONG_ARG_TYPE,
            format!(
                "Argument {} must be a non-negative whole number, got {}",
                index + 1,
                Val::Num(n)
            ),
        ));
    }
    Ok(n as usize)
}
