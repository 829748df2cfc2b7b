//! List stdlib functions
//!
//! Lists are values, so functions that "modify" a list return a new one.

use super::args;
use crate::executor::expressions::EvalResult;
use crate::executor::types::values::ensure_nesting;
use crate::executor::types::Val;

/// list.len(xs)
pub fn len(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    Ok(Val::Num(args::list(args, 0)?.len() as f64))
}

/// list.range(end) or list.range(start, end) - whole numbers, end exclusive
pub fn range(args: &[Val]) -> EvalResult {
    let (start, end) = match args.len() {
        1 => (0, args::count(args, 0)?),
        _ => {
            args::expect_count(args, 2)?;
            (args::count(args, 0)?, args::count(args, 1)?)
        }
    };
    Ok(Val::List((start..end).map(|n| Val::Num(n as f64)).collect()))
}

/// list.push(xs, value) - a copy of `xs` with `value` appended
pub fn push(args: &[Val]) -> EvalResult {
    args::expect_count(args, 2)?;
    ensure_nesting([&args[1]])?;
    let mut items = args::list(args, 0)?.to_vec();
    items.push(args[1].clone());
    Ok(Val::List(items))
}

/// list.reverse(xs) - a reversed copy of `xs`
pub fn reverse(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    let mut items = args::list(args, 0)?.to_vec();
    items.reverse();
    Ok(Val::List(items))
}
