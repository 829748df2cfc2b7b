//! Text stdlib functions

use super::args;
use crate::executor::expressions::EvalResult;
use crate::executor::types::Val;

/// text.upper(s)
pub fn upper(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    Ok(Val::Str(args::string(args, 0)?.to_uppercase()))
}

/// text.lower(s)
pub fn lower(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    Ok(Val::Str(args::string(args, 0)?.to_lowercase()))
}

/// text.trim(s)
pub fn trim(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    Ok(Val::Str(args::string(args, 0)?.trim().to_string()))
}

/// text.split(s, separator) - an empty separator splits into characters
pub fn split(args: &[Val]) -> EvalResult {
    args::expect_count(args, 2)?;
    let s = args::string(args, 0)?;
    let separator = args::string(args, 1)?;

    let parts = if separator.is_empty() {
        s.chars().map(|c| Val::Str(c.to_string())).collect()
    } else {
        s.split(separator).map(Val::from).collect()
    };
    Ok(Val::List(parts))
}

/// text.join(list, separator) - items are joined by their string form
pub fn join(args: &[Val]) -> EvalResult {
    args::expect_count(args, 2)?;
    let items = args::list(args, 0)?;
    let separator = args::string(args, 1)?;

    let joined = items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator);
    Ok(Val::Str(joined))
}

/// text.contains(s, needle)
pub fn contains(args: &[Val]) -> EvalResult {
    args::expect_count(args, 2)?;
    let s = args::string(args, 0)?;
    let needle = args::string(args, 1)?;
    Ok(Val::Bool(s.contains(needle)))
}

/// text.repeat(s, times)
pub fn repeat(args: &[Val]) -> EvalResult {
    args::expect_count(args, 2)?;
    let s = args::string(args, 0)?;
    let times = args::count(args, 1)?;
    Ok(Val::Str(s.repeat(times)))
}

/// text.len(s) - length in characters
pub fn len(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    Ok(Val::Num(args::string(args, 0)?.chars().count() as f64))
}
