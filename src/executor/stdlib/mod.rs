//! Standard library function implementations
//!
//! This module contains all stdlib function implementations organized by
//! module. Scripts reach them through global objects: `Cauldron` is always
//! present, the others only when named in the script's imports.

pub mod args;
pub mod list;
pub mod math;
pub mod text;
pub mod time;

use std::collections::BTreeMap;

use super::expressions::EvalResult;
use super::types::Val;
use crate::host::{Writer, DUMP, GLOBAL_NAME};

/* ===================== Standard Library Function Types ===================== */

/// Standard library function identifiers
///
/// Each variant represents a specific stdlib function and is stored in the
/// environment as `Val::NativeFunc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdlibFunc {
    Dump,
    MathFloor,
    MathCeil,
    MathAbs,
    MathRound,
    MathMin,
    MathMax,
    MathSqrt,
    MathPow,
    TextUpper,
    TextLower,
    TextTrim,
    TextSplit,
    TextJoin,
    TextContains,
    TextRepeat,
    TextLen,
    ListLen,
    ListRange,
    ListPush,
    ListReverse,
    TimeNow,
    TimeSleep,
}

const CAULDRON: &[(&str, StdlibFunc)] = &[(DUMP, StdlibFunc::Dump)];

const MATH: &[(&str, StdlibFunc)] = &[
    ("floor", StdlibFunc::MathFloor),
    ("ceil", StdlibFunc::MathCeil),
    ("abs", StdlibFunc::MathAbs),
    ("round", StdlibFunc::MathRound),
    ("min", StdlibFunc::MathMin),
    ("max", StdlibFunc::MathMax),
    ("sqrt", StdlibFunc::MathSqrt),
    ("pow", StdlibFunc::MathPow),
];

const TEXT: &[(&str, StdlibFunc)] = &[
    ("upper", StdlibFunc::TextUpper),
    ("lower", StdlibFunc::TextLower),
    ("trim", StdlibFunc::TextTrim),
    ("split", StdlibFunc::TextSplit),
    ("join", StdlibFunc::TextJoin),
    ("contains", StdlibFunc::TextContains),
    ("repeat", StdlibFunc::TextRepeat),
    ("len", StdlibFunc::TextLen),
];

const LIST: &[(&str, StdlibFunc)] = &[
    ("len", StdlibFunc::ListLen),
    ("range", StdlibFunc::ListRange),
    ("push", StdlibFunc::ListPush),
    ("reverse", StdlibFunc::ListReverse),
];

const TIME: &[(&str, StdlibFunc)] = &[("now", StdlibFunc::TimeNow), ("sleep", StdlibFunc::TimeSleep)];

/// Importable module names
pub const MODULES: [&str; 4] = ["math", "text", "list", "time"];

fn functions(module: &str) -> Option<&'static [(&'static str, StdlibFunc)]> {
    match module {
        GLOBAL_NAME => Some(CAULDRON),
        "math" => Some(MATH),
        "text" => Some(TEXT),
        "list" => Some(LIST),
        "time" => Some(TIME),
        _ => None,
    }
}

/// Member names of a module (or of the `Cauldron` global)
pub fn members(module: &str) -> Option<Vec<&'static str>> {
    functions(module).map(|funcs| funcs.iter().map(|(name, _)| *name).collect())
}

pub fn is_module(name: &str) -> bool {
    MODULES.contains(&name)
}

impl StdlibFunc {
    /// Qualified name, e.g. `math.floor`
    pub fn name(&self) -> String {
        [GLOBAL_NAME]
            .into_iter()
            .chain(MODULES)
            .find_map(|module| {
                functions(module)?
                    .iter()
                    .find(|(_, func)| func == self)
                    .map(|(name, _)| format!("{}.{}", module, name))
            })
            .unwrap_or_else(|| format!("{:?}", self))
    }
}

/* ===================== Stdlib Dispatcher ===================== */

/// Call a standard library function with arguments
///
/// This dispatcher routes to the appropriate function implementation
/// based on the StdlibFunc variant.
pub fn call_stdlib_func(func: &StdlibFunc, args: &[Val], writer: &Writer) -> EvalResult {
    match func {
        StdlibFunc::Dump => dump(args, writer),
        StdlibFunc::MathFloor => math::floor(args),
        StdlibFunc::MathCeil => math::ceil(args),
        StdlibFunc::MathAbs => math::abs(args),
        StdlibFunc::MathRound => math::round(args),
        StdlibFunc::MathMin => math::min(args),
        StdlibFunc::MathMax => math::max(args),
        StdlibFunc::MathSqrt => math::sqrt(args),
        StdlibFunc::MathPow => math::pow(args),
        StdlibFunc::TextUpper => text::upper(args),
        StdlibFunc::TextLower => text::lower(args),
        StdlibFunc::TextTrim => text::trim(args),
        StdlibFunc::TextSplit => text::split(args),
        StdlibFunc::TextJoin => text::join(args),
        StdlibFunc::TextContains => text::contains(args),
        StdlibFunc::TextRepeat => text::repeat(args),
        StdlibFunc::TextLen => text::len(args),
        StdlibFunc::ListLen => list::len(args),
        StdlibFunc::ListRange => list::range(args),
        StdlibFunc::ListPush => list::push(args),
        StdlibFunc::ListReverse => list::reverse(args),
        StdlibFunc::TimeNow => time::now(args),
        StdlibFunc::TimeSleep => time::sleep(args),
    }
}

/// Cauldron.dump(value) - render the value to the output
fn dump(args: &[Val], writer: &Writer) -> EvalResult {
    args::expect_count(args, 1)?;
    writer.dump(&args[0]);
    Ok(Val::Null)
}

/* ===================== Environment Injection ===================== */

fn module_object(module: &str) -> Option<Val> {
    let funcs = functions(module)?;
    let obj: BTreeMap<String, Val> = funcs
        .iter()
        .map(|(name, func)| (name.to_string(), Val::NativeFunc(*func)))
        .collect();
    Some(Val::Obj(obj))
}

/// Global objects for a run: `Cauldron` plus every known imported module
///
/// Unknown import names are skipped; the compiler reports them.
pub fn globals(imports: &[String]) -> Vec<(String, Val)> {
    let mut globals = Vec::new();
    if let Some(cauldron) = module_object(GLOBAL_NAME) {
        globals.push((GLOBAL_NAME.to_string(), cauldron));
    }
    for import in imports {
        if !is_module(import) || globals.iter().any(|(name, _)| name == import) {
            continue;
        }
        if let Some(module) = module_object(import) {
            globals.push((import.clone(), module));
        }
    }
    globals
}
