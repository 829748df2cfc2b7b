//! Time stdlib functions

use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use super::args;
use crate::executor::expressions::EvalResult;
use crate::executor::types::Val;

/// time.now() - current UTC time as an RFC 3339 string
pub fn now(args: &[Val]) -> EvalResult {
    args::expect_count(args, 0)?;
    Ok(Val::Str(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)))
}

/// time.sleep(ms) - block the running script
///
/// The sleep is not interruptible: a cancel requested meanwhile takes effect
/// at the first step after it returns.
pub fn sleep(args: &[Val]) -> EvalResult {
    args::expect_count(args, 1)?;
    let ms = args::count(args, 0)?;
    std::thread::sleep(Duration::from_millis(ms as u64));
    Ok(Val::Null)
}
