//! Runtime error codes and the error value carried by `Val::Error`

use std::fmt;

use super::types::Val;

/* ===================== Error Codes ===================== */

pub const TYPE_ERROR: &str = "TypeError";
pub const PROPERTY_NOT_FOUND: &str = "PropertyNotFound";
pub const INDEX_OUT_OF_RANGE: &str = "IndexOutOfRange";
pub const DIVISION_BY_ZERO: &str = "DivisionByZero";
pub const WRONG_ARG_COUNT: &str = "WrongArgumentCount";
pub const WRONG_ARG_TYPE: &str = "WrongArgumentType";
pub const UNDEFINED_VARIABLE: &str = "UndefinedVariable";
pub const NOT_CALLABLE: &str = "NotCallable";
pub const UNKNOWN_RECORD: &str = "UnknownRecord";
pub const UNKNOWN_FIELD: &str = "UnknownField";
pub const CONST_ASSIGNMENT: &str = "ConstAssignment";
pub const LOOP_CONTROL: &str = "LoopControl";
pub const NOT_ITERABLE: &str = "NotIterable";
pub const NESTING_TOO_DEEP: &str = "NestingTooDeep";

/* ===================== ErrorInfo ===================== */

/// Error value raised by the runtime or the stdlib
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Build the thrown value for a runtime error
pub fn error_val(code: &str, message: impl Into<String>) -> Val {
    Val::Error(ErrorInfo::new(code, message))
}
