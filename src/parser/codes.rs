//! Stable diagnostic codes reported by the built-in engine

// Errors
pub const SYNTAX_ERROR: &str = "CS0001";
pub const UNKNOWN_IMPORT: &str = "CS0002";
pub const UNDEFINED_VARIABLE: &str = "CS0100";
pub const UNKNOWN_RECORD: &str = "CS0101";
pub const UNKNOWN_FIELD: &str = "CS0102";
pub const DUPLICATE_DECLARATION: &str = "CS0103";
pub const LOOP_CONTROL_OUTSIDE_LOOP: &str = "CS0104";
pub const CONST_ASSIGNMENT: &str = "CS0105";
pub const UNKNOWN_MEMBER: &str = "CS0106";

// Warnings
pub const UNUSED_VARIABLE: &str = "CS0200";
pub const UNREACHABLE_CODE: &str = "CS0201";

// Information
pub const SHADOWED_GLOBAL: &str = "CS0300";
