//! Validation Rules
//!
//! Each file in this module contains one validation rule:
//!
//! - `record_declaration.rs` - Duplicate records and record fields
//! - `undefined_variable.rs` - Variables used before declaration
//! - `unknown_record.rs` - `new` with an undeclared record type
//! - `unknown_field.rs` - `new` initializing a field the record doesn't have
//! - `loop_control.rs` - `break`/`continue` outside of a loop
//! - `const_assign.rs` - Assignment to constants and globals
//! - `unknown_member.rs` - Members a global or module doesn't expose
//! - `unused_variable.rs` - Variables declared but never used
//! - `unreachable_code.rs` - Code that can never execute
//! - `shadowed_global.rs` - Declarations hiding a global or module

mod const_assign;
mod loop_control;
mod record_declaration;
mod shadowed_global;
mod undefined_variable;
mod unknown_field;
mod unknown_member;
mod unknown_record;
mod unreachable_code;
mod unused_variable;

pub use const_assign::ConstAssignRule;
pub use loop_control::LoopControlRule;
pub use record_declaration::RecordDeclarationRule;
pub use shadowed_global::ShadowedGlobalRule;
pub use undefined_variable::UndefinedVariableRule;
pub use unknown_field::UnknownFieldRule;
pub use unknown_member::UnknownMemberRule;
pub use unknown_record::UnknownRecordRule;
pub use unreachable_code::UnreachableCodeRule;
pub use unused_variable::UnusedVariableRule;
