//! Type definitions for the executor
//!
//! This module contains all core types:
//! - AST node types (Stmt, Expr)
//! - Runtime values (Val, RecordVal)
//! - Execution phases for each statement type
//! - Control flow and frame types

pub mod ast;
pub mod control;
pub mod phase;
pub mod values;

// Re-export commonly used types
pub use ast::{BinaryOp, Expr, ForLoopKind, MemberAccess, RecordDecl, Span, Stmt, UnaryOp, VarKind};
pub use control::{Control, Frame, FrameKind};
pub use phase::{BlockPhase, ForPhase, IfPhase, TryPhase, WhilePhase};
pub use values::{RecordVal, Val, MAX_NESTING};
