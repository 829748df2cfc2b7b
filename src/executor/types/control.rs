//! Control flow and execution frame types

use std::sync::Arc;

use super::ast::Stmt;
use super::phase::{BlockPhase, ForPhase, IfPhase, TryPhase, WhilePhase};
use super::values::Val;

/* ===================== Control Flow ===================== */

/// Control flow state
///
/// This represents active control flow (return, break, continue, throw).
/// When control != None, the VM unwinds the stack to find the appropriate handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    None,
    Break,
    Continue,
    Return(Val),
    Throw(Val),
}

/* ===================== Frames ===================== */

/// Frame kind - the type and state of a statement being executed
#[derive(Debug, Clone)]
pub enum FrameKind {
    Block { phase: BlockPhase, idx: usize },
    If { phase: IfPhase },
    While { phase: WhilePhase },
    For {
        phase: ForPhase,
        items: Arc<Vec<Val>>,
        idx: usize,
    },
    Try { phase: TryPhase },
    /// Declarations, assignments, expression statements, return, throw,
    /// break and continue all complete in a single step
    Simple,
}

impl FrameKind {
    pub fn is_loop(&self) -> bool {
        matches!(self, FrameKind::While { .. } | FrameKind::For { .. })
    }
}

/// Execution frame - one per active statement
///
/// Each frame represents one statement being executed.
/// The frame stack replaces the system call stack, so the VM can stop between
/// any two steps.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The kind and state of this frame
    pub kind: FrameKind,

    /// Number of scopes that existed when this frame was pushed.
    /// Popping the frame truncates the environment back to this depth.
    pub scope_base: usize,

    /// The AST node (statement) this frame represents
    pub node: Arc<Stmt>,
}
