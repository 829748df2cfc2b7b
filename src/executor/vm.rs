//! Virtual Machine state
//!
//! The VM holds all execution state:
//! - frames: Stack of active statements
//! - control: Current control flow state (return, break, etc.)
//! - env: Lexical scopes, innermost last
//! - records: Descriptors of the script's record types
//! - writer: Where `Cauldron.dump` sends rendered values

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{
    BlockPhase, Control, ForPhase, Frame, FrameKind, IfPhase, Span, Stmt, TryPhase, Val,
    WhilePhase,
};
use crate::host::Writer;
use crate::render::Descriptor;

/* ===================== Environment ===================== */

/// A variable slot
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Val,
    /// `let` bindings are mutable; `const` bindings and globals are not
    pub mutable: bool,
}

/// Stack of lexical scopes
///
/// The first scope holds the globals and is never popped.
#[derive(Debug, Clone)]
pub struct Env {
    scopes: Vec<HashMap<String, Binding>>,
}

impl Env {
    pub fn new(globals: Vec<(String, Val)>) -> Self {
        let root = globals
            .into_iter()
            .map(|(name, value)| {
                (
                    name,
                    Binding {
                        value,
                        mutable: false,
                    },
                )
            })
            .collect();
        Self { scopes: vec![root] }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Drop every scope above `depth` (the root scope always survives)
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    /// Declare in the innermost scope, replacing an earlier declaration there
    pub fn declare(&mut self, name: impl Into<String>, value: Val, mutable: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), Binding { value, mutable });
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Val> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(|binding| &binding.value)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }
}

/* ===================== VM ===================== */

/// Virtual Machine state
///
/// This contains everything needed to execute a program one step at a time.
pub struct VM {
    /// Stack of execution frames
    pub frames: Vec<Frame>,

    /// Current control flow state
    pub control: Control,

    /// Variable scopes
    pub env: Env,

    /// Record descriptors by type name, shared by every instance
    pub records: HashMap<String, Arc<Descriptor>>,

    /// Destination of dumped values
    pub writer: Writer,

    /// Statement that raised the pending throw, if any
    pub fault_span: Option<Span>,
}

impl VM {
    /// Create a new VM with a program
    ///
    /// The program is wrapped in a root frame; nothing runs until the VM is stepped.
    pub fn new(
        program: Stmt,
        globals: Vec<(String, Val)>,
        records: HashMap<String, Arc<Descriptor>>,
        writer: Writer,
    ) -> Self {
        let mut vm = VM {
            frames: vec![],
            control: Control::None,
            env: Env::new(globals),
            records,
            writer,
            fault_span: None,
        };

        // Push initial frame for the program
        push_stmt(&mut vm, Arc::new(program));

        vm
    }

    /// Text shown for a throw that escaped the program
    pub fn describe_fault(&self, thrown: &Val) -> String {
        let what = match thrown {
            Val::Error(err) => err.to_string(),
            other => format!("Uncaught exception: {}", other),
        };
        match self.fault_span {
            Some(span) => format!(
                "{} (line {}, column {})",
                what,
                span.start_line + 1,
                span.start_col + 1
            ),
            None => what,
        }
    }
}

/* ===================== Frame Management ===================== */

/// Push a new frame for a statement onto the stack
///
/// This determines the initial phase based on the statement type.
pub fn push_stmt(vm: &mut VM, stmt: Arc<Stmt>) {
    let kind = match stmt.as_ref() {
        Stmt::Block { .. } => FrameKind::Block {
            phase: BlockPhase::Enter,
            idx: 0,
        },
        Stmt::If { .. } => FrameKind::If {
            phase: IfPhase::Eval,
        },
        Stmt::While { .. } => FrameKind::While {
            phase: WhilePhase::Check,
        },
        Stmt::ForLoop { .. } => FrameKind::For {
            phase: ForPhase::Eval,
            items: Arc::new(Vec::new()),
            idx: 0,
        },
        Stmt::Try { .. } => FrameKind::Try {
            phase: TryPhase::Enter,
        },
        _ => FrameKind::Simple,
    };

    vm.frames.push(Frame {
        kind,
        scope_base: vm.env.depth(),
        node: stmt,
    });
}

/// Pop the top frame and drop the scopes it opened
pub fn pop_frame(vm: &mut VM) {
    if let Some(frame) = vm.frames.pop() {
        vm.env.truncate(frame.scope_base);
    }
}

/// Replace the state of the top frame
pub fn set_top_kind(vm: &mut VM, kind: FrameKind) {
    if let Some(frame) = vm.frames.last_mut() {
        frame.kind = kind;
    }
}

/// Start unwinding with a thrown value raised by `span`
pub fn throw(vm: &mut VM, error: Val, span: Span) {
    vm.control = Control::Throw(error);
    vm.fault_span = Some(span);
}

/* ===================== Step Result ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue to next step
    Continue,
    /// Execution complete
    Done,
}

/// How a cancellable run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No frames left; inspect `vm.control` for the final state
    Finished,
    /// The cancellation token fired between two steps
    Cancelled,
}
