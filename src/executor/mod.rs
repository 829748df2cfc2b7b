//! Stepping interpreter for cauldron script
//!
//! Execution is a frame stack instead of native recursion: every statement
//! being executed owns a frame, and [`step`] advances the top frame by one
//! phase. The driver checks its cancellation token between steps, which is
//! what makes a run cooperatively cancellable.
//!
//! ## Module Organization
//! - `types/` - AST, values, control flow and frames
//! - `vm` - VM state, environment and frame management
//! - `exec_loop` - step(), unwinding and the run drivers
//! - `statements` / `expressions` - evaluation
//! - `stdlib/` - `Cauldron.dump` and the importable modules
//! - `engine` - [`Interpreter`], the host-facing engine

pub mod engine;
pub mod errors;
pub mod exec_loop;
pub mod expressions;
mod inspect;
pub mod statements;
pub mod stdlib;
pub mod types;
pub mod vm;

// Re-export main API
pub use engine::{CompiledScript, Interpreter};
pub use errors::ErrorInfo;
pub use exec_loop::{run_until_cancelled, run_until_done, step};
pub use stdlib::StdlibFunc;
pub use types::{Control, Expr, Frame, FrameKind, RecordVal, Stmt, Val};
pub use vm::{RunState, Step, VM};

#[cfg(test)]
mod tests;
