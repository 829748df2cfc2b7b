//! Core execution loop
//!
//! [`run_until_cancelled`] drives [`step`] until the frame stack is empty or the
//! token fires. [`run_until_done`] is the same loop without a token.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::errors::{self, error_val};
use super::statements::{
    execute_block, execute_for, execute_if, execute_simple, execute_try, execute_while,
};
use super::types::{Control, FrameKind, Stmt, TryPhase};
use super::vm::{pop_frame, push_stmt, set_top_kind, RunState, Step, VM};

/* ===================== Public API ===================== */

/// Run the VM until it completes
///
/// After completion, inspect `vm.control` for the final state.
pub fn run_until_done(vm: &mut VM) {
    run_until_cancelled(vm, &CancellationToken::new());
}

/// Run the VM until it completes or `cancel` fires
///
/// The token is checked before every step. A step that blocks (a native call
/// such as `time.sleep`) is never interrupted.
pub fn run_until_cancelled(vm: &mut VM, cancel: &CancellationToken) -> RunState {
    loop {
        if cancel.is_cancelled() {
            return RunState::Cancelled;
        }
        match step(vm) {
            Step::Continue => continue,
            Step::Done => return RunState::Finished,
        }
    }
}

/// Execute one step of the VM
///
/// This is the core interpreter loop. It:
/// 1. Checks for active control flow and unwinds if needed
/// 2. Gets the top frame
/// 3. Matches on frame kind and execution phase
/// 4. Executes the appropriate logic
/// 5. Either continues or signals done
pub fn step(vm: &mut VM) -> Step {
    // Check if we have active control flow (return/break/continue/throw)
    if !matches!(vm.control, Control::None) {
        return unwind(vm);
    }

    // Get top frame (if any)
    let Some(frame) = vm.frames.last() else {
        // No frames left - execution complete
        return Step::Done;
    };

    // Frame nodes are shared, so holding one does not borrow the VM
    let (kind, node) = (frame.kind.clone(), Arc::clone(&frame.node));

    match (kind, node.as_ref()) {
        (FrameKind::Block { phase, idx }, Stmt::Block { body, .. }) => {
            execute_block(vm, phase, idx, body)
        }

        (FrameKind::If { phase }, Stmt::If { .. }) => execute_if(vm, phase, &node),

        (FrameKind::While { .. }, Stmt::While { .. }) => execute_while(vm, &node),

        (FrameKind::For { phase, items, idx }, Stmt::ForLoop { .. }) => {
            execute_for(vm, phase, items, idx, &node)
        }

        (FrameKind::Try { phase }, Stmt::Try { body, .. }) => execute_try(vm, phase, body),

        (FrameKind::Simple, stmt) => execute_simple(vm, stmt),

        // push_stmt() picks the frame kind from the node, so they always agree
        (kind, stmt) => unreachable!("frame kind {:?} does not match {:?}", kind, stmt),
    }
}

/* ===================== Control Flow ===================== */

/// Unwind the stack when control flow is active
///
/// - Return pops everything: it ends the script
/// - Break pops up to and including the innermost loop
/// - Continue pops up to the innermost loop, which then runs its next iteration
/// - Throw pops up to the innermost try block that is still in its try body,
///   which switches to its catch block
fn unwind(vm: &mut VM) -> Step {
    match vm.control.clone() {
        Control::None => Step::Continue,

        Control::Return(_) => {
            while !vm.frames.is_empty() {
                pop_frame(vm);
            }
            Step::Done
        }

        Control::Break | Control::Continue => {
            let is_break = matches!(vm.control, Control::Break);
            loop {
                let Some(frame) = vm.frames.last() else {
                    let keyword = if is_break { "break" } else { "continue" };
                    vm.control = Control::Throw(error_val(
                        errors::LOOP_CONTROL,
                        format!("'{}' outside of a loop", keyword),
                    ));
                    return Step::Done;
                };

                if frame.kind.is_loop() {
                    if is_break {
                        pop_frame(vm);
                    }
                    vm.control = Control::None;
                    return Step::Continue;
                }

                pop_frame(vm);
            }
        }

        Control::Throw(error) => loop {
            let Some(frame) = vm.frames.last() else {
                // Uncaught - control stays Throw
                return Step::Done;
            };

            if let (
                FrameKind::Try {
                    phase: TryPhase::ExecuteTry,
                },
                Stmt::Try {
                    catch_var,
                    catch_body,
                    ..
                },
            ) = (&frame.kind, frame.node.as_ref())
            {
                let catch_var = catch_var.clone();
                let catch_body = Arc::new(catch_body.as_ref().clone());
                let base = frame.scope_base;

                set_top_kind(
                    vm,
                    FrameKind::Try {
                        phase: TryPhase::ExecuteCatch,
                    },
                );
                vm.env.truncate(base);
                vm.env.push_scope();
                vm.env.declare(catch_var, error, true);
                vm.control = Control::None;
                vm.fault_span = None;

                push_stmt(vm, catch_body);
                return Step::Continue;
            }

            pop_frame(vm);
        },
    }
}
