//! Statement execution handlers
//!
//! Each statement type has its own handler function that processes
//! the statement based on its current execution phase.

use std::sync::Arc;

use super::errors::{self, error_val};
use super::expressions::{assign_path, eval_expr, eval_path};
use super::types::{
    BlockPhase, Control, ForLoopKind, ForPhase, FrameKind, IfPhase, Stmt, TryPhase, Val, VarKind,
};
use super::vm::{pop_frame, push_stmt, set_top_kind, throw, Step, VM};

/* ===================== Statement Handlers ===================== */

/// Execute Block statement
pub fn execute_block(vm: &mut VM, phase: BlockPhase, idx: usize, body: &[Stmt]) -> Step {
    match phase {
        BlockPhase::Enter => {
            vm.env.push_scope();
            set_top_kind(
                vm,
                FrameKind::Block {
                    phase: BlockPhase::Execute,
                    idx: 0,
                },
            );
            Step::Continue
        }

        BlockPhase::Execute => {
            // Check if we've finished all statements in the block
            let Some(child) = body.get(idx) else {
                pop_frame(vm);
                return Step::Continue;
            };

            // Point our frame at the next statement, then run this one
            set_top_kind(
                vm,
                FrameKind::Block {
                    phase: BlockPhase::Execute,
                    idx: idx + 1,
                },
            );
            push_stmt(vm, Arc::new(child.clone()));

            Step::Continue
        }
    }
}

/// Execute If statement
pub fn execute_if(vm: &mut VM, phase: IfPhase, stmt: &Stmt) -> Step {
    let Stmt::If {
        test,
        then_s,
        else_s,
        ..
    } = stmt
    else {
        unreachable!("execute_if called with {:?}", stmt);
    };

    match phase {
        IfPhase::Eval => {
            let cond = match eval_expr(test, vm) {
                Ok(v) => v,
                Err(error) => {
                    throw(vm, error, stmt.span());
                    return Step::Continue;
                }
            };

            set_top_kind(
                vm,
                FrameKind::If {
                    phase: IfPhase::Done,
                },
            );
            if cond.is_truthy() {
                push_stmt(vm, Arc::new(then_s.as_ref().clone()));
            } else if let Some(else_s) = else_s {
                push_stmt(vm, Arc::new(else_s.as_ref().clone()));
            }
            Step::Continue
        }

        IfPhase::Done => {
            pop_frame(vm);
            Step::Continue
        }
    }
}

/// Execute While statement
///
/// The frame stays on the stack while the body runs and re-checks the test
/// once the body is popped.
pub fn execute_while(vm: &mut VM, stmt: &Stmt) -> Step {
    let Stmt::While { test, body, .. } = stmt else {
        unreachable!("execute_while called with {:?}", stmt);
    };

    match eval_expr(test, vm) {
        Ok(cond) if cond.is_truthy() => push_stmt(vm, Arc::new(body.as_ref().clone())),
        Ok(_) => pop_frame(vm),
        Err(error) => throw(vm, error, stmt.span()),
    }
    Step::Continue
}

/// Execute For loop (`for (let v of xs)` and `for (let k in obj)`)
pub fn execute_for(
    vm: &mut VM,
    phase: ForPhase,
    items: Arc<Vec<Val>>,
    idx: usize,
    stmt: &Stmt,
) -> Step {
    let Stmt::ForLoop {
        kind,
        var_kind,
        binding,
        iterable,
        body,
        ..
    } = stmt
    else {
        unreachable!("execute_for called with {:?}", stmt);
    };

    match phase {
        ForPhase::Eval => {
            let items = eval_expr(iterable, vm).and_then(|v| iteration_items(*kind, v));
            match items {
                Ok(items) => set_top_kind(
                    vm,
                    FrameKind::For {
                        phase: ForPhase::Iterate,
                        items: Arc::new(items),
                        idx: 0,
                    },
                ),
                Err(error) => throw(vm, error, stmt.span()),
            }
            Step::Continue
        }

        ForPhase::Iterate => {
            let Some(item) = items.get(idx).cloned() else {
                pop_frame(vm);
                return Step::Continue;
            };

            // Fresh scope per iteration holding only the loop variable
            let base = vm.frames.last().map_or(vm.env.depth(), |f| f.scope_base);
            vm.env.truncate(base);
            vm.env.push_scope();
            vm.env
                .declare(binding.clone(), item, *var_kind == VarKind::Let);

            set_top_kind(
                vm,
                FrameKind::For {
                    phase: ForPhase::Iterate,
                    items,
                    idx: idx + 1,
                },
            );
            push_stmt(vm, Arc::new(body.as_ref().clone()));
            Step::Continue
        }
    }
}

/// Values visited by a for loop
///
/// - `of`: list elements, or the characters of a string
/// - `in`: list/string indices, object keys, or record field names
fn iteration_items(kind: ForLoopKind, iterable: Val) -> Result<Vec<Val>, Val> {
    let indices = |len: usize| (0..len).map(|i| Val::Num(i as f64)).collect();

    match (kind, iterable) {
        (ForLoopKind::Of, Val::List(items)) => Ok(items),
        (ForLoopKind::Of, Val::Str(s)) => Ok(s.chars().map(|c| Val::Str(c.to_string())).collect()),
        (ForLoopKind::In, Val::List(items)) => Ok(indices(items.len())),
        (ForLoopKind::In, Val::Str(s)) => Ok(indices(s.chars().count())),
        (ForLoopKind::In, Val::Obj(map)) => Ok(map.into_keys().map(Val::Str).collect()),
        (ForLoopKind::In, Val::Record(record)) => Ok(record
            .descriptor
            .fields
            .iter()
            .map(|f| Val::Str(f.name.clone()))
            .collect()),
        (kind, other) => {
            let keyword = match kind {
                ForLoopKind::Of => "of",
                ForLoopKind::In => "in",
            };
            Err(error_val(
                errors::NOT_ITERABLE,
                format!("Cannot iterate '{}' over a {} value", keyword, other.kind()),
            ))
        }
    }
}

/// Execute Try statement
///
/// Reaching this handler after the try or catch block finished means it
/// completed normally. Thrown values are routed to the catch block by unwind().
pub fn execute_try(vm: &mut VM, phase: TryPhase, body: &Stmt) -> Step {
    match phase {
        TryPhase::Enter => {
            set_top_kind(
                vm,
                FrameKind::Try {
                    phase: TryPhase::ExecuteTry,
                },
            );
            push_stmt(vm, Arc::new(body.clone()));
        }
        TryPhase::ExecuteTry | TryPhase::ExecuteCatch => pop_frame(vm),
    }
    Step::Continue
}

/// Execute a statement that completes in one step
pub fn execute_simple(vm: &mut VM, stmt: &Stmt) -> Step {
    if let Err(error) = run_simple(vm, stmt) {
        // Leave the frame in place; unwinding pops it
        throw(vm, error, stmt.span());
    }
    Step::Continue
}

fn run_simple(vm: &mut VM, stmt: &Stmt) -> Result<(), Val> {
    match stmt {
        Stmt::Declare {
            var_kind,
            name,
            init,
            ..
        } => {
            let value = match init {
                Some(expr) => eval_expr(expr, vm)?,
                None => Val::Null,
            };
            vm.env
                .declare(name.clone(), value, *var_kind == VarKind::Let);
        }

        Stmt::Assign {
            var, path, value, ..
        } => {
            let value = eval_expr(value, vm)?;
            let keys = eval_path(path, vm)?;

            let Some(binding) = vm.env.lookup_mut(var) else {
                return Err(error_val(
                    errors::UNDEFINED_VARIABLE,
                    format!("Assignment to undeclared variable '{}'", var),
                ));
            };
            if keys.is_empty() && !binding.mutable {
                return Err(error_val(
                    errors::CONST_ASSIGNMENT,
                    format!("Cannot assign to '{}' because it is a constant", var),
                ));
            }
            assign_path(&mut binding.value, &keys, value)?;
        }

        Stmt::Expr { expr, .. } => {
            eval_expr(expr, vm)?;
        }

        Stmt::Return { value, .. } => {
            let value = match value {
                Some(expr) => eval_expr(expr, vm)?,
                None => Val::Null,
            };
            vm.control = Control::Return(value);
        }

        Stmt::Throw { value, .. } => {
            return Err(eval_expr(value, vm)?);
        }

        Stmt::Break { .. } => vm.control = Control::Break,

        Stmt::Continue { .. } => vm.control = Control::Continue,

        other => unreachable!("{:?} is not a single-step statement", other),
    }

    pop_frame(vm);
    Ok(())
}
