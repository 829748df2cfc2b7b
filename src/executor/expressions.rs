//! Expression evaluation
//!
//! Expressions evaluate synchronously to a value. Runtime errors are returned
//! as `Err(Val::Error(..))`; the statement that evaluated the expression turns
//! them into `Control::Throw`.

use std::collections::BTreeMap;

use super::errors::{self, error_val};
use super::stdlib::call_stdlib_func;
use super::types::values::{ensure_nested_within, ensure_nesting};
use super::types::{BinaryOp, Expr, MemberAccess, RecordVal, UnaryOp, Val};
use super::vm::VM;

/// Result of evaluating an expression: the value, or the value being thrown
pub type EvalResult = Result<Val, Val>;

/// Evaluate an expression to a value
pub fn eval_expr(expr: &Expr, vm: &VM) -> EvalResult {
    match expr {
        Expr::LitBool { v, .. } => Ok(Val::Bool(*v)),

        Expr::LitNum { v, .. } => Ok(Val::Num(*v)),

        Expr::LitStr { v, .. } => Ok(Val::Str(v.clone())),

        Expr::LitNull { .. } => Ok(Val::Null),

        Expr::LitList { elements, .. } => {
            let items = elements
                .iter()
                .map(|e| eval_expr(e, vm))
                .collect::<Result<Vec<_>, _>>()?;
            ensure_nesting(&items)?;
            Ok(Val::List(items))
        }

        Expr::LitObj { properties, .. } => {
            let mut obj = BTreeMap::new();
            for (key, _, value) in properties {
                obj.insert(key.clone(), eval_expr(value, vm)?);
            }
            ensure_nesting(obj.values())?;
            Ok(Val::Obj(obj))
        }

        Expr::Ident { name, .. } => vm.env.lookup(name).cloned().ok_or_else(|| {
            error_val(
                errors::UNDEFINED_VARIABLE,
                format!("Undefined variable '{}'", name),
            )
        }),

        Expr::Member {
            object, property, ..
        } => {
            let obj = eval_expr(object, vm)?;
            get_property(&obj, property)
        }

        Expr::Index { object, index, .. } => {
            let obj = eval_expr(object, vm)?;
            let index = eval_expr(index, vm)?;
            get_index(&obj, &index)
        }

        Expr::Call { callee, args, .. } => {
            let func = eval_expr(callee, vm)?;
            let args = args
                .iter()
                .map(|a| eval_expr(a, vm))
                .collect::<Result<Vec<_>, _>>()?;

            match func {
                Val::NativeFunc(func) => call_stdlib_func(&func, &args, &vm.writer),
                other => Err(error_val(
                    errors::NOT_CALLABLE,
                    format!("A {} value is not callable", other.kind()),
                )),
            }
        }

        Expr::BinaryOp {
            op, left, right, ..
        } => {
            let left = eval_expr(left, vm)?;

            // Short-circuit operators return one of their operands
            match op {
                BinaryOp::And if !left.is_truthy() => return Ok(left),
                BinaryOp::Or if left.is_truthy() => return Ok(left),
                BinaryOp::Nullish if left != Val::Null => return Ok(left),
                BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => return eval_expr(right, vm),
                _ => {}
            }

            let right = eval_expr(right, vm)?;
            binary_op(*op, left, right)
        }

        Expr::UnaryOp { op, operand, .. } => {
            let value = eval_expr(operand, vm)?;
            match (op, value) {
                (UnaryOp::Not, v) => Ok(Val::Bool(!v.is_truthy())),
                (UnaryOp::Neg, Val::Num(n)) => Ok(Val::Num(-n)),
                (UnaryOp::Neg, other) => Err(error_val(
                    errors::TYPE_ERROR,
                    format!("Cannot negate a {} value", other.kind()),
                )),
            }
        }

        Expr::Ternary {
            condition,
            consequent,
            alternate,
            ..
        } => {
            if eval_expr(condition, vm)?.is_truthy() {
                eval_expr(consequent, vm)
            } else {
                eval_expr(alternate, vm)
            }
        }

        Expr::New { record, fields, .. } => {
            let descriptor = vm.records.get(record).cloned().ok_or_else(|| {
                error_val(
                    errors::UNKNOWN_RECORD,
                    format!("Unknown record type '{}'", record),
                )
            })?;

            let mut values = vec![Val::Null; descriptor.fields.len()];
            for (name, _, value) in fields {
                let index = descriptor.index_of(name).ok_or_else(|| {
                    error_val(
                        errors::UNKNOWN_FIELD,
                        format!("Record '{}' has no field '{}'", record, name),
                    )
                })?;
                values[index] = eval_expr(value, vm)?;
            }

            ensure_nesting(&values)?;
            Ok(Val::Record(RecordVal { descriptor, values }))
        }
    }
}

/* ===================== Member Access ===================== */

fn property_not_found(property: &str) -> Val {
    error_val(
        errors::PROPERTY_NOT_FOUND,
        format!("Property '{}' not found", property),
    )
}

/// `object.property`
pub fn get_property(object: &Val, property: &str) -> EvalResult {
    match object {
        Val::Obj(map) => map
            .get(property)
            .cloned()
            .ok_or_else(|| property_not_found(property)),

        Val::Record(record) => record
            .get(property)
            .cloned()
            .ok_or_else(|| property_not_found(property)),

        Val::List(items) if property == "length" => Ok(Val::Num(items.len() as f64)),

        Val::Str(s) if property == "length" => Ok(Val::Num(s.chars().count() as f64)),

        Val::Error(err) => match property {
            "code" => Ok(Val::Str(err.code.clone())),
            "message" => Ok(Val::Str(err.message.clone())),
            _ => Err(property_not_found(property)),
        },

        other => Err(error_val(
            errors::TYPE_ERROR,
            format!(
                "Cannot access property '{}' on {} value",
                property,
                other.kind()
            ),
        )),
    }
}

/// Whole, in-range list index
fn list_index(index: f64, len: usize) -> Result<usize, Val> {
    if index >= 0.0 && index.fract() == 0.0 && (index as usize) < len {
        Ok(index as usize)
    } else {
        Err(error_val(
            errors::INDEX_OUT_OF_RANGE,
            format!(
                "Index {} is out of range for length {}",
                Val::Num(index),
                len
            ),
        ))
    }
}

/// `object[index]`
pub fn get_index(object: &Val, index: &Val) -> EvalResult {
    match (object, index) {
        (Val::List(items), Val::Num(i)) => Ok(items[list_index(*i, items.len())?].clone()),

        (Val::Str(s), Val::Num(i)) => {
            let len = s.chars().count();
            let i = list_index(*i, len)?;
            Ok(s.chars().nth(i).map(|c| Val::Str(c.to_string())).unwrap_or(Val::Null))
        }

        (Val::Obj(_) | Val::Record(_), Val::Str(key)) => get_property(object, key),

        (object, index) => Err(error_val(
            errors::TYPE_ERROR,
            format!(
                "Cannot index a {} value with a {}",
                object.kind(),
                index.kind()
            ),
        )),
    }
}

/* ===================== Assignment Paths ===================== */

/// One evaluated segment of an assignment target path
#[derive(Debug, Clone, PartialEq)]
pub enum PathKey {
    Prop(String),
    Index(Val),
}

/// Evaluate the index expressions of an assignment path, left to right
pub fn eval_path(path: &[MemberAccess], vm: &VM) -> Result<Vec<PathKey>, Val> {
    path.iter()
        .map(|segment| match segment {
            MemberAccess::Prop { property, .. } => Ok(PathKey::Prop(property.clone())),
            MemberAccess::Index { expr, .. } => Ok(PathKey::Index(eval_expr(expr, vm)?)),
        })
        .collect()
}

/// Store `value` at `path` inside `target`
///
/// Object properties are created on first assignment; list indices and
/// record fields must already exist.
pub fn assign_path(target: &mut Val, path: &[PathKey], value: Val) -> Result<(), Val> {
    ensure_nested_within(path.len(), [&value])?;
    store_at(target, path, value)
}

fn store_at(target: &mut Val, path: &[PathKey], value: Val) -> Result<(), Val> {
    let Some((key, rest)) = path.split_first() else {
        *target = value;
        return Ok(());
    };

    let slot = match (target, key) {
        (Val::Obj(map), PathKey::Prop(name) | PathKey::Index(Val::Str(name))) => {
            map.entry(name.clone()).or_insert(Val::Null)
        }

        (Val::Record(record), PathKey::Prop(name) | PathKey::Index(Val::Str(name))) => {
            record.get_mut(name).ok_or_else(|| property_not_found(name))?
        }

        (Val::List(items), PathKey::Index(Val::Num(i))) => {
            let i = list_index(*i, items.len())?;
            &mut items[i]
        }

        (target, PathKey::Prop(name)) => {
            return Err(error_val(
                errors::TYPE_ERROR,
                format!("Cannot set property '{}' on {} value", name, target.kind()),
            ))
        }

        (target, PathKey::Index(index)) => {
            return Err(error_val(
                errors::TYPE_ERROR,
                format!(
                    "Cannot index a {} value with a {}",
                    target.kind(),
                    index.kind()
                ),
            ))
        }
    };

    store_at(slot, rest, value)
}

/* ===================== Operators ===================== */

fn type_mismatch(op: BinaryOp, left: &Val, right: &Val) -> Val {
    error_val(
        errors::TYPE_ERROR,
        format!(
            "Operator '{}' cannot be applied to {} and {}",
            op.symbol(),
            left.kind(),
            right.kind()
        ),
    )
}

/// Apply a non-short-circuit binary operator
pub fn binary_op(op: BinaryOp, left: Val, right: Val) -> EvalResult {
    use std::cmp::Ordering;

    match op {
        BinaryOp::Eq => return Ok(Val::Bool(left == right)),
        BinaryOp::Ne => return Ok(Val::Bool(left != right)),
        _ => {}
    }

    match (op, &left, &right) {
        (BinaryOp::Add, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a + b)),
        (BinaryOp::Add, Val::Str(_), _) | (BinaryOp::Add, _, Val::Str(_)) => {
            Ok(Val::Str(format!("{}{}", left, right)))
        }
        (BinaryOp::Add, Val::List(a), Val::List(b)) => {
            Ok(Val::List(a.iter().chain(b.iter()).cloned().collect()))
        }

        (BinaryOp::Sub, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a - b)),
        (BinaryOp::Mul, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a * b)),

        (BinaryOp::Div | BinaryOp::Mod, Val::Num(_), Val::Num(b)) if *b == 0.0 => {
            Err(error_val(errors::DIVISION_BY_ZERO, "Division by zero"))
        }
        (BinaryOp::Div, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a / b)),
        (BinaryOp::Mod, Val::Num(a), Val::Num(b)) => Ok(Val::Num(a % b)),

        (BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte, _, _) => {
            let ordering = match (&left, &right) {
                (Val::Num(a), Val::Num(b)) => a.partial_cmp(b),
                (Val::Str(a), Val::Str(b)) => Some(a.cmp(b)),
                _ => return Err(type_mismatch(op, &left, &right)),
            };
            let result = match (op, ordering) {
                (_, None) => false,
                (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
                (BinaryOp::Lte, Some(o)) => o != Ordering::Greater,
                (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
                (_, Some(o)) => o != Ordering::Less,
            };
            Ok(Val::Bool(result))
        }

        _ => Err(type_mismatch(op, &left, &right)),
    }
}
