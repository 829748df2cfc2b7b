//! Runtime values

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::super::errors::{self, error_val, ErrorInfo};
use super::super::stdlib::StdlibFunc;
use crate::render::{Descriptor, TypeName};

/// Deepest list, object and record nesting a value may reach
///
/// The VM refuses to build anything deeper, so recursive walks over a value
/// (clone, drop, display, render) stay well inside a worker thread's stack.
pub const MAX_NESTING: usize = 64;

/// Runtime value
///
/// Values have copy semantics: reading a variable clones it, and mutation
/// through an assignment path only touches the assigned binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<Val>),
    Obj(BTreeMap<String, Val>),
    Record(RecordVal),
    NativeFunc(StdlibFunc),
    Error(ErrorInfo),
}

/// Instance of a script-declared record type
///
/// `values` is parallel to `descriptor.fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordVal {
    pub descriptor: Arc<Descriptor>,
    pub values: Vec<Val>,
}

impl RecordVal {
    pub fn type_name(&self) -> &TypeName {
        &self.descriptor.type_name
    }

    pub fn get(&self, field: &str) -> Option<&Val> {
        self.descriptor
            .index_of(field)
            .and_then(|i| self.values.get(i))
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Val> {
        let index = self.descriptor.index_of(field)?;
        self.values.get_mut(index)
    }
}

impl Val {
    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Null => false,
            Val::Bool(b) => *b,
            Val::Num(n) => *n != 0.0 && !n.is_nan(),
            Val::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Short name of the value's kind, used in runtime error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Val::Null => "null",
            Val::Bool(_) => "bool",
            Val::Num(_) => "number",
            Val::Str(_) => "string",
            Val::List(_) => "list",
            Val::Obj(_) => "object",
            Val::Record(_) => "record",
            Val::NativeFunc(_) => "function",
            Val::Error(_) => "error",
        }
    }

    /// Levels of container nesting; 0 for scalars
    pub fn nesting(&self) -> usize {
        match self {
            Val::List(items) => container_nesting(items.iter()),
            Val::Obj(map) => container_nesting(map.values()),
            Val::Record(record) => container_nesting(record.values.iter()),
            _ => 0,
        }
    }

    /// Display type of the value as shown in table captions
    pub fn type_name(&self) -> TypeName {
        self.type_name_at(0)
    }

    fn type_name_at(&self, depth: usize) -> TypeName {
        match self {
            Val::Null => TypeName::new("Null"),
            Val::Bool(_) => TypeName::new("Bool"),
            Val::Num(_) => TypeName::new("Number"),
            Val::Str(_) => TypeName::new("String"),
            Val::List(items) => TypeName::generic("List", vec![element_type_at(items, depth + 1)]),
            Val::Obj(_) => TypeName::new("Object"),
            Val::Record(record) => record.type_name().clone(),
            Val::NativeFunc(_) => TypeName::new("Function"),
            Val::Error(_) => TypeName::new("Error"),
        }
    }
}

fn container_nesting<'a>(children: impl Iterator<Item = &'a Val>) -> usize {
    1 + children.map(Val::nesting).max().unwrap_or(0)
}

/// Fail when a container holding `children` would nest deeper than [`MAX_NESTING`]
pub(crate) fn ensure_nesting<'a>(children: impl IntoIterator<Item = &'a Val>) -> Result<(), Val> {
    ensure_nested_within(1, children)
}

/// Like [`ensure_nesting`], for children stored `levels` containers down
pub(crate) fn ensure_nested_within<'a>(
    levels: usize,
    children: impl IntoIterator<Item = &'a Val>,
) -> Result<(), Val> {
    let deepest = children.into_iter().map(Val::nesting).max().unwrap_or(0);
    if levels + deepest > MAX_NESTING {
        return Err(error_val(
            errors::NESTING_TOO_DEEP,
            format!("Values cannot nest more than {} levels deep", MAX_NESTING),
        ));
    }
    Ok(())
}

/// Common type of the non-null items of a list, `Any` when they disagree
pub(crate) fn element_type(items: &[Val]) -> TypeName {
    element_type_at(items, 0)
}

fn element_type_at(items: &[Val], depth: usize) -> TypeName {
    if depth > MAX_NESTING {
        return TypeName::new("Any");
    }
    let mut names = items
        .iter()
        .filter(|v| !matches!(v, Val::Null))
        .map(|v| v.type_name_at(depth));

    let Some(first) = names.next() else {
        return TypeName::new("Any");
    };
    if names.all(|name| name == first) {
        first
    } else {
        TypeName::new("Any")
    }
}

/* ===================== String Form ===================== */

/// Integers print without a fractional part
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Nested strings are quoted so `["a, b"]` and `["a", "b"]` read differently
fn fmt_nested(val: &Val, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    match val {
        Val::Str(s) => write!(f, "{:?}", s),
        other => fmt_at(other, f, depth),
    }
}

/// Containers at [`MAX_NESTING`] and below print as `[...]`
fn fmt_at(val: &Val, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let elided = depth >= MAX_NESTING;
    match val {
        Val::Null => f.write_str("null"),
        Val::Bool(b) => write!(f, "{}", b),
        Val::Num(n) => f.write_str(&format_number(*n)),
        Val::Str(s) => f.write_str(s),
        Val::List(_) if elided => f.write_str("[...]"),
        Val::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_nested(item, f, depth + 1)?;
            }
            f.write_str("]")
        }
        Val::Obj(map) if map.is_empty() => f.write_str("{}"),
        Val::Obj(_) if elided => f.write_str("{ ... }"),
        Val::Obj(map) => {
            f.write_str("{ ")?;
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ", key)?;
                fmt_nested(value, f, depth + 1)?;
            }
            f.write_str(" }")
        }
        Val::Record(record) if elided => write!(f, "{} {{ ... }}", record.type_name()),
        Val::Record(record) => {
            write!(f, "{} {{", record.type_name())?;
            let mut first = true;
            for (index, field) in record.descriptor.visible() {
                f.write_str(if first { " " } else { ", " })?;
                first = false;
                write!(f, "{}: ", field.name)?;
                match record.values.get(index) {
                    Some(value) => fmt_nested(value, f, depth + 1)?,
                    None => f.write_str("null")?,
                }
            }
            f.write_str(if first { "}" } else { " }" })
        }
        Val::NativeFunc(func) => write!(f, "<function {}>", func.name()),
        Val::Error(err) => write!(f, "{}", err),
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_at(self, f, 0)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Num(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Str(s.to_string())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::Str(s)
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}
