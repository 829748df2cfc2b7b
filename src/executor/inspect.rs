//! How script values look to the renderer

use crate::render::{ElementKind, Inspect, SequenceView, Shape, TypeName};

use super::types::values::element_type;
use super::types::Val;

impl Inspect for Val {
    fn shape(&self) -> Shape<'_> {
        match self {
            Val::Null => Shape::Null,
            Val::Bool(_) | Val::Num(_) | Val::Str(_) | Val::Error(_) => Shape::Scalar,
            Val::Record(record) => Shape::Structured(record.descriptor.clone()),
            Val::List(items) => match list_element_kind(items) {
                Some(element) => Shape::Sequence(SequenceView {
                    type_name: self.type_name(),
                    element_type: element_type(items),
                    element,
                    items: items.iter().map(|item| item as &dyn Inspect).collect(),
                }),
                None => Shape::Opaque,
            },
            Val::Obj(_) | Val::NativeFunc(_) => Shape::Opaque,
        }
    }

    fn string_form(&self) -> String {
        self.to_string()
    }

    fn field(&self, index: usize) -> Option<&dyn Inspect> {
        match self {
            Val::Record(record) => record.values.get(index).map(|v| v as &dyn Inspect),
            _ => None,
        }
    }
}

/// Element kind of a list that renders as a table
///
/// Nulls are allowed anywhere. The other items must all be scalars of one
/// type, records of one type, or lists. Anything else (mixed items, plain
/// objects) is not tabular.
fn list_element_kind(items: &[Val]) -> Option<ElementKind> {
    let mut present = items.iter().filter(|v| !matches!(v, Val::Null));

    let Some(first) = present.next() else {
        return Some(ElementKind::Scalar);
    };

    match first {
        Val::Bool(_) | Val::Num(_) | Val::Str(_) => {
            let kind = std::mem::discriminant(first);
            present
                .all(|v| std::mem::discriminant(v) == kind)
                .then_some(ElementKind::Scalar)
        }
        Val::Record(record) => {
            let name: &TypeName = record.type_name();
            present
                .all(|v| matches!(v, Val::Record(r) if r.type_name() == name))
                .then(|| ElementKind::Structured(record.descriptor.clone()))
        }
        Val::List(_) => present
            .all(|v| matches!(v, Val::List(_)))
            .then_some(ElementKind::Sequence),
        _ => None,
    }
}
