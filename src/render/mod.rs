//! Value to display-tree conversion
//!
//! [`render`] turns anything implementing [`Inspect`] into a [`RenderNode`]:
//!
//! 1. null values become [`RenderNode::Null`]
//! 2. scalars become [`RenderNode::Text`] with their string form
//! 3. homogeneous sequences become tables: one text column for scalar elements,
//!    one column per visible descriptor field for structured elements (cells are
//!    rendered recursively), one column of nested renders for sequence elements
//! 4. everything else falls back to its string form
//!
//! Rendering is total and keeps no state between calls. Tables nest at most
//! [`MAX_DEPTH`] levels; anything deeper becomes text, cut to [`MAX_TEXT`]
//! characters.

pub mod html;
mod inspect;
mod node;
mod primitives;
pub mod text;

pub use inspect::{
    Descriptor, DescriptorCell, DisplayType, ElementKind, FieldDescriptor, Inspect, SequenceView,
    Shape, TypeName,
};
pub use node::{RenderNode, Section, Table};

/// Deepest table nesting in a display tree
pub const MAX_DEPTH: usize = 32;

/// Longest text fallback, in characters, for values below [`MAX_DEPTH`]
pub const MAX_TEXT: usize = 200;

/// Convert a value to its display tree
pub fn render(value: &dyn Inspect) -> RenderNode {
    render_at(value, 0)
}

fn render_at(value: &dyn Inspect, depth: usize) -> RenderNode {
    match value.shape() {
        Shape::Null => RenderNode::Null,
        Shape::Sequence(_) if depth >= MAX_DEPTH => {
            RenderNode::Text(truncate(value.string_form(), MAX_TEXT))
        }
        Shape::Sequence(sequence) => render_sequence(sequence, depth),
        Shape::Scalar | Shape::Structured(_) | Shape::Opaque => {
            RenderNode::Text(value.string_form())
        }
    }
}

fn truncate(mut text: String, max_chars: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max_chars) {
        text.truncate(cut);
        text.push_str("...");
    }
    text
}

fn render_sequence(sequence: SequenceView<'_>, depth: usize) -> RenderNode {
    let cell = |item: &dyn Inspect| render_at(item, depth + 1);

    let caption = sequence.type_name.to_string();

    let (columns, rows) = match &sequence.element {
        // Scalar and nested elements both render in a single column
        ElementKind::Scalar | ElementKind::Sequence => (
            vec![sequence.element_type.to_string()],
            sequence
                .items
                .iter()
                .map(|item| vec![cell(*item)])
                .collect(),
        ),
        ElementKind::Structured(descriptor) => (
            descriptor
                .visible()
                .map(|(_, field)| field.header().to_string())
                .collect(),
            sequence
                .items
                .iter()
                .map(|item| {
                    descriptor
                        .visible()
                        .map(|(index, _)| item.field(index).map_or(RenderNode::Null, cell))
                        .collect()
                })
                .collect(),
        ),
    };

    RenderNode::Table(Table {
        caption,
        columns,
        rows,
    })
}
