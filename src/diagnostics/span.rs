//! Source spans and the zero-length expansion rule

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Expand a zero-length span so it covers one displayable character.
///
/// The end moves forward by one character when that stays inside the source,
/// otherwise the start moves back by one. Offsets are clamped to the source
/// and snapped to character boundaries first, so the result can always be used
/// to slice `source`. An empty source yields the empty span `(0, 0)`.
pub fn normalize_span(span: SourceSpan, source: &str) -> SourceSpan {
    let len = source.len();
    let start = floor_char_boundary(source, span.start.min(len));
    let end = floor_char_boundary(source, span.end.min(len)).max(start);

    if start != end {
        return SourceSpan::new(start, end);
    }

    if end < len {
        let width = source[end..].chars().next().map_or(1, char::len_utf8);
        SourceSpan::new(start, end + width)
    } else if start > 0 {
        let width = source[..start].chars().next_back().map_or(1, char::len_utf8);
        SourceSpan::new(start - width, end)
    } else {
        SourceSpan::new(start, end)
    }
}

/// Convert a byte offset to a 0-indexed (line, column) pair
///
/// Columns count characters, not bytes.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    let mut current_offset = 0;

    for ch in source.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

fn floor_char_boundary(source: &str, mut idx: usize) -> usize {
    while idx > 0 && !source.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
