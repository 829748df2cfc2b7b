//! Plain-text rendering for terminals

use super::node::{RenderNode, Section, Table};

/// Render one node; tables are boxed and may span several lines
pub fn render_node(node: &RenderNode) -> String {
    match node {
        RenderNode::Null => "null".to_string(),
        RenderNode::Text(text) => text.clone(),
        RenderNode::Table(table) => render_table(table),
    }
}

pub fn render_section(section: &Section) -> String {
    match section {
        Section::Value(node) => render_node(node),
        Section::Error(description) => description
            .lines()
            .map(|line| format!("! {}", line))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render sections separated by blank lines
pub fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_table(table: &Table) -> String {
    let header: Vec<Vec<String>> = table.columns.iter().map(|c| vec![c.clone()]).collect();
    let body: Vec<Vec<Vec<String>>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| render_node(cell).lines().map(str::to_string).collect())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            let cell_width = cell.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            *width = (*width).max(cell_width);
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = String::new();
    out.push_str(&table.caption);
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    write_row(&mut out, &header, &widths);
    out.push_str(&border);
    for row in &body {
        out.push('\n');
        write_row(&mut out, row, &widths);
        out.push_str(&border);
    }
    out
}

fn write_row(out: &mut String, cells: &[Vec<String>], widths: &[usize]) {
    let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
    for line in 0..height {
        out.push('|');
        for (i, width) in widths.iter().enumerate() {
            let text = cells
                .get(i)
                .and_then(|cell| cell.get(line))
                .map(String::as_str)
                .unwrap_or("");
            out.push_str(&format!(" {:<width$} |", text, width = width));
        }
        out.push('\n');
    }
}
