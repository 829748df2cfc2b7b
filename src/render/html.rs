//! HTML rendering for the output panel
//!
//! Each section becomes a `<div class="output-section">`. The document carries
//! its own stylesheet so a web view can load it as-is.

use super::node::{RenderNode, Section, Table};

const STYLESHEET: &str = r#"
body { font-family: -apple-system, system-ui, sans-serif; }
* { box-sizing: border-box; }
.output-section {
    margin-bottom: 1rem;
    padding-left: 6px;
    box-shadow: -2px 0 0 0 rgba(175, 82, 222, 0.25);
}
.output-section:hover { box-shadow: -4px 0 0 0 rgba(175, 82, 222, 0.5); }
.output-section.error { box-shadow: -2px 0 0 0 rgba(222, 82, 82, 0.6); }
table { border-collapse: collapse; margin-bottom: 1rem; border: solid 1px lightgray; }
table caption { margin-bottom: 0.5em; }
table th { font-weight: bold; text-align: center; padding: 8px; border-bottom: solid 1px lightgray; }
table th:not(:last-child) { border-right: solid 1px lightgray; }
table td { padding: 8px; }
table tr:nth-child(even) { background-color: rgba(0, 0, 0, 0.065); }
code, pre { font-family: ui-monospace, monospace; }
"#;

/// Render a complete output document
pub fn render_document(sections: &[Section]) -> String {
    let mut body = String::new();
    for section in sections {
        body.push_str(&render_section(section));
    }
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>{}</style></head><body>{}</body></html>",
        STYLESHEET, body
    )
}

pub fn render_section(section: &Section) -> String {
    match section {
        Section::Value(node) => {
            format!("<div class=\"output-section\">{}</div>", render_node(node))
        }
        Section::Error(description) => format!(
            "<div class=\"output-section error\"><pre>{}</pre></div>",
            escape(description)
        ),
    }
}

pub fn render_node(node: &RenderNode) -> String {
    match node {
        RenderNode::Null => "<p><code>null</code></p>".to_string(),
        RenderNode::Text(text) => format!("<p>{}</p>", escape(text)),
        RenderNode::Table(table) => render_table(table),
    }
}

fn render_table(table: &Table) -> String {
    let mut out = String::from("<table>");
    out.push_str(&format!("<caption>{}</caption>", escape(&table.caption)));

    out.push_str("<thead><tr>");
    for column in &table.columns {
        out.push_str(&format!("<th>{}</th>", escape(column)));
    }
    out.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let content = match cell {
                RenderNode::Text(text) => escape(text),
                other => render_node(other),
            };
            out.push_str(&format!("<td>{}</td>", content));
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table>");
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
