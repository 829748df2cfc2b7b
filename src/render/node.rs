//! Display tree produced from dumped values

use serde::{Deserialize, Serialize};

/// Generic display-tree unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum RenderNode {
    Null,
    Text(String),
    Table(Table),
}

/// A captioned table whose cells are themselves render nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub caption: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RenderNode>>,
}

impl RenderNode {
    pub fn text(value: impl Into<String>) -> Self {
        RenderNode::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RenderNode::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            RenderNode::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// One top-level block of the output panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Section {
    /// Produced by one dump call
    Value(RenderNode),
    /// Full description of the failure that ended a run
    Error(String),
}

impl Section {
    pub fn is_error(&self) -> bool {
        matches!(self, Section::Error(_))
    }

    pub fn node(&self) -> Option<&RenderNode> {
        match self {
            Section::Value(node) => Some(node),
            Section::Error(_) => None,
        }
    }
}
