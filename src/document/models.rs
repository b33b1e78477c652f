//! Core data structures for document representation
//!
//! This module defines the element model that every other stage works
//! against. A parsed document is an ordered sequence of elements; order is
//! significant and is preserved end-to-end through extraction,
//! transformation, and reassembly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One structural unit of a document.
///
/// The enum is deliberately closed: the extractor, codec, reassembler, and
/// differ all match on it exhaustively, so adding a new element kind forces
/// an update at each of those sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentElement {
    /// A paragraph's content. May contain embedded paragraph breaks as
    /// blank-line (`\n\n`) separators.
    Text { text: String },
    /// A table as a rectangular grid of trimmed strings. Every row has
    /// exactly `columns.len()` cells; header names are non-empty and
    /// unique after disambiguation.
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// An embedded picture, referenced by the path it was extracted to,
    /// with the text of a following caption-styled paragraph if one exists.
    Image {
        image_path: PathBuf,
        caption: Option<String>,
    },
}

/// Discriminant for [`DocumentElement`], used by the differ and in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Text,
    Table,
    Image,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Text => write!(f, "text"),
            ElementKind::Table => write!(f, "table"),
            ElementKind::Image => write!(f, "image"),
        }
    }
}

impl DocumentElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            DocumentElement::Text { .. } => ElementKind::Text,
            DocumentElement::Table { .. } => ElementKind::Table,
            DocumentElement::Image { .. } => ElementKind::Image,
        }
    }

    /// Plain-text rendering used in change reports.
    pub fn preview(&self) -> String {
        match self {
            DocumentElement::Text { text } => text.clone(),
            DocumentElement::Table { columns, rows } => {
                format!("table {} rows x {} columns", rows.len(), columns.len())
            }
            DocumentElement::Image { image_path, .. } => {
                format!("image {}", image_path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind() {
        let text = DocumentElement::Text {
            text: "hello".to_string(),
        };
        let table = DocumentElement::Table {
            columns: vec!["A".to_string()],
            rows: vec![],
        };
        assert_eq!(text.kind(), ElementKind::Text);
        assert_eq!(table.kind(), ElementKind::Table);
        assert_eq!(ElementKind::Table.to_string(), "table");
    }
}
