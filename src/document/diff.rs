//! Structural comparison of element sequences
//!
//! Compares the original and refined element sequences position by
//! position and produces a change report: tallies, a human-readable
//! summary, and per-element change records for display layers.

use serde::{Deserialize, Serialize};

use super::models::{DocumentElement, ElementKind};

/// Report of what changed between an original and a refined sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeReport {
    pub text_changes: usize,
    pub table_changes: usize,
    pub total_elements: usize,
    pub changed_elements: usize,
    pub summary: String,
    /// Per-element detail for changed positions. Empty when the sequences
    /// differ in length, since no per-element comparison is performed then.
    pub changes: Vec<ElementChange>,
}

impl ChangeReport {
    pub fn is_unchanged(&self) -> bool {
        self.changed_elements == 0
    }
}

/// One changed element position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementChange {
    pub index: usize,
    pub kind: ElementKind,
    pub original: String,
    pub refined: String,
    /// Short human note about the nature of the change.
    pub note: String,
}

/// Compare two element sequences.
///
/// Sequences of different lengths short-circuit: every position counts as
/// changed and no per-element comparison is attempted. Otherwise elements
/// are compared pairwise by position; text is compared with whitespace
/// collapsed, tables cell by cell (counted once per table however many
/// cells differ), and images are treated as structurally equal.
pub fn compare(original: &[DocumentElement], refined: &[DocumentElement]) -> ChangeReport {
    if original.len() != refined.len() {
        let total = original.len().max(refined.len());
        return ChangeReport {
            text_changes: 0,
            table_changes: 0,
            total_elements: total,
            changed_elements: total,
            summary: format!(
                "Document structure changed: element count went from {} to {}.",
                original.len(),
                refined.len()
            ),
            changes: Vec::new(),
        };
    }

    let mut text_changes = 0;
    let mut table_changes = 0;
    let mut changes = Vec::new();

    for (index, (before, after)) in original.iter().zip(refined).enumerate() {
        let changed = match (before, after) {
            (DocumentElement::Text { text: a }, DocumentElement::Text { text: b }) => {
                if normalize_whitespace(a) != normalize_whitespace(b) {
                    text_changes += 1;
                    true
                } else {
                    false
                }
            }
            (
                DocumentElement::Table {
                    columns: ca,
                    rows: ra,
                },
                DocumentElement::Table {
                    columns: cb,
                    rows: rb,
                },
            ) => {
                if table_differs(ca, ra, cb, rb) {
                    table_changes += 1;
                    true
                } else {
                    false
                }
            }
            (DocumentElement::Image { .. }, DocumentElement::Image { .. }) => false,
            // Differing kinds at the same position: changed, no deeper look.
            _ => true,
        };

        if changed {
            changes.push(ElementChange {
                index,
                kind: before.kind(),
                original: before.preview(),
                refined: after.preview(),
                note: change_note(before, after),
            });
        }
    }

    let changed_elements = changes.len();
    let text_element_count = original
        .iter()
        .filter(|e| matches!(e, DocumentElement::Text { .. }))
        .count();
    let percent = if text_element_count == 0 {
        0.0
    } else {
        text_changes as f64 / text_element_count as f64 * 100.0
    };

    ChangeReport {
        text_changes,
        table_changes,
        total_elements: original.len(),
        changed_elements,
        summary: format!(
            "Changed {changed_elements} of {} elements. Text changes: {text_changes} \
             ({percent:.1}%). Table changes: {table_changes}.",
            original.len()
        ),
        changes,
    }
}

fn table_differs(
    columns_a: &[String],
    rows_a: &[Vec<String>],
    columns_b: &[String],
    rows_b: &[Vec<String>],
) -> bool {
    if columns_a.len() != columns_b.len() || rows_a.len() != rows_b.len() {
        return true;
    }

    let cells_a = std::iter::once(columns_a).chain(rows_a.iter().map(Vec::as_slice));
    let cells_b = std::iter::once(columns_b).chain(rows_b.iter().map(Vec::as_slice));
    for (row_a, row_b) in cells_a.zip(cells_b) {
        for (cell_a, cell_b) in row_a.iter().zip(row_b) {
            if cell_a.trim() != cell_b.trim() {
                return true;
            }
        }
    }

    false
}

/// Collapse whitespace runs to single spaces and trim.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn change_note(before: &DocumentElement, after: &DocumentElement) -> String {
    match (before, after) {
        (DocumentElement::Text { text: a }, DocumentElement::Text { text: b }) => {
            if b.len() > a.len() {
                "expanded for clarity and detail".to_string()
            } else if b.len() < a.len() {
                "condensed for conciseness".to_string()
            } else {
                "refined wording".to_string()
            }
        }
        (DocumentElement::Table { .. }, DocumentElement::Table { .. }) => {
            "table content changed".to_string()
        }
        (a, b) if a.kind() != b.kind() => {
            format!("element kind changed from {} to {}", a.kind(), b.kind())
        }
        _ => "changed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> DocumentElement {
        DocumentElement::Text {
            text: s.to_string(),
        }
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> DocumentElement {
        DocumentElement::Table {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_identical_sequences_report_no_changes() {
        let elements = vec![text("a"), table(&["H"], &[&["1"]])];
        let report = compare(&elements, &elements);
        assert!(report.is_unchanged());
        assert_eq!(report.text_changes, 0);
        assert_eq!(report.table_changes, 0);
        assert_eq!(
            report.summary,
            "Changed 0 of 2 elements. Text changes: 0 (0.0%). Table changes: 0."
        );
    }

    #[test]
    fn test_length_mismatch_short_circuits() {
        let a = vec![text("one"), text("two")];
        let b = vec![text("one")];
        let report = compare(&a, &b);
        assert_eq!(report.changed_elements, 2);
        assert_eq!(report.total_elements, 2);
        assert!(report.summary.contains("element count went from 2 to 1"));
        assert!(report.changes.is_empty());
    }

    #[test]
    fn test_text_compared_with_collapsed_whitespace() {
        let a = vec![text("hello   world")];
        let b = vec![text(" hello world ")];
        assert!(compare(&a, &b).is_unchanged());

        let c = vec![text("hello there world")];
        let report = compare(&a, &c);
        assert_eq!(report.text_changes, 1);
        assert_eq!(report.changed_elements, 1);
    }

    #[test]
    fn test_table_counted_once_per_table() {
        let a = vec![table(&["H1", "H2"], &[&["a", "b"], &["c", "d"]])];
        let b = vec![table(&["H1", "H2"], &[&["x", "y"], &["z", "w"]])];
        let report = compare(&a, &b);
        assert_eq!(report.table_changes, 1);
        assert_eq!(report.changed_elements, 1);
    }

    #[test]
    fn test_table_dimension_mismatch_is_a_change() {
        let a = vec![table(&["H"], &[&["1"]])];
        let b = vec![table(&["H"], &[&["1"], &["2"]])];
        assert_eq!(compare(&a, &b).table_changes, 1);
    }

    #[test]
    fn test_kind_mismatch_is_a_change() {
        let a = vec![text("was text")];
        let b = vec![table(&["H"], &[])];
        let report = compare(&a, &b);
        assert_eq!(report.changed_elements, 1);
        assert_eq!(report.text_changes, 0);
        assert_eq!(report.table_changes, 0);
        assert!(report.changes[0].note.contains("kind changed"));
    }

    #[test]
    fn test_percent_formatting() {
        let a = vec![text("one"), text("two"), text("three")];
        let b = vec![text("ONE"), text("two"), text("three")];
        let report = compare(&a, &b);
        assert!(report.summary.contains("(33.3%)"), "{}", report.summary);
    }

    #[test]
    fn test_change_notes_follow_length() {
        let a = vec![text("short")];
        let b = vec![text("much longer than before")];
        assert_eq!(compare(&a, &b).changes[0].note, "expanded for clarity and detail");

        let report = compare(&b, &a);
        assert_eq!(report.changes[0].note, "condensed for conciseness");
    }
}
