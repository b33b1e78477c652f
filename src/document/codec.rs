//! Text/placeholder codec
//!
//! Serializes an element sequence into one flat string for the external
//! text stage and splices the transformed string back afterwards. Non-text
//! elements travel as placeholder tokens so the text stage only ever sees
//! (and can only ever damage) text; tables and images are re-emitted from
//! the original sequence on decode, byte for byte.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::DocumentElement;

/// Separator between element renderings in the encoded payload.
const PARAGRAPH_SEPARATOR: &str = "\n\n";

// Recognition is deliberately looser than generation: the transformation
// stage or the markdown normalizer may drop underscores or squeeze
// whitespace inside a token, and a mangled placeholder must still be
// recognized as one rather than consumed as paragraph text.
static TABLE_PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[TABLE[ _]?ID[ _]?\d+:\s*\d+\s*rows?\s*x\s*\d+\s*columns?\]$").unwrap()
});
static IMAGE_PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\[IMAGE\]$").unwrap());

/// Placeholder token for the `n`th table (zero-based, in encounter order).
fn table_placeholder(n: usize, row_count: usize, column_count: usize) -> String {
    format!("[TABLE_ID_{n}: {row_count} rows x {column_count} columns]")
}

/// True if a payload part looks like a placeholder rather than text.
fn is_placeholder(part: &str) -> bool {
    let part = part.trim();
    TABLE_PLACEHOLDER_RE.is_match(part) || IMAGE_PLACEHOLDER_RE.is_match(part)
}

/// Encode an element sequence into one flat string.
///
/// Text renders as its raw content, tables and images as placeholder
/// tokens, all joined with blank lines. The table counter and shape values
/// derive purely from `elements`, so decode can reproduce them without any
/// state carried across the transformation.
pub fn encode(elements: &[DocumentElement]) -> String {
    let mut parts = Vec::with_capacity(elements.len());
    let mut table_count = 0;

    for element in elements {
        match element {
            DocumentElement::Text { text } => parts.push(text.clone()),
            DocumentElement::Table { columns, rows } => {
                parts.push(table_placeholder(table_count, rows.len(), columns.len()));
                table_count += 1;
            }
            DocumentElement::Image { .. } => parts.push("[IMAGE]".to_string()),
        }
    }

    parts.join(PARAGRAPH_SEPARATOR)
}

/// Number of payload parts a text element contributes when its rendering
/// is split back on the separator. A text element may itself contain blank
/// lines, in which case it spans several parts.
fn segment_count(text: &str) -> usize {
    text.split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .count()
        .max(1)
}

/// Splice a transformed string back onto the original element sequence.
///
/// Walks `elements` in order. Each text element consumes as many
/// non-placeholder parts of the transformed string as its original text
/// contributed, so an element spanning several paragraphs stays aligned
/// with the elements after it. When the parts run out, the original text
/// is kept unchanged rather than inventing content. Tables and images are
/// always re-emitted from the originals: whatever the transformation did
/// to their placeholder tokens, the tokens only ever served to keep
/// positions aligned.
pub fn decode(elements: &[DocumentElement], transformed: &str) -> Vec<DocumentElement> {
    let mut parts = transformed
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let mut decoded = Vec::with_capacity(elements.len());

    for element in elements {
        match element {
            DocumentElement::Text { text } => {
                let mut consumed = Vec::new();
                while consumed.len() < segment_count(text) {
                    let Some(part) = parts.by_ref().find(|p| !is_placeholder(p)) else {
                        break;
                    };
                    consumed.push(part.to_string());
                }
                decoded.push(DocumentElement::Text {
                    text: if consumed.is_empty() {
                        text.clone()
                    } else {
                        consumed.join(PARAGRAPH_SEPARATOR)
                    },
                });
            }
            table @ DocumentElement::Table { .. } => decoded.push(table.clone()),
            image @ DocumentElement::Image { .. } => decoded.push(image.clone()),
        }
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn text(s: &str) -> DocumentElement {
        DocumentElement::Text {
            text: s.to_string(),
        }
    }

    fn sample_table() -> DocumentElement {
        DocumentElement::Table {
            columns: vec!["Name".to_string(), "Role".to_string()],
            rows: vec![vec!["Ada".to_string(), "Engineer".to_string()]],
        }
    }

    fn sample_image() -> DocumentElement {
        DocumentElement::Image {
            image_path: PathBuf::from("media/image1.png"),
            caption: Some("Figure 1".to_string()),
        }
    }

    #[test]
    fn test_encode_shapes() {
        let elements = vec![text("Hello."), sample_table(), sample_image(), text("Bye.")];
        assert_eq!(
            encode(&elements),
            "Hello.\n\n[TABLE_ID_0: 1 rows x 2 columns]\n\n[IMAGE]\n\nBye."
        );
    }

    #[test]
    fn test_round_trip_identity_for_text_only() {
        let elements = vec![text("First paragraph."), text("Second paragraph.")];
        let decoded = decode(&elements, &encode(&elements));
        assert_eq!(decoded, elements);
    }

    #[test]
    fn test_multi_paragraph_text_keeps_later_elements_aligned() {
        // A text element holding a blank line spans two payload parts;
        // decode must consume both so the next element gets its own part.
        let elements = vec![text("A\n\nB"), text("C")];
        let decoded = decode(&elements, &encode(&elements));
        assert_eq!(decoded, elements);

        // Same alignment with a rewritten payload.
        let decoded = decode(&elements, "X\n\nY\n\nZ");
        assert_eq!(decoded, vec![text("X\n\nY"), text("Z")]);
    }

    #[test]
    fn test_multi_paragraph_text_tolerates_condensed_output() {
        // The stage returned fewer parts than the originals contributed;
        // elements left without a part keep their original text.
        let elements = vec![text("A\n\nB"), text("C")];
        let decoded = decode(&elements, "AB\n\nC");
        assert_eq!(decoded, vec![text("AB\n\nC"), text("C")]);
    }

    #[test]
    fn test_non_text_preserved_whatever_the_stage_returns() {
        let elements = vec![text("Intro."), sample_table(), sample_image()];

        for mangled in [
            "",
            "Rewritten intro.",
            "Rewritten intro.\n\n[TABLE_ID_0: 1 rows x 2 columns]\n\n[IMAGE]",
            "[IMAGE]\n\n[IMAGE]\n\nRewritten intro.\n\n[TABLE_ID_9: 4 rows x 4 columns]",
        ] {
            let decoded = decode(&elements, mangled);
            assert_eq!(decoded[1], elements[1], "table lost for {mangled:?}");
            assert_eq!(decoded[2], elements[2], "image lost for {mangled:?}");
        }
    }

    #[test]
    fn test_text_replaced_in_order_skipping_placeholders() {
        let elements = vec![text("one"), sample_table(), text("two")];
        let transformed = "[TABLE_ID_0: 1 rows x 2 columns]\n\nONE\n\nTWO";
        let decoded = decode(&elements, transformed);
        assert_eq!(decoded[0], text("ONE"));
        assert_eq!(decoded[2], text("TWO"));
    }

    #[test]
    fn test_falls_back_to_original_when_parts_run_out() {
        let elements = vec![text("kept one"), text("kept two")];
        let decoded = decode(&elements, "only part");
        assert_eq!(decoded[0], text("only part"));
        assert_eq!(decoded[1], text("kept two"));
    }

    #[test]
    fn test_recognizes_mangled_placeholders() {
        assert!(is_placeholder("[TABLE_ID_3: 10 rows x 4 columns]"));
        assert!(is_placeholder("[TABLEID3: 10 rows x 4 columns]"));
        assert!(is_placeholder("[TABLE ID 3: 1 row x 1 column]"));
        assert!(is_placeholder("  [IMAGE]  "));
        assert!(is_placeholder("[TABLE_ID_0: 1 ROWS X 2 COLUMNS]"));
        assert!(!is_placeholder("A sentence about [IMAGE] tokens."));
        assert!(!is_placeholder("Ordinary paragraph text."));
    }
}
