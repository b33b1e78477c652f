//! Transformation-output cleanup
//!
//! The external text stage gives no guarantee about its output shape: it
//! may wrap the document in fenced code blocks, prepend a language tag, or
//! re-introduce markdown formatting. This module normalizes such output
//! back to plain paragraphs before the codec splits it.

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*-[ \t]+").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Language tags the text stage tends to emit after an opening fence.
const LANGUAGE_TAGS: [&str; 4] = ["text", "markdown", "docx", "doc"];

/// Normalize raw transformation output to plain paragraphs.
///
/// Strips code fences and leading language tags, collapses markdown
/// emphasis, strike, and heading markers, removes dash list markers,
/// collapses runs of spaces, and re-trims paragraph boundaries. The single
/// pass is repeated until the text stops changing, which makes the whole
/// normalizer idempotent.
pub fn clean_transformed_output(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        // Every change removes characters, so the loop terminates.
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    // Code fence markers first, then a bare language tag left on its own
    // first line.
    let text = text.replace("```", "");
    let text = strip_leading_language_tag(&text);

    // Markdown emphasis, strike, and heading markers. The codec's
    // placeholder matcher tolerates the underscores lost here.
    let text = text.replace("~~", "");
    let text: String = text.chars().filter(|c| !matches!(c, '*' | '_' | '#')).collect();

    let text = LIST_MARKER_RE.replace_all(&text, "");
    let text = SPACE_RUN_RE.replace_all(&text, " ");

    // Re-trim paragraph boundaries, dropping paragraphs that emptied out.
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    paragraphs.join("\n\n")
}

fn strip_leading_language_tag(text: &str) -> String {
    let mut lines = text.lines();
    if let Some(first) = lines.next() {
        let tag = first.trim().to_lowercase();
        if LANGUAGE_TAGS.contains(&tag.as_str()) {
            return lines.collect::<Vec<_>>().join("\n");
        }
    }
    text.to_string()
}

/// Strip markdown emphasis characters from a single table cell or header.
pub(crate) fn strip_emphasis(text: &str) -> String {
    let cleaned: String = text
        .replace("~~", "")
        .chars()
        .filter(|c| !matches!(c, '*' | '_'))
        .collect();
    SPACE_RUN_RE.replace_all(cleaned.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_code_fences_and_language_tag() {
        let raw = "```markdown\nDear Sir,\n\nThank you.\n```";
        assert_eq!(clean_transformed_output(raw), "Dear Sir,\n\nThank you.");
    }

    #[test]
    fn test_strips_markdown_markers() {
        let raw = "# Heading\n\nThis is **bold** and _italic_ and ~~struck~~.";
        assert_eq!(
            clean_transformed_output(raw),
            "Heading\n\nThis is bold and italic and struck."
        );
    }

    #[test]
    fn test_strips_dash_list_markers() {
        let raw = "- first point\n- second point";
        assert_eq!(clean_transformed_output(raw), "first point\nsecond point");
    }

    #[test]
    fn test_collapses_space_runs_and_retrims() {
        let raw = "  Hello   world.  \n\n\n\n  Second    paragraph. ";
        assert_eq!(
            clean_transformed_output(raw),
            "Hello world.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "```text\n# Title\n\n- a  list\n\nSome **text** here.\n```",
            "plain paragraph\n\nanother one",
            "- - doubled marker",
            "",
        ];
        for raw in samples {
            let once = clean_transformed_output(raw);
            let twice = clean_transformed_output(&once);
            assert_eq!(once, twice, "normalizer not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_deeply_stacked_list_markers_fully_converge() {
        // Each pass removes one leading marker, so a long stack needs many
        // passes; the loop must run until nothing changes.
        let raw = "- - - - - - - - - - deep list";
        assert_eq!(clean_transformed_output(raw), "deep list");
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("**Total**"), "Total");
        assert_eq!(strip_emphasis("_net_ amount"), "net amount");
    }
}
