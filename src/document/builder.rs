//! Document reassembly
//!
//! Writes an element sequence back into a fresh .docx with fixed one-inch
//! margins. Horizontal runs of identical non-empty cell text are merged
//! back into spanned cells, inverting the extractor's span expansion. Any
//! single element that fails to render is replaced with a placeholder
//! paragraph; assembly itself never fails over one bad element.

use std::io::Cursor;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

use super::cleanup::strip_emphasis;
use super::models::DocumentElement;

/// Page margins in twips (1 inch each side).
const MARGIN_TWIPS: i32 = 1440;
/// Usable page width in twips for an 8.5 inch page with 1 inch margins.
const CONTENT_WIDTH_TWIPS: usize = 9360;
/// Images are written at a fixed 6 inch display width.
const IMAGE_WIDTH_EMU: u32 = 6 * 914_400;

/// Numeric disambiguation suffix appended to duplicate headers during
/// extraction (`Name_1`, `Name_2`, ...). Stripped when writing headers out.
static HEADER_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_\d+$").unwrap());

/// Assemble an element sequence into .docx bytes.
///
/// Always produces a document: elements that cannot be rendered degrade to
/// placeholder paragraphs with a logged warning. Only packaging the final
/// container can fail.
pub fn build_docx(elements: &[DocumentElement]) -> Result<Vec<u8>> {
    let mut docx = docx_rs::Docx::new().page_margin(
        docx_rs::PageMargin::new()
            .top(MARGIN_TWIPS)
            .bottom(MARGIN_TWIPS)
            .left(MARGIN_TWIPS)
            .right(MARGIN_TWIPS),
    );

    for (index, element) in elements.iter().enumerate() {
        match element {
            DocumentElement::Text { text } => {
                for segment in text.split("\n\n") {
                    let segment = segment.trim();
                    if !segment.is_empty() {
                        docx = docx.add_paragraph(plain_paragraph(segment));
                    }
                }
            }
            DocumentElement::Table { columns, rows } => {
                docx = docx.add_table(build_table(columns, rows));
            }
            DocumentElement::Image {
                image_path,
                caption,
            } => match build_image_paragraph(image_path) {
                Ok(paragraph) => {
                    docx = docx.add_paragraph(paragraph);
                    if let Some(caption) = caption {
                        docx = docx.add_paragraph(plain_paragraph(caption).style("Caption"));
                    }
                }
                Err(e) => {
                    log::warn!("element {index}: could not render image: {e}");
                    docx = docx.add_paragraph(plain_paragraph(&format!(
                        "[Image unavailable: {}]",
                        image_path.display()
                    )));
                }
            },
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| Error::DocumentWrite(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn plain_paragraph(text: &str) -> docx_rs::Paragraph {
    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text))
}

fn build_table(columns: &[String], rows: &[Vec<String>]) -> docx_rs::Table {
    let column_count = columns.len().max(1);
    let column_width = CONTENT_WIDTH_TWIPS / column_count;

    let mut table_rows = Vec::with_capacity(rows.len() + 1);

    // Header row: disambiguation suffixes removed, bold runs.
    let header_cells: Vec<String> = columns
        .iter()
        .map(|name| strip_emphasis(&HEADER_SUFFIX_RE.replace(name, "")))
        .collect();
    table_rows.push(build_row(&header_cells, column_width, true));

    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| strip_emphasis(cell)).collect();
        table_rows.push(build_row(&cells, column_width, false));
    }

    docx_rs::Table::new(table_rows).set_grid(vec![column_width; column_count])
}

/// Build one physical row, merging horizontal runs of identical non-empty
/// cell text into a single spanned cell.
fn build_row(cells: &[String], column_width: usize, bold: bool) -> docx_rs::TableRow {
    let mut table_cells = Vec::new();
    let mut i = 0;

    while i < cells.len() {
        let text = &cells[i];
        let mut span = 1;
        while !text.is_empty() && i + span < cells.len() && cells[i + span] == *text {
            span += 1;
        }

        let run = if bold {
            docx_rs::Run::new().add_text(text.as_str()).bold()
        } else {
            docx_rs::Run::new().add_text(text.as_str())
        };
        let mut cell = docx_rs::TableCell::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(run))
            .width(column_width * span, docx_rs::WidthType::Dxa);
        if span > 1 {
            cell = cell.grid_span(span);
        }
        table_cells.push(cell);
        i += span;
    }

    docx_rs::TableRow::new(table_cells)
}

/// Build a paragraph holding the image at a fixed 6 inch width, height
/// scaled to keep the intrinsic aspect ratio.
fn build_image_paragraph(path: &std::path::Path) -> std::io::Result<docx_rs::Paragraph> {
    let bytes = std::fs::read(path)?;

    let height = match image::image_dimensions(path) {
        Ok((w, h)) if w > 0 => {
            (IMAGE_WIDTH_EMU as u64 * h as u64 / w as u64) as u32
        }
        _ => IMAGE_WIDTH_EMU,
    };

    let pic = docx_rs::Pic::new(&bytes).size(IMAGE_WIDTH_EMU, height);
    Ok(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_image(pic)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_suffix_stripping() {
        assert_eq!(HEADER_SUFFIX_RE.replace("Name_1", ""), "Name");
        assert_eq!(HEADER_SUFFIX_RE.replace("Name", ""), "Name");
        assert_eq!(HEADER_SUFFIX_RE.replace("Q_2_3", ""), "Q_2");
    }

    #[test]
    fn test_build_always_produces_bytes() {
        let elements = vec![
            DocumentElement::Text {
                text: "One.\n\nTwo.".to_string(),
            },
            DocumentElement::Image {
                image_path: "/nonexistent/missing.png".into(),
                caption: None,
            },
        ];
        // The missing image degrades to a placeholder instead of failing.
        let bytes = build_docx(&elements).unwrap();
        assert!(!bytes.is_empty());
    }
}
