//! Document element extraction
//!
//! Walks the document body in physical order and flattens it into an
//! ordered sequence of [`DocumentElement`]s. Non-empty paragraphs become
//! text elements, tables become rectangular string grids, and embedded
//! pictures become image elements paired with any following caption
//! paragraph. A table that fails to extract is skipped with a warning; only
//! an unopenable container is fatal.

pub(crate) mod media;
pub(crate) mod table;

use std::path::PathBuf;

use crate::document::io::{read_document_xml, validate_docx_bytes};
use crate::document::models::DocumentElement;
use crate::error::{Error, Result};

use media::{extract_media_files, is_caption_paragraph, paragraph_has_drawing};
use table::{extract_table, scan_grid_spans};

/// Options controlling extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Directory to copy embedded media into. When unset, image elements
    /// are omitted (best-effort policy).
    pub image_dir: Option<PathBuf>,
}

/// Parse a .docx byte buffer into an ordered element sequence.
///
/// Fails with [`Error::MalformedDocument`] if the container cannot be
/// opened or parsed; individual malformed tables are skipped so the rest
/// of the document remains usable.
pub fn extract_elements(bytes: &[u8], options: &ExtractOptions) -> Result<Vec<DocumentElement>> {
    validate_docx_bytes(bytes)?;

    let docx = docx_rs::read_docx(bytes).map_err(|e| Error::MalformedDocument(e.to_string()))?;

    // Grid spans are not visible through the typed walk, so recover them
    // from the raw XML up front. If the scan comes up short for a table,
    // extraction falls back to span 1 for its cells.
    let grid_spans = match read_document_xml(bytes) {
        Ok(xml) => scan_grid_spans(&xml),
        Err(e) => {
            log::warn!("could not scan document XML for cell spans: {e}");
            Vec::new()
        }
    };

    let image_paths = match &options.image_dir {
        Some(dir) => extract_media_files(bytes, dir),
        None => Vec::new(),
    };

    let children = &docx.document.children;

    let mut elements = Vec::new();
    let mut table_index = 0;
    let mut image_index = 0;
    let mut skip_caption_at: Option<usize> = None;

    for (child_index, child) in children.iter().enumerate() {
        if skip_caption_at == Some(child_index) {
            skip_caption_at = None;
            continue;
        }

        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                if paragraph_has_drawing(para) && image_index < image_paths.len() {
                    let caption = next_caption(children, child_index);
                    if caption.is_some() {
                        skip_caption_at = Some(child_index + 1);
                    }
                    elements.push(DocumentElement::Image {
                        image_path: image_paths[image_index].clone(),
                        caption,
                    });
                    image_index += 1;
                }

                let text = extract_paragraph_text(para);
                if !text.is_empty() {
                    elements.push(DocumentElement::Text { text });
                }
            }
            docx_rs::DocumentChild::Table(docx_table) => {
                let spans = grid_spans.get(table_index);
                match extract_table(docx_table, spans) {
                    Some(element) => elements.push(element),
                    None => log::warn!("skipping empty or unreadable table {table_index}"),
                }
                table_index += 1;
            }
            _ => {}
        }
    }

    Ok(elements)
}

/// Extract plain text from a paragraph, trimmed.
///
/// Tabs and line breaks inside runs are preserved as whitespace; drawings
/// and other non-text run children contribute nothing.
pub(crate) fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();

    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    docx_rs::RunChild::Text(text_elem) => text.push_str(&text_elem.text),
                    docx_rs::RunChild::Tab(_) => text.push('\t'),
                    docx_rs::RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }

    text.trim().to_string()
}

/// Text of the caption-styled paragraph immediately following an image
/// paragraph, if there is one.
fn next_caption(children: &[docx_rs::DocumentChild], image_index: usize) -> Option<String> {
    match children.get(image_index + 1) {
        Some(docx_rs::DocumentChild::Paragraph(para)) if is_caption_paragraph(para) => {
            let text = extract_paragraph_text(para);
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}
