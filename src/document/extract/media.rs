//! Embedded image extraction
//!
//! Media parts are copied out of the container into a caller-provided
//! directory and paired with in-document drawings by encounter order. Image
//! handling is best-effort throughout: a missing directory or an
//! unwritable media file never fails the overall extraction.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::io::list_media;

/// Copy every `word/media/*` part into `dir`, returning the written paths
/// in media-name order. Parts that cannot be written are skipped with a
/// warning.
pub(crate) fn extract_media_files(bytes: &[u8], dir: &Path) -> Vec<PathBuf> {
    let media = match list_media(bytes) {
        Ok(media) => media,
        Err(e) => {
            log::warn!("failed to enumerate embedded media: {e}");
            return Vec::new();
        }
    };

    if !media.is_empty() {
        if let Err(e) = fs::create_dir_all(dir) {
            log::warn!("failed to create image directory {}: {e}", dir.display());
            return Vec::new();
        }
    }

    let mut paths = Vec::new();
    for (name, data) in media {
        let file_name = name.rsplit('/').next().unwrap_or(&name);
        let path = dir.join(file_name);
        match fs::write(&path, &data) {
            Ok(()) => paths.push(path),
            Err(e) => log::warn!("failed to write media file {}: {e}", path.display()),
        }
    }

    paths
}

/// True if the paragraph contains at least one drawing (embedded picture).
pub(crate) fn paragraph_has_drawing(para: &docx_rs::Paragraph) -> bool {
    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if matches!(run_child, docx_rs::RunChild::Drawing(_)) {
                    return true;
                }
            }
        }
    }
    false
}

/// True if the paragraph carries the Caption style.
pub(crate) fn is_caption_paragraph(para: &docx_rs::Paragraph) -> bool {
    para.property
        .style
        .as_ref()
        .is_some_and(|style| style.val == "Caption")
}
