//! Container I/O and validation
//!
//! This module opens the .docx zip container, validates that it actually is
//! a Word document, and exposes the raw parts the rest of the extractor
//! needs: the main document XML and the embedded media files.

use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Validates that the bytes are a legitimate .docx container.
pub(crate) fn validate_docx_bytes(bytes: &[u8]) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    if archive.by_name("word/document.xml").is_err() {
        // Check if it might be an Excel file
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(Error::MalformedDocument(
                "this appears to be an Excel file (.xlsx); only Word documents (.docx) \
                 are supported"
                    .to_string(),
            ));
        }

        return Err(Error::MalformedDocument(
            "missing word/document.xml; the file may be corrupted or is not a valid \
             Word document"
                .to_string(),
        ));
    }

    Ok(())
}

/// Read the main document part as a string.
///
/// Used for the raw-XML scan that recovers table cell grid spans, which the
/// typed document walk does not surface.
pub(crate) fn read_document_xml(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| Error::MalformedDocument(e.to_string()))?;
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Enumerate embedded media parts (`word/media/*`) in name order.
///
/// Word numbers media files sequentially (image1.png, image2.jpeg, ...), so
/// name order matches the order pictures were added to the package.
pub(crate) fn list_media(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut media = Vec::new();

    for i in 0..archive.len() {
        let mut part = archive.by_index(i)?;
        let name = part.name().to_string();
        if !name.starts_with("word/media/") || name.ends_with('/') {
            continue;
        }
        let mut data = Vec::new();
        part.read_to_end(&mut data)?;
        media.push((name, data));
    }

    media.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(media)
}
