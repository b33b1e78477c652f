//! Error types
//!
//! One library-wide error enum. Container and parse failures surface as
//! [`Error::MalformedDocument`] so callers get a single variant to match on
//! regardless of which layer (zip, XML, typed parse) rejected the input.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("failed to write document: {0}")]
    DocumentWrite(String),

    #[error("transformation service error: {0}")]
    TransformationService(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::MalformedDocument("missing word/document.xml".to_string());
        assert_eq!(
            err.to_string(),
            "malformed document: missing word/document.xml"
        );

        let err = Error::TransformationService("model unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "transformation service error: model unavailable"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_zip_error_maps_to_malformed_document() {
        let zip_err = zip::result::ZipError::FileNotFound;
        let err: Error = zip_err.into();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }
}
