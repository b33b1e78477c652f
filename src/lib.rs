//! redraft: structure-preserving refinement pipeline for .docx files
//!
//! This library parses a Word document into a flat sequence of typed
//! elements (text, tables, images), routes only the textual content through
//! an external text-improvement stage, reassembles a structurally faithful
//! document, and reports what changed. Tables and images pass through the
//! text stage as placeholder tokens and are restored byte for byte no
//! matter what the stage returns.

pub mod document;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use document::{
    ChangeReport, DocumentElement, ElementChange, ElementKind, ExtractOptions, build_docx,
    clean_transformed_output, compare, decode, encode, extract_elements,
};
pub use error::{Error, Result};
pub use pipeline::{
    CommandTransformer, IdentityTransformer, RefineOptions, RefineOutcome, RefinePipeline,
    TextTransformer,
};
