//! Document model, extraction, codec, reassembly, and diff
//!
//! This module owns everything that touches document structure: the typed
//! element model, the .docx extractor, the text/placeholder codec used to
//! shuttle content through the external text stage, the reassembler that
//! writes elements back out, and the structural differ.

pub(crate) mod builder;
pub mod cleanup;
pub mod codec;
pub mod diff;
pub(crate) mod extract;
pub(crate) mod io;
pub mod models;

pub use builder::build_docx;
pub use cleanup::clean_transformed_output;
pub use codec::{decode, encode};
pub use diff::{ChangeReport, ElementChange, compare};
pub use extract::{ExtractOptions, extract_elements};
pub use models::{DocumentElement, ElementKind};
