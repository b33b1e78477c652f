//! Refinement pipeline orchestration
//!
//! Runs the full extract → encode → transform → decode → reassemble → diff
//! sequence. The text-transformation stage is injected as a single-call
//! capability; the pipeline never inspects how it works, it only hands it
//! one string and takes one string back. Results are memoized per encoded
//! payload so repeated runs over identical content call the stage at most
//! once.

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::document::{
    ChangeReport, DocumentElement, ExtractOptions, build_docx, clean_transformed_output, compare,
    decode, encode, extract_elements,
};
use crate::error::{Error, Result};

/// The external text-improvement stage: one string in, one improved string
/// out. Implementations may be slow and may fail; they must not be assumed
/// to preserve placeholder tokens, paragraph counts, or plain formatting.
pub trait TextTransformer {
    fn transform(&self, text: &str) -> Result<String>;
}

/// Passthrough stage. Useful for structural round trips and as a default.
pub struct IdentityTransformer;

impl TextTransformer for IdentityTransformer {
    fn transform(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Pipes the payload through an external command's stdin/stdout, so any
/// script or model CLI can serve as the refinement stage.
pub struct CommandTransformer {
    program: String,
    args: Vec<String>,
}

impl CommandTransformer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a whitespace-separated command line.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl TextTransformer for CommandTransformer {
    fn transform(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::TransformationService(format!("failed to start {}: {e}", self.program))
            })?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| Error::TransformationService(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::TransformationService(e.to_string()))?;

        if !output.status.success() {
            return Err(Error::TransformationService(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::TransformationService(format!("non-UTF-8 output: {e}")))
    }
}

/// Options for one refinement run.
#[derive(Debug, Clone, Default)]
pub struct RefineOptions {
    /// Directory to extract embedded images into so they can be re-inserted
    /// during reassembly. Without it, images are dropped (best-effort).
    pub image_dir: Option<std::path::PathBuf>,
}

/// Everything a refinement run produces.
#[derive(Debug)]
pub struct RefineOutcome {
    /// The reassembled .docx bytes.
    pub document: Vec<u8>,
    /// Elements as extracted from the input.
    pub original_elements: Vec<DocumentElement>,
    /// Elements after the transformation stage was spliced back in.
    pub refined_elements: Vec<DocumentElement>,
    /// Structural comparison of the two sequences.
    pub report: ChangeReport,
}

/// Orchestrates the refinement stages around an injected transformer.
pub struct RefinePipeline<T: TextTransformer> {
    transformer: T,
    // Memoized refined payloads keyed by the encoded payload (the content
    // fingerprint; exact string equality). At most one transformation per
    // fingerprint.
    cache: HashMap<String, String>,
}

impl<T: TextTransformer> RefinePipeline<T> {
    pub fn new(transformer: T) -> Self {
        Self {
            transformer,
            cache: HashMap::new(),
        }
    }

    /// Refine a .docx byte buffer end to end.
    pub fn refine_bytes(&mut self, bytes: &[u8], options: &RefineOptions) -> Result<RefineOutcome> {
        let extract_options = ExtractOptions {
            image_dir: options.image_dir.clone(),
        };
        let original_elements = extract_elements(bytes, &extract_options)?;
        log::debug!("extracted {} elements", original_elements.len());

        let payload = encode(&original_elements);
        let refined_text = self.transform_cached(&payload)?;

        let refined_elements = decode(&original_elements, &refined_text);
        let document = build_docx(&refined_elements)?;
        let report = compare(&original_elements, &refined_elements);
        log::debug!("{}", report.summary);

        Ok(RefineOutcome {
            document,
            original_elements,
            refined_elements,
            report,
        })
    }

    fn transform_cached(&mut self, payload: &str) -> Result<String> {
        if let Some(cached) = self.cache.get(payload) {
            log::debug!("serving transformation result from cache");
            return Ok(cached.clone());
        }

        let raw = self.transformer.transform(payload)?;
        let cleaned = clean_transformed_output(&raw);
        self.cache.insert(payload.to_string(), cleaned.clone());
        Ok(cleaned)
    }

    /// Drop all memoized results.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
