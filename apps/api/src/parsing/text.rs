//! Text extraction: converts uploaded document bytes into plain text.
//!
//! Dispatch is by filename extension over a closed set of formats. Reader
//! failures, including panics inside the third-party parsers, are caught here
//! and turned into an `ExtractionWarning`; they never abort a batch.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Derives the format from the filename extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("docx") => DocumentFormat::Docx,
            _ => DocumentFormat::Unsupported,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Unsupported => "unsupported",
        }
    }
}

/// Non-fatal problem encountered while extracting a single document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    #[error("Unsupported file type: {filename}")]
    UnsupportedFormat { filename: String },

    #[error("Could not read {format}: {reason}")]
    MalformedDocument { format: String, reason: String },

    #[error("Could not recognize names in {filename}: {reason}")]
    NameRecognitionFailed { filename: String, reason: String },
}

/// Result of extracting one document: the text (possibly empty) and an
/// optional warning explaining why it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub warning: Option<ExtractionWarning>,
}

impl ExtractedText {
    fn ok(text: String) -> Self {
        Self {
            text,
            warning: None,
        }
    }

    fn failed(warning: ExtractionWarning) -> Self {
        warn!("{warning}");
        Self {
            text: String::new(),
            warning: Some(warning),
        }
    }
}

/// Extracts plain text from `content`, choosing the reader from `filename`.
pub fn extract_text(filename: &str, content: &[u8]) -> ExtractedText {
    let format = DocumentFormat::from_filename(filename);
    let result = match format {
        DocumentFormat::Pdf => guarded(|| extract_pdf_text(content)),
        DocumentFormat::Docx => guarded(|| extract_docx_text(content)),
        DocumentFormat::Unsupported => {
            return ExtractedText::failed(ExtractionWarning::UnsupportedFormat {
                filename: filename.to_string(),
            })
        }
    };

    match result {
        Ok(text) => ExtractedText::ok(text),
        Err(reason) => ExtractedText::failed(ExtractionWarning::MalformedDocument {
            format: format.label().to_string(),
            reason,
        }),
    }
}

/// Runs a reader, converting both errors and panics into a reason string.
fn guarded<F>(reader: F) -> Result<String, String>
where
    F: FnOnce() -> Result<String, String>,
{
    // pdf-extract and docx-rs can panic on malformed input
    catch_unwind(AssertUnwindSafe(reader)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "parser panicked".to_string());
        Err(reason)
    })
}

fn extract_pdf_text(content: &[u8]) -> Result<String, String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(content).map_err(|e| e.to_string())?;
    Ok(join_pages(pages))
}

/// Each page with text contributes its text plus a newline; empty pages contribute nothing.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .filter(|page| !page.is_empty())
        .fold(String::new(), |mut text, page| {
            text.push_str(&page);
            text.push('\n');
            text
        })
}

fn extract_docx_text(content: &[u8]) -> Result<String, String> {
    let docx = docx_rs::read_docx(content).map_err(|e| e.to_string())?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(p) = child {
            text.push_str(&paragraph_text(p));
            text.push('\n');
        }
    }
    Ok(text)
}

fn paragraph_text(p: &Paragraph) -> String {
    let mut text = String::new();

    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => {
                for run_child in &r.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(h) => {
                for child in &h.children {
                    if let ParagraphChild::Run(r) = child {
                        for run_child in &r.children {
                            if let RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    text
}
