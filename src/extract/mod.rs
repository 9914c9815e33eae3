//! Plain-text extraction from uploaded documents.
//!
//! Every reader returns one string. Office formats are ZIP containers of XML
//! parts; PDF goes through `pdf-extract`.

mod office;
mod pdf;
mod txt;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: {0} (expected one of: {list})", list = DocumentKind::SUPPORTED.join(", "))]
    Unsupported(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a valid {kind} container: {reason}")]
    Archive { kind: &'static str, reason: String },

    #[error("invalid {kind} file: {part} not found")]
    MissingPart { kind: &'static str, part: String },

    #[error("malformed XML in {part}: {reason}")]
    Xml { part: String, reason: String },

    #[error("failed to extract PDF text: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Docx,
    Pptx,
    Pdf,
}

impl DocumentKind {
    pub const SUPPORTED: &'static [&'static str] = &["txt", "docx", "pptx", "pdf"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            let shown = if ext.is_empty() { "(no extension)" } else { ext };
            ExtractError::Unsupported(shown.to_string())
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
        }
    }
}

/// Read a file from disk and extract its text.
pub fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path)?;
    tracing::debug!("Extracting {} ({} bytes) as {}", path.display(), bytes.len(), kind.name());
    extract_bytes(kind, &bytes)
}

/// Extract text from an upload whose format is inferred from `filename`.
pub fn extract_named(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_path(Path::new(filename))?;
    extract_bytes(kind, bytes)
}

pub fn extract_bytes(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Text => Ok(txt::read_text(bytes)),
        DocumentKind::Docx => office::read_docx(bytes),
        DocumentKind::Pptx => office::read_pptx(bytes),
        DocumentKind::Pdf => pdf::read_pdf(bytes),
    }
}
