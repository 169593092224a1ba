//! Document extraction — turns an uploaded resume (bytes + filename) into plain text.
//!
//! Format is picked from the filename extension only; content sniffing is not attempted.

pub mod docx;
pub mod pdf;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("No readable text found in file")]
    EmptyDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
    Markdown,
}

impl DocumentFormat {
    /// Resolves the format from whatever follows the last `.` in `filename`.
    /// A name without a dot is treated as its own extension.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::PlainText),
            "md" => Ok(Self::Markdown),
            _ => Err(ExtractError::UnsupportedFormat(ext)),
        }
    }
}

/// Extracts text from `bytes`. Blank output is reported as `EmptyDocument`.
///
/// `max_bytes` caps decompressed content, so a small compressed upload cannot
/// expand without bound.
#[tracing::instrument(skip(bytes), fields(size = bytes.len()))]
pub fn extract_document(
    filename: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_filename(filename)?;
    let text = extract_text(format, bytes, max_bytes)?;
    if text.len() > max_bytes {
        return Err(ExtractError::UnreadableDocument(format!(
            "extracted text exceeds {max_bytes} bytes"
        )));
    }

    debug!(?format, chars = text.len(), "Extracted document text");

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }
    Ok(text)
}

pub fn extract_text(
    format: DocumentFormat,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<String, ExtractError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(bytes),
        DocumentFormat::Docx => docx::extract_docx_text(bytes, max_bytes),
        DocumentFormat::PlainText | DocumentFormat::Markdown => Ok(decode_utf8_lossless(bytes)),
    }
}

/// UTF-8 decode that silently drops invalid byte sequences instead of
/// substituting U+FFFD.
fn decode_utf8_lossless(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
