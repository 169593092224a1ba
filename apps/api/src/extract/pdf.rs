use tracing::warn;

use crate::extract::ExtractError;

/// Concatenated text of every page.
///
/// Wrapped in `catch_unwind`: pdf-extract panics on some malformed font
/// encodings instead of returning an error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::UnreadableDocument(format!("invalid PDF: {e}"))),
        Err(_) => {
            warn!("PDF parser panicked on upload");
            Err(ExtractError::UnreadableDocument(
                "PDF parsing failed (malformed document)".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two pages, Helvetica, uncompressed content streams.
    const TWO_PAGE_PDF: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/two_page_resume.pdf"
    ));

    #[test]
    fn test_text_of_all_pages_in_order() {
        let text = extract_pdf_text(TWO_PAGE_PDF).unwrap();
        let first = text.find("Python").expect("page 1 text");
        let second = text.find("Kubernetes").expect("page 2 text");
        assert!(first < second, "pages out of order: {text:?}");
        assert!(text.contains("Docker"));
        assert!(text.contains("Terraform"));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::UnreadableDocument(_))));
    }

    #[test]
    fn test_empty_bytes_are_unreadable() {
        assert!(matches!(
            extract_pdf_text(b""),
            Err(ExtractError::UnreadableDocument(_))
        ));
    }
}
