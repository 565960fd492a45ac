//! PDF text-layer reading
//!
//! Only the embedded text layer is read. Scanned pages without one come back
//! as empty text; no OCR is attempted.

use pdf_extract::extract_text_from_mem;
use tracing::debug;

use crate::error::GeorefError;

/// Extract the full text layer of a PDF
///
/// # Errors
/// - `GeorefError::PasswordProtected` - The PDF is encrypted
/// - `GeorefError::InvalidPdf` - The PDF is malformed or corrupted
/// - `GeorefError::Extraction` - Other extraction failures
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, GeorefError> {
    let text = extract_text_from_mem(pdf_bytes).map_err(|e| classify_error(&e.to_string()))?;
    debug!(bytes = pdf_bytes.len(), text_len = text.len(), "Text layer extracted");
    Ok(text)
}

/// Number of pages, read with lopdf without touching content streams.
pub fn page_count(pdf_bytes: &[u8]) -> Result<u32, GeorefError> {
    let doc = lopdf::Document::load_mem(pdf_bytes)
        .map_err(|e| classify_error(&e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

fn classify_error(message: &str) -> GeorefError {
    let lower = message.to_lowercase();

    if lower.contains("encrypted") || lower.contains("password") {
        return GeorefError::PasswordProtected;
    }

    if lower.contains("invalid")
        || lower.contains("malformed")
        || lower.contains("corrupt")
        || lower.contains("parse")
        || lower.contains("header")
        || lower.contains("xref")
        || lower.contains("trailer")
    {
        return GeorefError::InvalidPdf(message.to_string());
    }

    GeorefError::Extraction(message.to_string())
}
