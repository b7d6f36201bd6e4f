//! Text extraction from digital PDFs

use crate::error::ReaderError;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

/// Page tree depth beyond which /Parent links are treated as cyclic
const MAX_TREE_DEPTH: usize = 32;

/// Extract the text of every page, in page order
///
/// # Errors
///
/// - `RotationUnsupported` if any page is rotated by 180 degrees
/// - `Pdf` if the document cannot be parsed
pub fn extract_pdf_text(bytes: &[u8], locator: &str) -> Result<String, ReaderError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ReaderError::Pdf(format!("{}: {}", locator, e)))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ReaderError::Pdf(format!("{}: document has no pages", locator)));
    }
    if pages.len() > 1 {
        debug!("{} has {} pages", locator, pages.len());
    }

    for (&page_num, &page_id) in &pages {
        if page_rotation(&doc, page_id).rem_euclid(360) == 180 {
            return Err(ReaderError::RotationUnsupported {
                locator: locator.to_string(),
                page: page_num,
            });
        }
    }

    let mut text = String::new();
    for &page_num in pages.keys() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => warn!("Failed to extract text from page {} of {}: {}", page_num, locator, e),
        }
    }

    if text.trim().is_empty() {
        return Err(ReaderError::UnsupportedFormat(format!(
            "{} has no text layer (scanned PDFs need OCR)",
            locator
        )));
    }
    Ok(text)
}

/// Effective /Rotate of a page, inherited through the page tree
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = match doc.get_dictionary(current) {
            Ok(dict) => dict,
            Err(_) => return 0,
        };
        match dict.get(b"Rotate") {
            Ok(Object::Integer(degrees)) => return *degrees,
            Ok(Object::Real(degrees)) => return *degrees as i64,
            _ => {}
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return 0,
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_pdf_error() {
        let result = extract_pdf_text(b"definitely not a pdf", "junk.pdf");
        assert!(matches!(result, Err(ReaderError::Pdf(_))));
    }
}
