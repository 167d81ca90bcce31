//! OCR extraction pipeline: image preprocessing, text recognition, and
//! per-type field parsing.

pub mod ocr;
pub mod parsers;
pub mod preprocess;

pub use ocr::{DisabledOcrEngine, OcrEngine, OcrError, OcrOutput};
pub use parsers::parse_document_text;
pub use preprocess::prepare_for_ocr;

use crate::models::{DocumentType, ExtractedData};

/// Run the full pipeline on an uploaded file. Never fails: PDFs skip OCR
/// with a notice, a broken image falls back to the original bytes, and an
/// engine failure leaves an empty extraction for manual entry.
pub fn extract_document_data(
    engine: &dyn OcrEngine,
    bytes: &[u8],
    mime_type: &str,
    document_type: DocumentType,
) -> ExtractedData {
    if mime_type == "application/pdf" {
        return ExtractedData {
            raw_text: "PDF document - OCR not performed".to_string(),
            confidence: 0.0,
            ..Default::default()
        };
    }

    let prepared = match preprocess::prepare_for_ocr(bytes) {
        Ok(png) => png,
        Err(e) => {
            tracing::warn!(error = %e, "image preprocessing failed, passing original bytes to OCR");
            bytes.to_vec()
        }
    };

    match engine.recognize(&prepared) {
        Ok(output) => parse_document_text(&output.text, output.confidence, document_type),
        Err(e) => {
            tracing::warn!(error = %e, "OCR failed, storing empty extraction");
            ExtractedData::default()
        }
    }
}
