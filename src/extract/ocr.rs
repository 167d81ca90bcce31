use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine failure: {0}")]
    Engine(String),
}

/// Text recognized from one image, with the engine's confidence on a
/// 0 to 100 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
    pub confidence: f32,
}

/// Seam for the OCR backend. Handlers never talk to an engine directly;
/// they go through the extraction pipeline so a failing or missing engine
/// degrades to manual data entry.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<OcrOutput, OcrError>;
}

/// Stand-in engine used while no on-device OCR backend is wired up. Returns
/// a fixed notice so the stored raw text tells the user what happened.
pub struct DisabledOcrEngine;

impl OcrEngine for DisabledOcrEngine {
    fn recognize(&self, _image: &[u8]) -> Result<OcrOutput, OcrError> {
        Ok(OcrOutput {
            text: "OCR temporarily disabled - please verify data manually".to_string(),
            confidence: 0.0,
        })
    }
}
