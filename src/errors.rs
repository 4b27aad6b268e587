use thiserror::Error;

use crate::llm::LlmError;

/// Application-level error type.
/// Extraction-stage errors are terminal for a request; evaluation-stage AI
/// failures never reach this type — they are absorbed by the fallback scorer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file format '{0}'. Please upload PDF, DOCX, or Image (JPG/PNG/WEBP).")]
    UnsupportedFormat(String),

    #[error("Could not read the document: {0}")]
    Extraction(String),

    #[error("Resume appears empty or unreadable ({chars} characters extracted). Try a clearer file.")]
    EmptyDocument { chars: usize },

    #[error("AI provider error: {0}")]
    Llm(#[from] LlmError),
}
