//! SkillBridge — heuristic resume analysis with AI-assisted scoring.
//!
//! Pipeline: text extraction (PDF / DOCX / image-OCR) → heuristic parsing
//! and category detection → AI evaluation through a resilient multi-model,
//! multi-key dispatcher, with a deterministic keyword-overlap fallback.

pub mod catalog;
pub mod category;
pub mod config;
pub mod errors;
pub mod extract;
pub mod feedback;
pub mod llm;
pub mod parser;
pub mod pipeline;

pub use catalog::Catalog;
pub use errors::AppError;
pub use feedback::EvaluationReport;
pub use llm::GeminiClient;
