//! End-to-end analysis orchestration: extract → content gate → evaluate.
//! Extraction-stage errors are terminal for the request; evaluation-stage AI
//! failures are absorbed inside the synthesizer.

use tracing::info;

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::extract::{extract_text, MIN_TEXT_CHARS};
use crate::feedback::{evaluate, EvaluationReport};
use crate::llm::GeminiClient;

/// Runs the full pipeline for one uploaded document. The minimum-content
/// check runs before any evaluation AI call so an unreadable upload never
/// burns a provider attempt.
pub async fn analyze(
    bytes: &[u8],
    filename: &str,
    role: &str,
    jd_text: Option<&str>,
    catalog: &Catalog,
    llm: &GeminiClient,
) -> Result<EvaluationReport, AppError> {
    let resume_text = extract_text(bytes, filename, llm).await?;

    let trimmed_len = resume_text.trim().chars().count();
    if trimmed_len < MIN_TEXT_CHARS {
        return Err(AppError::EmptyDocument { chars: trimmed_len });
    }

    info!("Extracted {trimmed_len} characters from '{filename}'");
    Ok(evaluate(&resume_text, role, catalog, llm, jd_text).await)
}

/// Short plain-text report for download.
pub fn render_text_report(report: &EvaluationReport) -> String {
    format!(
        "SkillBridge Report\nRole: {}\nScore: {}%\n",
        report.role_applied, report.evaluation.compatibility_score
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{AttemptError, Part, ProviderTransport};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoNetworkTransport;

    #[async_trait]
    impl ProviderTransport for NoNetworkTransport {
        async fn attempt(
            &self,
            _model: &str,
            _api_key: &str,
            _parts: &[Part],
        ) -> Result<String, AttemptError> {
            panic!("network attempt was not expected in this test");
        }
    }

    fn offline_client() -> GeminiClient {
        GeminiClient::with_transport(
            Arc::new(NoNetworkTransport),
            vec!["model-a".to_string()],
            vec!["k1".to_string()],
        )
    }

    #[tokio::test]
    async fn test_unsupported_extension_fails_before_any_ai_call() {
        let catalog = Catalog::builtin().unwrap();
        let err = analyze(
            b"some bytes",
            "resume.txt",
            "Backend Developer",
            None,
            &catalog,
            &offline_client(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_text_report_contains_role_and_score() {
        let report = crate::feedback::test_support::low_confidence_report("Backend Developer", 30);
        let text = render_text_report(&report);
        assert!(text.contains("Backend Developer"));
        assert!(text.contains("30%"));
    }
}
