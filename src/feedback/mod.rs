//! Feedback Synthesizer — builds the evaluation prompt, invokes the AI
//! caller, validates the structured result, and falls back to a
//! deterministic keyword-overlap scorer whenever the AI path fails. The
//! user-visible evaluation never fails solely because the provider is down.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{Catalog, Role};
use crate::category::detect_category;
use crate::feedback::prompts::EVALUATION_PROMPT_TEMPLATE;
use crate::llm::GeminiClient;

pub mod prompts;

/// Resume text beyond this many characters is not sent to the model.
const RESUME_EXCERPT_CHARS: usize = 6000;
/// JD text beyond this many characters is not sent to the model.
const JD_EXCERPT_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillAnalysis {
    pub present: Vec<String>,
    pub missing: Vec<String>,
    pub match_percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalGap {
    pub gap: String,
    pub priority: String,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentResource {
    pub title: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub duration: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecommendation {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeImprovement {
    pub current: String,
    pub improved: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerRoadmap {
    pub short_term: String,
    pub medium_term: String,
    pub long_term: String,
}

/// The structured evaluation as described to the model. Deserializing into
/// this type *is* the schema check; anything that does not fit is a
/// malformed response and triggers the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub compatibility_score: u32,
    pub score_explanation: String,
    pub skill_analysis: SkillAnalysis,
    pub critical_gaps: Vec<CriticalGap>,
    pub professional_development: Vec<DevelopmentResource>,
    pub youtube_recommendations: Vec<VideoRecommendation>,
    pub interview_questions: Vec<String>,
    pub resume_improvements: Vec<ResumeImprovement>,
    pub career_roadmap: CareerRoadmap,
    pub salary_benchmark: String,
    pub final_assessment: String,
    pub confidence_level: String,
}

impl Evaluation {
    /// Bounds the model can describe but not enforce. A violation is treated
    /// the same as a parse failure.
    fn validate(&self) -> Result<(), String> {
        if self.compatibility_score > 100 {
            return Err(format!(
                "compatibility_score {} out of range",
                self.compatibility_score
            ));
        }
        if self.skill_analysis.match_percentage > 100 {
            return Err(format!(
                "match_percentage {} out of range",
                self.skill_analysis.match_percentage
            ));
        }
        Ok(())
    }
}

/// Final evaluation record: the model (or fallback) output plus request
/// annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub analysis_date: String,
    pub role_applied: String,
    pub industry_category: String,
    pub detected_resume_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch_warning: Option<String>,
}

/// Evaluates a resume against a catalog role. Detects the resume's own
/// category first and attaches a mismatch advisory when it points at a
/// different industry than the applied role.
pub async fn evaluate(
    resume_text: &str,
    role_name: &str,
    catalog: &Catalog,
    llm: &GeminiClient,
    jd_text: Option<&str>,
) -> EvaluationReport {
    let role = catalog.get(role_name);
    let role_category = role
        .map(|r| r.category.clone())
        .unwrap_or_else(|| "General".to_string());
    let resume_category = detect_category(resume_text, catalog);

    let mismatch_warning = build_mismatch_warning(&resume_category, &role_category, role_name);

    let prompt = build_prompt(
        resume_text,
        role_name,
        &role_category,
        mismatch_warning.as_deref(),
        jd_text,
    );

    match llm.generate_json::<Evaluation>(&prompt).await {
        Ok(evaluation) => match evaluation.validate() {
            Ok(()) => {
                info!(
                    "Analysis successful: {}%",
                    evaluation.compatibility_score
                );
                EvaluationReport {
                    evaluation,
                    analysis_date: now_stamp(),
                    role_applied: role_name.to_string(),
                    industry_category: role_category,
                    detected_resume_category: resume_category,
                    mismatch_warning,
                }
            }
            Err(reason) => {
                warn!("Model returned out-of-schema values ({reason}); using fallback scorer");
                fallback_report(resume_text, role_name, role, &role_category, &resume_category)
            }
        },
        Err(e) => {
            warn!("AI evaluation failed ({e}); using fallback scorer");
            fallback_report(resume_text, role_name, role, &role_category, &resume_category)
        }
    }
}

fn build_mismatch_warning(
    resume_category: &str,
    role_category: &str,
    role_name: &str,
) -> Option<String> {
    if resume_category != role_category && resume_category != "General" {
        Some(format!(
            "Resume seems to be {resume_category}-focused, but you applied for a {role_category} role ({role_name})."
        ))
    } else {
        None
    }
}

fn build_prompt(
    resume_text: &str,
    role_name: &str,
    role_category: &str,
    mismatch_warning: Option<&str>,
    jd_text: Option<&str>,
) -> String {
    let excerpt: String = resume_text.chars().take(RESUME_EXCERPT_CHARS).collect();
    let jd_section = match jd_text {
        Some(jd) if !jd.trim().is_empty() => {
            let jd_excerpt: String = jd.chars().take(JD_EXCERPT_CHARS).collect();
            format!("JOB DESCRIPTION: {jd_excerpt}\n")
        }
        _ => String::new(),
    };

    EVALUATION_PROMPT_TEMPLATE
        .replace("{role}", role_name)
        .replace("{category}", role_category)
        .replace("{resume_excerpt}", &excerpt)
        .replace("{context}", mismatch_warning.unwrap_or(""))
        .replace("{jd_section}", &jd_section)
}

/// Case-insensitive substring membership of each catalog skill in the resume
/// text, plus the rounded overlap percentage.
fn skill_overlap(resume_text: &str, skills: &[String]) -> (Vec<String>, Vec<String>, u32) {
    let resume_lower = resume_text.to_lowercase();
    let (present, missing): (Vec<String>, Vec<String>) = skills
        .iter()
        .cloned()
        .partition(|s| resume_lower.contains(&s.to_lowercase()));

    let match_percentage = if skills.is_empty() {
        0
    } else {
        ((present.len() as f64 / skills.len() as f64) * 100.0).round() as u32
    };

    (present, missing, match_percentage)
}

/// Deterministic keyword-overlap evaluation used when the AI path is
/// unavailable or returns malformed output.
fn fallback_report(
    resume_text: &str,
    role_name: &str,
    role: Option<&Role>,
    role_category: &str,
    resume_category: &str,
) -> EvaluationReport {
    let role_skills: Vec<String> = role.map(|r| r.skills.clone()).unwrap_or_default();
    let (present, missing, match_percentage) = skill_overlap(resume_text, &role_skills);

    let learn_target = missing.first().map(|s| s.as_str()).unwrap_or(role_name);
    let critical_gaps = missing
        .iter()
        .take(3)
        .map(|skill| CriticalGap {
            gap: skill.clone(),
            priority: "High".to_string(),
            impact: "Missing skill".to_string(),
        })
        .collect();

    let evaluation = Evaluation {
        compatibility_score: match_percentage,
        score_explanation: "Basic keyword analysis (AI unavailable).".to_string(),
        skill_analysis: SkillAnalysis {
            present,
            missing: missing.clone(),
            match_percentage,
        },
        critical_gaps,
        professional_development: vec![DevelopmentResource {
            title: format!("Learn {learn_target}"),
            provider: "YouTube".to_string(),
            resource_type: "Self-study".to_string(),
            duration: "Variable".to_string(),
            link: format!(
                "https://www.youtube.com/results?search_query=Learn+{}",
                learn_target.replace(' ', "+")
            ),
        }],
        youtube_recommendations: vec![VideoRecommendation {
            title: format!("{role_name} Crash Course"),
            link: format!(
                "https://www.youtube.com/results?search_query={}+crash+course",
                role_name.replace(' ', "+")
            ),
        }],
        interview_questions: vec![
            "Tell me about yourself.".to_string(),
            "Strengths?".to_string(),
            "Weaknesses?".to_string(),
        ],
        resume_improvements: vec![ResumeImprovement {
            current: "N/A".to_string(),
            improved: "N/A".to_string(),
            reason: "AI unavailable".to_string(),
        }],
        career_roadmap: CareerRoadmap {
            short_term: "Learn basics".to_string(),
            medium_term: "Build projects".to_string(),
            long_term: "Senior role".to_string(),
        },
        salary_benchmark: role
            .map(|r| r.salary_range.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        final_assessment: "Try again later for full AI analysis.".to_string(),
        confidence_level: "Low".to_string(),
    };

    EvaluationReport {
        evaluation,
        analysis_date: now_stamp(),
        role_applied: role_name.to_string(),
        industry_category: role_category.to_string(),
        detected_resume_category: resume_category.to_string(),
        mismatch_warning: build_mismatch_warning(resume_category, role_category, role_name),
    }
}

fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// A ready-made fallback-shaped report for tests in other modules.
    pub fn low_confidence_report(role_name: &str, score: u32) -> EvaluationReport {
        let mut report = fallback_report("", role_name, None, "General", "General");
        report.evaluation.compatibility_score = score;
        report
    }
}
