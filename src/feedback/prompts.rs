// Prompt constants for the Feedback Synthesizer. The schema is described to
// the model here and enforced on our side by typed deserialization.

/// Evaluation prompt template. Replace `{role}`, `{category}`,
/// `{resume_excerpt}`, `{context}`, and `{jd_section}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert Career Coach. Analyze this resume for a {role} position ({category}).
RESUME: {resume_excerpt}
CONTEXT: {context}
{jd_section}
Return a VALID JSON OBJECT.
JSON Schema:
{
    "compatibility_score": (integer 0-100),
    "score_explanation": (string),
    "skill_analysis": {
        "present": [(list string)],
        "missing": [(list string)],
        "match_percentage": (integer 0-100)
    },
    "critical_gaps": [
        {"gap": (string), "priority": "High/Medium", "impact": (string)}
    ],
    "professional_development": [
        {"title": (string), "provider": (string), "type": "Course/Project", "duration": (string), "link": (string)}
    ],
    "youtube_recommendations": [
        {"title": (string), "link": (string)}
    ],
    "interview_questions": [(list string)],
    "resume_improvements": [
        {"current": (string), "improved": (string), "reason": (string)}
    ],
    "career_roadmap": {
        "short_term": (string), "medium_term": (string), "long_term": (string)
    },
    "salary_benchmark": (string),
    "final_assessment": (string),
    "confidence_level": "High/Medium"
}
"#;
