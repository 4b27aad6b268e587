//! Heuristic Parser — segments plain resume text into structured fields via
//! pattern and keyword rules. Pure and deterministic: no I/O, never fails,
//! missing data yields empty fields. This is best-effort extraction over
//! noisy formatting, not NLP.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Phone patterns, tried in order; the first pattern with a match wins.
static PHONE_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap(),
        Regex::new(r"\(\d{3}\)\s*\d{3}[-.]?\d{4}").unwrap(),
        Regex::new(r"\b\d{10}\b").unwrap(),
    ]
});

static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w-]+").unwrap());
static GITHUB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)github\.com/[\w-]+").unwrap());

/// Date patterns, tried in order: month-year, numeric month/year, bare year.
static DATE_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{4}\b")
            .unwrap(),
        Regex::new(r"\b\d{1,2}/\d{4}\b").unwrap(),
        Regex::new(r"\b\d{4}\b").unwrap(),
    ]
});

/// Canonical skill vocabulary. Membership is a case-insensitive substring
/// test of the resume text against each term.
const SKILL_VOCABULARY: &[&str] = &[
    // Programming languages
    "Python", "JavaScript", "Java", "C++", "C#", "PHP", "Ruby", "Go", "Rust", "Swift", "Kotlin",
    // Frontend
    "React", "Angular", "Vue", "TypeScript", "HTML", "CSS", "Sass", "Tailwind", "Bootstrap",
    // Backend
    "Node.js", "Django", "Flask", "Spring", "Express", "Laravel", "Ruby on Rails",
    // Databases
    "MySQL", "PostgreSQL", "MongoDB", "Redis", "Oracle", "SQLite", "Firebase",
    // DevOps
    "Docker", "Kubernetes", "AWS", "Azure", "GCP", "Jenkins", "Git", "CI/CD", "Terraform",
    // Data science
    "Machine Learning", "Deep Learning", "TensorFlow", "PyTorch", "Pandas", "NumPy",
    "Scikit-learn",
    // Mobile
    "Android", "iOS", "React Native", "Flutter", "Xamarin",
    // Tools
    "Jira", "Confluence", "Slack", "Figma", "Adobe XD", "Photoshop",
];

const TITLE_TOKENS: &[&str] = &[
    "engineer", "developer", "designer", "manager", "analyst", "specialist", "intern",
    "associate", "director", "lead", "architect",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "university", "college", "institute", "bachelor", "master", "phd", "diploma",
];

const SUMMARY_KEYWORDS: &[&str] = &["summary", "objective", "about", "profile"];

const CERT_KEYWORDS: &[&str] = &[
    "certified", "certification", "aws", "azure", "google cloud", "scrum", "pmp",
];

const PROJECT_KEYWORDS: &[&str] = &[
    "project", "portfolio", "github", "developed", "built", "created",
];

/// Best-effort contact details; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Structured record built once per document. Fields are best-effort and may
/// be empty or partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub contact: Contact,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub summary: String,
    pub certifications: Vec<String>,
    pub projects: Vec<Project>,
}

/// Per-keyword occurrence statistics from `keyword_density`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    pub count: usize,
    /// Occurrences per 10,000 words, rounded to 2 decimals.
    pub density: f64,
}

/// Segments resume text into structured fields. Identical input always
/// yields an identical result.
pub fn parse_resume(text: &str) -> ParsedResume {
    ParsedResume {
        contact: extract_contact(text),
        skills: extract_skills(text),
        experience: extract_experience(text),
        education: extract_education(text),
        summary: extract_summary(text),
        certifications: extract_certifications(text),
        projects: extract_projects(text),
    }
}

fn extract_contact(text: &str) -> Contact {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());

    let phone = PHONE_RES
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string());

    let linkedin = LINKEDIN_RE.find(text).map(|m| m.as_str().to_string());
    let github = GITHUB_RE.find(text).map(|m| m.as_str().to_string());

    Contact {
        email,
        phone,
        linkedin,
        github,
    }
}

/// De-duplicated skill set in vocabulary order (vocabulary order keeps the
/// output deterministic; callers treat it as a set).
fn extract_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut found = Vec::new();
    for skill in SKILL_VOCABULARY {
        if text_lower.contains(&skill.to_lowercase()) && !found.contains(&skill.to_string()) {
            found.push(skill.to_string());
        }
    }
    found
}

/// Sliding-window pass over indexed lines. A title line is one containing a
/// role-title token; its company is the nearest preceding non-empty line; a
/// date range is searched in the window `[i-3, i+3)`. Overlapping windows may
/// attach the same date pair to adjacent title lines — accepted noise.
fn extract_experience(text: &str) -> Vec<Experience> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if !TITLE_TOKENS.iter().any(|t| lower.contains(t)) {
            continue;
        }

        let company = lines[..i]
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty());
        let Some(company) = company else {
            continue; // a title with no company line above it is noise
        };

        let (start_date, end_date) = scan_date_window(&lines, i);

        records.push(Experience {
            title: line.to_string(),
            company: company.to_string(),
            start_date,
            end_date,
        });
    }

    records
}

/// Scans lines `[i-3, i+3)` with the ordered date patterns; the first line
/// where a pattern yields at least two matches provides the range. The end
/// date defaults to "Present" if a second token is somehow absent.
fn scan_date_window(lines: &[&str], i: usize) -> (Option<String>, Option<String>) {
    let from = i.saturating_sub(3);
    let to = (i + 3).min(lines.len());

    for line in &lines[from..to] {
        for re in DATE_RES.iter() {
            let dates: Vec<&str> = re.find_iter(line).map(|m| m.as_str()).collect();
            if dates.len() >= 2 {
                return (
                    Some(dates[0].to_string()),
                    Some(
                        dates
                            .get(1)
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "Present".to_string()),
                    ),
                );
            }
        }
    }

    (None, None)
}

fn extract_education(text: &str) -> Vec<Education> {
    let lines: Vec<&str> = text.lines().collect();
    let mut entries = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if EDUCATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            entries.push(Education {
                institution: line.trim().to_string(),
                details: lines
                    .get(i + 1)
                    .map(|l| l.trim().to_string())
                    .unwrap_or_default(),
            });
        }
    }

    entries
}

/// The first summary-keyword line anchors the section; up to 4 following
/// non-empty lines longer than 10 characters form the body.
fn extract_summary(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if SUMMARY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            let body: Vec<&str> = lines
                .iter()
                .skip(i + 1)
                .take(4)
                .map(|l| l.trim())
                .filter(|l| !l.is_empty() && l.len() > 10)
                .collect();
            return body.join(" ");
        }
    }

    String::new()
}

/// Every certification-keyword line, verbatim, in document order. Not
/// de-duplicated.
fn extract_certifications(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            CERT_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|line| line.trim().to_string())
        .collect()
}

/// A "project"/"built" line starts a new record; subsequent indicator lines
/// without those tokens extend the running description. Every record is kept:
/// the running record is flushed when the next title line starts and at end
/// of scan.
fn extract_projects(text: &str) -> Vec<Project> {
    let mut projects = Vec::new();
    let mut current: Option<Project> = None;

    for line in text.lines() {
        let lower = line.to_lowercase();
        if !PROJECT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }

        if lower.contains("project") || lower.contains("built") {
            if let Some(done) = current.take() {
                projects.push(done);
            }
            current = Some(Project {
                title: Some(line.trim().to_string()),
                description: None,
            });
        } else if let Some(proj) = current.as_mut() {
            match proj.description.as_mut() {
                None => proj.description = Some(line.trim().to_string()),
                Some(desc) => {
                    desc.push(' ');
                    desc.push_str(line.trim());
                }
            }
        }
    }

    if let Some(done) = current {
        projects.push(done);
    }

    projects
}

/// Per-keyword occurrence count and density per 10,000 words. Division is
/// guarded against documents with no words at all.
pub fn keyword_density(text: &str, keywords: &[&str]) -> BTreeMap<String, KeywordStat> {
    let text_lower = text.to_lowercase();
    let total_words = text_lower.split_whitespace().count();

    keywords
        .iter()
        .map(|keyword| {
            let count = text_lower.matches(&keyword.to_lowercase()).count();
            let density = (count as f64 / total_words.max(1) as f64) * 10_000.0;
            (
                keyword.to_string(),
                KeywordStat {
                    count,
                    density: (density * 100.0).round() / 100.0,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
John Doe
john.doe@example.com | 555-123-4567
linkedin.com/in/johndoe | github.com/johndoe

Summary
Seasoned backend engineer with a focus on reliability.
Led teams of up to six people.

Experience
Acme Corp
Senior Software Engineer
Jan 2019 - Mar 2023

Education
State University of Somewhere
B.S. Computer Science

AWS Certified Solutions Architect

Projects
Project Atlas - built an inventory system
Developed the reporting pipeline in Python and PostgreSQL
";

    #[test]
    fn test_contact_extraction() {
        let contact = extract_contact(SAMPLE);
        assert_eq!(contact.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(contact.linkedin.as_deref(), Some("linkedin.com/in/johndoe"));
        assert_eq!(contact.github.as_deref(), Some("github.com/johndoe"));
    }

    #[test]
    fn test_phone_parenthesized_area_code() {
        let contact = extract_contact("Call me at (555) 123-4567 anytime");
        assert_eq!(contact.phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_phone_bare_ten_digits() {
        let contact = extract_contact("Phone: 5551234567");
        assert_eq!(contact.phone.as_deref(), Some("5551234567"));
    }

    #[test]
    fn test_contact_absent_fields_are_none() {
        let contact = extract_contact("no contact details here");
        assert_eq!(contact, Contact::default());
    }

    #[test]
    fn test_skills_case_insensitive_canonical_output() {
        let skills = extract_skills("I know Python and react quite well");
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"React".to_string()));
        assert!(!skills.contains(&"Kubernetes".to_string()));
    }

    #[test]
    fn test_skills_deduplicated() {
        let skills = extract_skills("Python python PYTHON");
        assert_eq!(skills.iter().filter(|s| *s == "Python").count(), 1);
    }

    #[test]
    fn test_experience_title_company_and_dates() {
        let exp = extract_experience(SAMPLE);
        let atlas = exp
            .iter()
            .find(|e| e.title == "Senior Software Engineer")
            .unwrap();
        assert_eq!(atlas.company, "Acme Corp");
        assert_eq!(atlas.start_date.as_deref(), Some("Jan 2019"));
        assert_eq!(atlas.end_date.as_deref(), Some("Mar 2023"));
    }

    #[test]
    fn test_experience_title_on_first_line_skipped() {
        // A title with nothing above it has no company and yields no record.
        let exp = extract_experience("Software Engineer\nAcme Corp");
        assert!(exp.is_empty());
    }

    #[test]
    fn test_experience_no_dates_in_window() {
        let exp = extract_experience("Acme Corp\nSoftware Engineer\nDid things well");
        assert_eq!(exp.len(), 1);
        assert!(exp[0].start_date.is_none());
        assert!(exp[0].end_date.is_none());
    }

    #[test]
    fn test_education_entry_with_details() {
        let edu = extract_education(SAMPLE);
        assert_eq!(edu.len(), 1);
        assert_eq!(edu[0].institution, "State University of Somewhere");
        assert_eq!(edu[0].details, "B.S. Computer Science");
    }

    #[test]
    fn test_education_keyword_on_last_line_has_empty_details() {
        let edu = extract_education("Some text\nNorth College");
        assert_eq!(edu.len(), 1);
        assert_eq!(edu[0].details, "");
    }

    #[test]
    fn test_summary_joins_following_lines() {
        let summary = extract_summary(SAMPLE);
        assert!(summary.contains("Seasoned backend engineer"));
        assert!(summary.contains("Led teams of up to six people."));
    }

    #[test]
    fn test_summary_absent_is_empty() {
        assert_eq!(extract_summary("just some text\nwith no section headers"), "");
    }

    #[test]
    fn test_summary_skips_short_lines() {
        let summary = extract_summary("Objective\nhi\nA longer line about goals here");
        assert_eq!(summary, "A longer line about goals here");
    }

    #[test]
    fn test_certifications_verbatim_no_dedup() {
        let certs = extract_certifications("AWS Certified\nScrum Master\nAWS Certified");
        assert_eq!(certs.len(), 3);
        assert_eq!(certs[0], "AWS Certified");
    }

    #[test]
    fn test_projects_keeps_every_record() {
        let text = "\
Project Alpha - built a chat app
Developed the websocket layer
Project Beta
Created the deployment tooling";
        let projects = extract_projects(text);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title.as_deref(), Some("Project Alpha - built a chat app"));
        assert_eq!(
            projects[0].description.as_deref(),
            Some("Developed the websocket layer")
        );
        assert_eq!(projects[1].title.as_deref(), Some("Project Beta"));
        assert_eq!(
            projects[1].description.as_deref(),
            Some("Created the deployment tooling")
        );
    }

    #[test]
    fn test_projects_description_lines_concatenate() {
        let text = "Project Gamma\nDeveloped module one\nCreated module two";
        let projects = extract_projects(text);
        assert_eq!(projects.len(), 1);
        assert_eq!(
            projects[0].description.as_deref(),
            Some("Developed module one Created module two")
        );
    }

    #[test]
    fn test_keyword_density_counts_and_rounds() {
        // 8 words total, "python" occurs twice: 2/8 * 10000 = 2500.00
        let text = "python is great and python is very fast";
        let stats = keyword_density(text, &["Python", "java"]);
        assert_eq!(stats["Python"].count, 2);
        assert!((stats["Python"].density - 2500.0).abs() < f64::EPSILON);
        assert_eq!(stats["java"].count, 0);
        assert_eq!(stats["java"].density, 0.0);
    }

    #[test]
    fn test_keyword_density_zero_words_guarded() {
        let stats = keyword_density("", &["python"]);
        assert_eq!(stats["python"].count, 0);
        assert_eq!(stats["python"].density, 0.0);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_resume(SAMPLE);
        let second = parse_resume(SAMPLE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_empty_text_yields_empty_resume() {
        let parsed = parse_resume("");
        assert_eq!(parsed, ParsedResume::default());
    }
}
