//! Advisor: typed generation requests built on top of `llm_client`.
//!
//! Each structured request embeds the caller's inputs in a prompt, issues exactly one
//! call, and extracts a JSON array from the reply. Failures never propagate: they come
//! back as `GenerationOutcome::Unavailable` so the caller can tell "the model could not
//! be reached" apart from "the model found nothing".

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::llm_client::prompts::{JSON_ARRAY_ONLY, STRUCTURED, STRUCTURED_LONG};
use crate::llm_client::{GeminiClient, LlmError};
use crate::models::career::{CourseSuggestion, ResourceLink};
use crate::models::null_default;
use crate::models::profile::UserProfile;

pub mod mentor;
pub mod prompts;

use prompts::{RECOMMENDATIONS_PROMPT_TEMPLATE, ROADMAP_PROMPT_TEMPLATE, SKILL_GAP_PROMPT_TEMPLATE};

/// Result of a structured generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome<T> {
    Generated(T),
    /// The endpoint could not produce a usable answer; carries the reason for logs.
    Unavailable(String),
}

impl<T> GenerationOutcome<T> {
    fn from_result(result: Result<T, LlmError>, request: &str) -> Self {
        match result {
            Ok(value) => GenerationOutcome::Generated(value),
            Err(e) => {
                warn!("{request} generation unavailable: {e}");
                GenerationOutcome::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, GenerationOutcome::Unavailable(_))
    }
}

impl<T> GenerationOutcome<Vec<T>> {
    /// Collapses to the legacy contract: an empty list whenever generation failed.
    pub fn into_items(self) -> Vec<T> {
        match self {
            GenerationOutcome::Generated(items) => items,
            GenerationOutcome::Unavailable(_) => Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model output shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendationDraft {
    pub career_title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_default")]
    pub market_demand: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub salary_range: String,
    #[serde(default, deserialize_with = "null_default")]
    pub growth_outlook: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoadmapDraft {
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub difficulty_level: String,
    #[serde(default, deserialize_with = "null_default")]
    pub estimated_duration: String,
    #[serde(default, deserialize_with = "null_default")]
    pub resource_links: Vec<ResourceLink>,
    #[serde(default, deserialize_with = "null_default")]
    pub certification_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillGapDraft {
    pub missing_skill: String,
    #[serde(default, deserialize_with = "null_default")]
    pub importance: String,
    #[serde(default, deserialize_with = "null_default")]
    pub course_suggestions: Vec<CourseSuggestion>,
}

/// Models sometimes quote numbers ("85"), append a percent sign, or send `null`.
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Score>::deserialize(deserializer)? {
        Some(Score::Number(n)) => n,
        Some(Score::Text(s)) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

/// Asks for exactly five ranked career recommendations for the profile.
pub async fn generate_recommendations(
    llm: &GeminiClient,
    profile: &UserProfile,
) -> GenerationOutcome<Vec<RecommendationDraft>> {
    let prompt = build_recommendations_prompt(profile);
    let result = llm.call_json_array(&prompt, STRUCTURED).await;
    let outcome = GenerationOutcome::from_result(result, "Recommendation");
    if let GenerationOutcome::Generated(items) = &outcome {
        info!("Model proposed {} careers for user {}", items.len(), profile.id);
    }
    outcome
}

/// Asks for an ordered list of learning milestones toward `career_title`.
pub async fn generate_roadmap(
    llm: &GeminiClient,
    career_title: &str,
    current_skills: &[String],
    required_skills: &[String],
) -> GenerationOutcome<Vec<RoadmapDraft>> {
    let prompt = build_roadmap_prompt(career_title, current_skills, required_skills);
    let result = llm.call_json_array(&prompt, STRUCTURED_LONG).await;
    GenerationOutcome::from_result(result, "Roadmap")
}

/// Asks for course suggestions covering every required skill the user lacks.
/// With nothing missing, no call is made and the outcome is a genuine empty list.
pub async fn analyze_skill_gaps(
    llm: &GeminiClient,
    career_title: &str,
    current_skills: &[String],
    required_skills: &[String],
) -> GenerationOutcome<Vec<SkillGapDraft>> {
    let missing = missing_skills(current_skills, required_skills);
    if missing.is_empty() {
        info!("No missing skills for {career_title}; skipping skill-gap analysis");
        return GenerationOutcome::Generated(Vec::new());
    }

    let prompt = build_skill_gap_prompt(career_title, current_skills, &missing);
    let result = llm.call_json_array(&prompt, STRUCTURED).await;
    GenerationOutcome::from_result(result, "Skill-gap")
}

/// A required skill is covered when any current skill contains it, ignoring case.
pub fn missing_skills(current_skills: &[String], required_skills: &[String]) -> Vec<String> {
    let current: Vec<String> = current_skills.iter().map(|s| s.to_lowercase()).collect();
    required_skills
        .iter()
        .filter(|req| {
            let needle = req.to_lowercase();
            !current.iter().any(|c| c.contains(&needle))
        })
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"))
}

/// Fills `{name}` placeholders in one pass, so user text containing braces is never
/// re-expanded. Unknown placeholders are left untouched.
pub(crate) fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let values: HashMap<&str, &str> = values.iter().copied().collect();
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
            Some(v) => (*v).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn build_recommendations_prompt(profile: &UserProfile) -> String {
    let skills = profile.skills.join(", ");
    fill_template(
        RECOMMENDATIONS_PROMPT_TEMPLATE,
        &[
            ("skills", skills.as_str()),
            ("goals", profile.goals.as_str()),
            ("education", profile.primary_education()),
            ("bio", profile.bio.as_str()),
            ("format", JSON_ARRAY_ONLY),
        ],
    )
}

fn build_roadmap_prompt(
    career_title: &str,
    current_skills: &[String],
    required_skills: &[String],
) -> String {
    let current = current_skills.join(", ");
    let required = required_skills.join(", ");
    fill_template(
        ROADMAP_PROMPT_TEMPLATE,
        &[
            ("career_title", career_title),
            ("current_skills", current.as_str()),
            ("required_skills", required.as_str()),
            ("format", JSON_ARRAY_ONLY),
        ],
    )
}

fn build_skill_gap_prompt(
    career_title: &str,
    current_skills: &[String],
    missing_skills: &[String],
) -> String {
    let current = current_skills.join(", ");
    let missing = missing_skills.join(", ");
    fill_template(
        SKILL_GAP_PROMPT_TEMPLATE,
        &[
            ("career_title", career_title),
            ("current_skills", current.as_str()),
            ("missing_skills", missing.as_str()),
            ("format", JSON_ARRAY_ONLY),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::test_support::{client_for, reply};
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;
    use std::collections::BTreeMap;
    use uuid::Uuid;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm_client::parse_json_array;
    use crate::models::profile::EducationEntry;

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            display_name: "Grace".to_string(),
            bio: "Backend developer".to_string(),
            display_picture_url: None,
            resume_url: None,
            education: Json(vec![EducationEntry {
                institution: "State University".to_string(),
            }]),
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            goals: "Lead a platform team".to_string(),
            social_links: Json(BTreeMap::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_skills_uses_case_insensitive_containment() {
        let current = vec!["Advanced Python".to_string(), "docker".to_string()];
        let required = vec![
            "python".to_string(),
            "Docker".to_string(),
            "Kubernetes".to_string(),
        ];
        assert_eq!(missing_skills(&current, &required), vec!["Kubernetes"]);
    }

    #[test]
    fn test_fill_template_does_not_reexpand_values() {
        let out = fill_template("{a} and {b} and {c}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(out, "{b} and two and {c}");
    }

    #[test]
    fn test_recommendation_prompt_embeds_profile() {
        let prompt = build_recommendations_prompt(&profile());
        assert!(prompt.contains("- Skills: Rust, PostgreSQL"));
        assert!(prompt.contains("- Career Goals: Lead a platform team"));
        assert!(prompt.contains("- Education: State University"));
        assert!(prompt.contains("exactly 5"));
        assert!(prompt.ends_with(JSON_ARRAY_ONLY));
    }

    #[test]
    fn test_lenient_score_accepts_strings() {
        let draft: RecommendationDraft = serde_json::from_value(json!({
            "career_title": "SRE",
            "confidence_score": "88%"
        }))
        .unwrap();
        assert_eq!(draft.confidence_score, 88.0);
        assert!(draft.required_skills.is_empty());
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let roadmap: Vec<RoadmapDraft> = parse_json_array(
            r#"Plan: [{"title": "SQL", "description": null, "difficulty_level": null,
                "estimated_duration": "2 weeks", "certification_paths": null,
                "resource_links": [{"title": "Docs", "url": null, "type": null}]}]"#,
        )
        .unwrap();
        assert_eq!(roadmap[0].description, "");
        assert!(roadmap[0].certification_paths.is_empty());
        assert_eq!(roadmap[0].resource_links[0].url, "");
        assert_eq!(roadmap[0].resource_links[0].kind, "");

        let recs: Vec<RecommendationDraft> = parse_json_array(
            r#"[{"career_title": "SRE", "summary": null, "confidence_score": null,
                "required_skills": null, "market_demand": "High"}]"#,
        )
        .unwrap();
        assert_eq!(recs[0].confidence_score, 0.0);
        assert!(recs[0].required_skills.is_empty());
        assert_eq!(recs[0].summary, "");

        let gaps: Vec<SkillGapDraft> = parse_json_array(
            r#"[{"missing_skill": "Go", "importance": null,
                "course_suggestions": [{"title": "Go Tour", "provider": null, "url": null}]}]"#,
        )
        .unwrap();
        assert_eq!(gaps[0].importance, "");
        assert_eq!(gaps[0].course_suggestions[0].provider, "");
    }

    #[tokio::test]
    async fn test_recommendations_parse_wrapped_json() {
        let server = MockServer::start().await;
        let text = r#"Sure! Here are your careers:
[{"career_title": "Platform Engineer", "summary": "Builds internal platforms.",
  "market_demand": "High", "confidence_score": 90,
  "required_skills": ["Rust", "Kubernetes"], "salary_range": "$140k-$190k",
  "growth_outlook": "Strong"}]
Good luck!"#;
        Mock::given(method("POST"))
            .and(body_string_contains("exactly 5 personalized career recommendations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(text)))
            .mount(&server)
            .await;

        let outcome = generate_recommendations(&client_for(&server), &profile()).await;
        let items = outcome.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].career_title, "Platform Engineer");
        assert_eq!(items[0].required_skills, vec!["Rust", "Kubernetes"]);
    }

    #[tokio::test]
    async fn test_roadmap_without_array_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(reply("I'd rather not say {}")),
            )
            .mount(&server)
            .await;

        let skills = vec!["Rust".to_string()];
        let outcome =
            generate_roadmap(&client_for(&server), "Platform Engineer", &skills, &skills).await;
        assert!(outcome.is_unavailable());
        assert!(outcome.into_items().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_unavailable() {
        // Nothing listens on port 9 (discard); the connection is refused.
        let llm = GeminiClient::new("http://127.0.0.1:9/".to_string(), Some("k".to_string()));
        let required = vec!["Go".to_string()];
        let outcome = analyze_skill_gaps(&llm, "Backend Engineer", &[], &required).await;
        assert!(outcome.is_unavailable());
        assert_eq!(outcome.into_items(), Vec::<SkillGapDraft>::new());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let llm = GeminiClient::new("http://127.0.0.1:9/".to_string(), None);
        let outcome = generate_recommendations(&llm, &profile()).await;
        assert!(outcome.is_unavailable());
    }

    #[tokio::test]
    async fn test_skill_gaps_skip_call_when_nothing_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let current = vec!["Rust".to_string(), "SQL".to_string()];
        let required = vec!["rust".to_string()];
        let outcome =
            analyze_skill_gaps(&client_for(&server), "Backend Engineer", &current, &required)
                .await;
        assert_eq!(outcome, GenerationOutcome::Generated(vec![]));
    }

    #[tokio::test]
    async fn test_skill_gap_prompt_lists_only_missing_skills() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Missing Skills: Terraform"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(
                r#"[{"missing_skill": "Terraform", "importance": "High",
                    "course_suggestions": [{"title": "IaC 101", "provider": "Acme", "url": "https://example.com"}]}]"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let current = vec!["Rust".to_string()];
        let required = vec!["Rust".to_string(), "Terraform".to_string()];
        let gaps = analyze_skill_gaps(&client_for(&server), "SRE", &current, &required)
            .await
            .into_items();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].course_suggestions[0].provider, "Acme");
    }
}
