//! Agent Pipeline — four LLM steps composed into one career analysis.
//!
//! Flow: skill assessment + market demand (joined, no mutual dependency) →
//! skill gap → learning path. Each step wraps prompt construction → one
//! completion call → JSON extraction → schema validation, under the injected
//! `RetryPolicy`. Any failure inside a step consumes one attempt; once the
//! budget is spent the last error propagates unmodified to the HTTP layer.
//! No partial results survive a terminal failure.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::agents::extract::{extract_json, ExtractError};
use crate::agents::prompts;
use crate::agents::retry::RetryPolicy;
use crate::agents::schemas::{LearningPathProfile, MarketProfile, SkillGapProfile, SkillProfile};
use crate::llm_client::{CompletionClient, LlmError};
use crate::scoring::initial_readiness;

/// Failure of a single pipeline step. Every variant is retryable within the
/// step's attempt budget; after exhaustion the error is terminal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("LLM transport error: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("schema validation failed in {step} step: {message}")]
    Schema { step: &'static str, message: String },
}

/// Aggregate result of one full analysis run. All four profiles are fresh,
/// immutable instances; nothing is cached across runs.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub skill_profile: SkillProfile,
    pub market_profile: MarketProfile,
    pub skill_gap: SkillGapProfile,
    pub learning_path: LearningPathProfile,
}

/// Runs the full pipeline for one resume/role pair.
///
/// `resume_text` must already be truncated to the prompt budget — truncation
/// happens once before the pipeline starts, never per retry.
pub async fn run_analysis(
    llm: &dyn CompletionClient,
    retry: &RetryPolicy,
    resume_text: &str,
    target_role: &str,
) -> Result<AnalysisOutcome, PipelineError> {
    // Steps 1 and 2 share no data; join them and fail fast on either.
    let (skill_profile, market_profile) = tokio::try_join!(
        assess_skills(llm, retry, resume_text),
        assess_market(llm, retry, target_role),
    )?;
    info!(
        skills = skill_profile.skills.len(),
        required = market_profile.required_skills.len(),
        "profiles assessed"
    );

    let skill_gap = assess_skill_gap(
        llm,
        retry,
        &skill_profile.skills,
        &market_profile.required_skills,
    )
    .await?;
    info!(
        missing = skill_gap.missing_skills.len(),
        priority = %skill_gap.priority,
        "skill gap derived"
    );

    let learning_path = build_learning_path(llm, retry, &skill_gap).await?;
    info!(
        tasks = learning_path.task_count(),
        score = learning_path.career_readiness_score,
        "learning path built"
    );

    Ok(AnalysisOutcome {
        skill_profile,
        market_profile,
        skill_gap,
        learning_path,
    })
}

/// Step 1: extract a skill profile from resume text.
pub async fn assess_skills(
    llm: &dyn CompletionClient,
    retry: &RetryPolicy,
    resume_text: &str,
) -> Result<SkillProfile, PipelineError> {
    let prompt = prompts::skill_assessment_prompt(resume_text);
    run_step(llm, retry, "skill-assessment", &prompt, no_extra_checks).await
}

/// Step 2: profile market demand for the target role.
pub async fn assess_market(
    llm: &dyn CompletionClient,
    retry: &RetryPolicy,
    target_role: &str,
) -> Result<MarketProfile, PipelineError> {
    let prompt = prompts::market_demand_prompt(target_role);
    run_step(llm, retry, "market-demand", &prompt, no_extra_checks).await
}

/// Step 3: assess the gap between the user's skills and the market's.
///
/// The model supplies the priority; `missing_skills` is normalized to the
/// exact set difference so the invariant holds under any model output.
pub async fn assess_skill_gap(
    llm: &dyn CompletionClient,
    retry: &RetryPolicy,
    user_skills: &[String],
    market_skills: &[String],
) -> Result<SkillGapProfile, PipelineError> {
    let prompt = prompts::skill_gap_prompt(user_skills, market_skills);
    let mut gap: SkillGapProfile =
        run_step(llm, retry, "skill-gap", &prompt, no_extra_checks).await?;
    gap.missing_skills = derive_missing_skills(user_skills, market_skills);
    Ok(gap)
}

/// Step 4: build the 30/60/90 learning roadmap for the gap.
///
/// The readiness score is stamped from the initial scoring rule, not taken
/// from the model.
pub async fn build_learning_path(
    llm: &dyn CompletionClient,
    retry: &RetryPolicy,
    skill_gap: &SkillGapProfile,
) -> Result<LearningPathProfile, PipelineError> {
    let prompt = prompts::learning_path_prompt(skill_gap);
    let mut path: LearningPathProfile = run_step(
        llm,
        retry,
        "learning-path",
        &prompt,
        LearningPathProfile::validate,
    )
    .await?;
    path.career_readiness_score = initial_readiness(skill_gap.missing_skills.len());
    Ok(path)
}

/// Market-required skills absent from the user's skills. Pure set difference:
/// order follows the market list, duplicates collapse.
pub fn derive_missing_skills(user_skills: &[String], market_skills: &[String]) -> Vec<String> {
    let have: HashSet<&str> = user_skills.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    market_skills
        .iter()
        .filter(|skill| !have.contains(skill.as_str()))
        .filter(|skill| seen.insert(skill.as_str()))
        .cloned()
        .collect()
}

/// Runs one step under the retry policy: sleep the fixed delay before every
/// attempt but the first, and keep the last error for the terminal report.
async fn run_step<T, F>(
    llm: &dyn CompletionClient,
    retry: &RetryPolicy,
    step: &'static str,
    prompt: &str,
    check: F,
) -> Result<T, PipelineError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), String>,
{
    let mut last_error: Option<PipelineError> = None;

    for attempt in 1..=retry.max_attempts {
        if attempt > 1 {
            tokio::time::sleep(retry.delay).await;
        }

        match attempt_step(llm, step, prompt, &check).await {
            Ok(value) => {
                if attempt > 1 {
                    info!(step, attempt, "agent step recovered");
                }
                return Ok(value);
            }
            Err(error) => {
                warn!(
                    step,
                    attempt,
                    max_attempts = retry.max_attempts,
                    %error,
                    "agent step attempt failed"
                );
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or(PipelineError::Schema {
        step,
        message: "retry budget exhausted before any attempt".to_string(),
    }))
}

/// One attempt: full prompt re-sent, full cost incurred. No partial-result
/// caching between attempts.
async fn attempt_step<T, F>(
    llm: &dyn CompletionClient,
    step: &'static str,
    prompt: &str,
    check: &F,
) -> Result<T, PipelineError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), String>,
{
    let raw = llm.complete(prompt).await?;
    debug!(step, chars = raw.len(), "raw response received");

    let value = extract_json(&raw)?;
    let parsed: T = serde_json::from_value(value).map_err(|e| PipelineError::Schema {
        step,
        message: e.to_string(),
    })?;
    check(&parsed).map_err(|message| PipelineError::Schema { step, message })?;
    Ok(parsed)
}

/// Steps whose schema needs no checks beyond deserialization.
fn no_extra_checks<T>(_: &T) -> Result<(), String> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::agents::schemas::ROADMAP_TOTAL_TASKS;
    use crate::llm_client::testing::{RoutedClient, ScriptedClient};

    fn no_delay() -> RetryPolicy {
        RetryPolicy::fixed(3, Duration::ZERO)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const SKILL_REPLY: &str =
        r#"{"skills": ["Python", "SQL", "HTML"], "experience_level": "Intermediate", "summary": "Python developer with data skills"}"#;

    fn market_reply() -> String {
        json!({
            "required_skills": ["Python", "SQL", "Power BI", "Statistics", "Excel"],
            "trend": "High",
            "summary": "Strong demand for data analysts"
        })
        .to_string()
    }

    fn roadmap_reply() -> String {
        let horizon = |skill: &str| -> Vec<serde_json::Value> {
            (1..=4)
                .map(|i| {
                    json!({
                        "skill": skill,
                        "goal": format!("Milestone {i} for {skill}"),
                        "resources": "Docs and a free course",
                        "mini_project": format!("Practice project {i}"),
                        "completed": false
                    })
                })
                .collect()
        };
        json!({
            "roadmap": {
                "30": horizon("Power BI"),
                "60": horizon("Statistics"),
                "90": horizon("Excel")
            }
        })
        .to_string()
    }

    // ── set difference ──────────────────────────────────────────────────

    #[test]
    fn missing_skills_is_market_minus_user() {
        let user = strings(&["Python", "SQL"]);
        let market = strings(&["Python", "Docker", "AWS"]);
        let missing: HashSet<String> = derive_missing_skills(&user, &market).into_iter().collect();
        let expected: HashSet<String> = strings(&["Docker", "AWS"]).into_iter().collect();
        assert_eq!(missing, expected);
    }

    #[test]
    fn missing_skills_empty_when_user_covers_market() {
        let user = strings(&["Python", "Docker"]);
        let market = strings(&["Python", "Docker"]);
        assert!(derive_missing_skills(&user, &market).is_empty());
    }

    #[test]
    fn missing_skills_collapse_duplicates() {
        let user = strings(&["SQL"]);
        let market = strings(&["Docker", "Docker", "SQL"]);
        assert_eq!(derive_missing_skills(&user, &market), strings(&["Docker"]));
    }

    // ── retry behavior ──────────────────────────────────────────────────

    #[tokio::test]
    async fn step_succeeds_on_third_attempt_with_three_calls() {
        let client = ScriptedClient::new([
            "I could not produce JSON this time, apologies.",
            "```json\n{\"skills\": [}\n```",
            SKILL_REPLY,
        ]);
        let profile = assess_skills(&client, &no_delay(), "resume text")
            .await
            .unwrap();
        assert_eq!(profile.skills, strings(&["Python", "SQL", "HTML"]));
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn step_fails_after_exactly_three_attempts() {
        let client = ScriptedClient::new(["not json", "still not json", "nope, plain prose"]);
        let error = assess_skills(&client, &no_delay(), "resume text")
            .await
            .unwrap_err();
        assert_eq!(client.call_count(), 3);
        assert!(matches!(
            error,
            PipelineError::Extract(ExtractError::NoJsonObject)
        ));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_retryable_schema_failure() {
        let client = ScriptedClient::new([r#"{"unexpected": true}"#, SKILL_REPLY, SKILL_REPLY]);
        let profile = assess_skills(&client, &no_delay(), "resume text")
            .await
            .unwrap();
        assert_eq!(profile.experience_level, "Intermediate");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn transport_errors_consume_the_attempt_budget() {
        // Empty script: every call reports EmptyContent.
        let client = ScriptedClient::new(Vec::<String>::new());
        let error = assess_market(&client, &no_delay(), "data analyst")
            .await
            .unwrap_err();
        assert_eq!(client.call_count(), 3);
        assert!(matches!(error, PipelineError::Llm(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn learning_path_missing_horizon_is_retried() {
        let incomplete = json!({
            "roadmap": {
                "30": [{"skill": "Docker", "goal": "g", "resources": "r", "mini_project": "p"}]
            }
        })
        .to_string();
        let client = ScriptedClient::new([incomplete, roadmap_reply()]);
        let gap = SkillGapProfile {
            missing_skills: strings(&["Docker", "AWS"]),
            priority: "High".to_string(),
        };
        let path = build_learning_path(&client, &no_delay(), &gap).await.unwrap();
        assert_eq!(client.call_count(), 2);
        assert_eq!(path.career_readiness_score, 70);
    }

    // ── step semantics ──────────────────────────────────────────────────

    #[tokio::test]
    async fn skill_gap_list_is_normalized_to_set_difference() {
        let client =
            ScriptedClient::new([r#"{"missing_skills": ["Everything", "Wrong"], "priority": "Medium"}"#]);
        let user = strings(&["Python", "SQL"]);
        let market = strings(&["Python", "Docker", "AWS"]);
        let gap = assess_skill_gap(&client, &no_delay(), &user, &market)
            .await
            .unwrap();
        let missing: HashSet<String> = gap.missing_skills.into_iter().collect();
        let expected: HashSet<String> = strings(&["Docker", "AWS"]).into_iter().collect();
        assert_eq!(missing, expected);
        assert_eq!(gap.priority, "Medium");
    }

    #[tokio::test]
    async fn learning_path_score_comes_from_the_scoring_rule() {
        // Model-reported scores are ignored even when present.
        let mut reply: serde_json::Value = serde_json::from_str(&roadmap_reply()).unwrap();
        reply["career_readiness_score"] = json!(3);
        let client = ScriptedClient::new([reply.to_string()]);
        let gap = SkillGapProfile {
            missing_skills: strings(&["Power BI", "Statistics", "Excel"]),
            priority: "High".to_string(),
        };
        let path = build_learning_path(&client, &no_delay(), &gap).await.unwrap();
        assert_eq!(path.career_readiness_score, 55);
    }

    // ── end to end ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn full_pipeline_handles_the_data_analyst_scenario() {
        let client = RoutedClient::new([
            ("resume analyzer", SKILL_REPLY.to_string()),
            ("job market expert", market_reply()),
            (
                "career gap analyst",
                r#"{"missing_skills": [], "priority": "High"}"#.to_string(),
            ),
            ("career coach", roadmap_reply()),
        ]);
        let outcome = run_analysis(
            &client,
            &no_delay(),
            "Experienced Python developer with SQL and HTML",
            "data analyst",
        )
        .await
        .unwrap();

        assert!(!outcome.skill_profile.skills.is_empty());
        assert_eq!(outcome.market_profile.trend, "High");

        let missing: HashSet<String> = outcome.skill_gap.missing_skills.iter().cloned().collect();
        let expected: HashSet<String> =
            strings(&["Power BI", "Statistics", "Excel"]).into_iter().collect();
        assert_eq!(missing, expected);

        assert_eq!(outcome.learning_path.task_count(), ROADMAP_TOTAL_TASKS);
        // 3 missing skills → 100 − 45
        assert_eq!(outcome.learning_path.career_readiness_score, 55);
        // One call per step, no wasted retries.
        assert_eq!(client.call_count(), 4);
    }
}
