//! Axum route handler for resume analysis.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::agents::pipeline::run_analysis;
use crate::agents::schemas::LearningRoadmap;
use crate::analysis::resume::{extract_resume_text, truncate_for_prompt, RESUME_CHAR_BUDGET};
use crate::errors::AppError;
use crate::state::AppState;

/// Response body for a completed analysis: the persisted subset of the
/// pipeline outcome, keyed by the new user record's id.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub user_id: Uuid,
    pub target_role: String,
    pub current_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub readiness_score: u32,
    pub roadmap: LearningRoadmap,
}

/// POST /upload-resume
///
/// Multipart form: `file` (resume PDF) + `target_role`. Runs the four-step
/// pipeline and persists a new user profile. Terminal pipeline failures map
/// to the fixed service-unavailable body; no partial results are returned.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut file_bytes: Option<Bytes> = None;
    let mut target_role: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume upload: {e}")))?;
                file_bytes = Some(bytes);
            }
            Some("target_role") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read target_role: {e}")))?;
                target_role = Some(text);
            }
            _ => {}
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    let target_role = target_role
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .ok_or_else(|| AppError::Validation("missing 'target_role' field".to_string()))?;

    let resume_text = extract_resume_text(file_bytes).await?;
    let prompt_text = truncate_for_prompt(&resume_text, RESUME_CHAR_BUDGET);

    info!(
        %target_role,
        resume_chars = resume_text.len(),
        prompt_chars = prompt_text.len(),
        "starting career analysis"
    );

    let outcome = run_analysis(state.llm.as_ref(), &state.retry, prompt_text, &target_role).await?;

    let user_id = Uuid::new_v4();
    let skills = serde_json::to_value(&outcome.skill_profile.skills)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize skills: {e}")))?;
    let missing_skills = serde_json::to_value(&outcome.skill_gap.missing_skills).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("failed to serialize missing skills: {e}"))
    })?;
    let roadmap = serde_json::to_value(&outcome.learning_path.roadmap)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize roadmap: {e}")))?;
    let readiness_score = outcome.learning_path.career_readiness_score;

    sqlx::query(
        r#"
        INSERT INTO user_profiles
            (id, resume_text, target_role, skills, missing_skills, roadmap, readiness_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user_id)
    .bind(&resume_text)
    .bind(&target_role)
    .bind(&skills)
    .bind(&missing_skills)
    .bind(&roadmap)
    .bind(readiness_score as i32)
    .execute(&state.db)
    .await?;

    info!(
        %user_id,
        missing = outcome.skill_gap.missing_skills.len(),
        readiness_score,
        "career analysis persisted"
    );

    Ok(Json(AnalyzeResponse {
        user_id,
        target_role,
        current_skills: outcome.skill_profile.skills,
        missing_skills: outcome.skill_gap.missing_skills,
        readiness_score,
        roadmap: outcome.learning_path.roadmap,
    }))
}
