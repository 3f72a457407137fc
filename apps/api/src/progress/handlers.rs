//! Axum route handlers for roadmap progress.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::agents::schemas::{LearningRoadmap, ROADMAP_TOTAL_TASKS};
use crate::errors::AppError;
use crate::models::profile::UserProfileRow;
use crate::scoring::adaptive_readiness;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub user_id: Uuid,
    pub period: String,
    pub task_index: usize,
}

#[derive(Debug, Serialize)]
pub struct UpdateProgressResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub completion_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct AdaptiveRoadmapResponse {
    pub readiness_score: u32,
    pub roadmap: LearningRoadmap,
}

/// POST /update-progress
///
/// Marks one roadmap task completed: flips the flag inside the stored
/// roadmap JSON and appends a progress row. Idempotent — re-completing a
/// task reports it without a second row.
pub async fn handle_update_progress(
    State(state): State<AppState>,
    Json(request): Json<UpdateProgressRequest>,
) -> Result<Json<UpdateProgressResponse>, AppError> {
    let profile = fetch_profile(&state.db, request.user_id).await?;
    let mut roadmap = parse_roadmap(&profile)?;

    let tasks = roadmap.get_mut(&request.period).ok_or_else(|| {
        AppError::Validation(format!("unknown roadmap period '{}'", request.period))
    })?;
    let task = tasks.get_mut(request.task_index).ok_or_else(|| {
        AppError::Validation(format!(
            "task index {} out of range for period '{}'",
            request.task_index, request.period
        ))
    })?;

    if task.completed {
        return Ok(Json(UpdateProgressResponse {
            message: "Task already completed".to_string(),
        }));
    }
    task.completed = true;
    let skill = task.skill.clone();
    let goal = task.goal.clone();

    let roadmap_value = serde_json::to_value(&roadmap)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize roadmap: {e}")))?;

    sqlx::query("UPDATE user_profiles SET roadmap = $1 WHERE id = $2")
        .bind(&roadmap_value)
        .bind(request.user_id)
        .execute(&state.db)
        .await?;

    sqlx::query(
        "INSERT INTO progress (id, user_id, skill, task, completed) VALUES ($1, $2, $3, $4, TRUE)",
    )
    .bind(Uuid::new_v4())
    .bind(request.user_id)
    .bind(&skill)
    .bind(&goal)
    .execute(&state.db)
    .await?;

    info!(
        user_id = %request.user_id,
        period = %request.period,
        task_index = request.task_index,
        %skill,
        "roadmap task completed"
    );

    Ok(Json(UpdateProgressResponse {
        message: "Progress updated".to_string(),
    }))
}

/// GET /progress/:user_id
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProgressSummary>, AppError> {
    fetch_profile(&state.db, user_id).await?;
    let completed = count_completed_tasks(&state.db, user_id).await?;

    let completion_percentage =
        round1(completed as f64 / ROADMAP_TOTAL_TASKS as f64 * 100.0);

    Ok(Json(ProgressSummary {
        completed_tasks: completed,
        total_tasks: ROADMAP_TOTAL_TASKS as u32,
        completion_percentage,
    }))
}

/// GET /adaptive-roadmap/:user_id
///
/// Recomputes readiness from the stored base score and the completed-task
/// count. The base score is never overwritten, so recomputation does not
/// compound.
pub async fn handle_adaptive_roadmap(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AdaptiveRoadmapResponse>, AppError> {
    let profile = fetch_profile(&state.db, user_id).await?;
    let completed = count_completed_tasks(&state.db, user_id).await?;

    let base = profile.readiness_score.max(0) as u32;
    let readiness_score = adaptive_readiness(base, completed);
    let roadmap = parse_roadmap(&profile)?;

    Ok(Json(AdaptiveRoadmapResponse {
        readiness_score,
        roadmap,
    }))
}

async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfileRow, AppError> {
    sqlx::query_as::<_, UserProfileRow>("SELECT * FROM user_profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

async fn count_completed_tasks(pool: &PgPool, user_id: Uuid) -> Result<u32, AppError> {
    let completed: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM progress WHERE user_id = $1 AND completed = TRUE",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(completed.max(0) as u32)
}

fn parse_roadmap(profile: &UserProfileRow) -> Result<LearningRoadmap, AppError> {
    serde_json::from_value(profile.roadmap.clone())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored roadmap is malformed: {e}")))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
