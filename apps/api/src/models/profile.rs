use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted result of one career analysis. The JSONB columns hold the skill
/// lists and the 30/60/90 roadmap; `readiness_score` is the initial score
/// stamped at analysis time and used as the base for adaptive recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub resume_text: String,
    pub target_role: String,
    pub skills: Value,
    pub missing_skills: Value,
    pub roadmap: Value,
    pub readiness_score: i32,
    pub created_at: DateTime<Utc>,
}
