#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One completed roadmap task. No foreign key to `user_profiles`; rows are
/// correlated by `user_id` only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill: String,
    pub task: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}
