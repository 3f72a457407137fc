use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const CREATE_USER_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS user_profiles (
    id UUID PRIMARY KEY,
    resume_text TEXT NOT NULL,
    target_role TEXT NOT NULL,
    skills JSONB NOT NULL,
    missing_skills JSONB NOT NULL,
    roadmap JSONB NOT NULL,
    readiness_score INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_PROGRESS: &str = r#"
CREATE TABLE IF NOT EXISTS progress (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    skill TEXT NOT NULL,
    task TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_PROGRESS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_progress_user_id ON progress (user_id)";

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Idempotent schema bootstrap, run once at startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_USER_PROFILES).execute(pool).await?;
    sqlx::query(CREATE_PROGRESS).execute(pool).await?;
    sqlx::query(CREATE_PROGRESS_USER_INDEX).execute(pool).await?;

    info!("Database schema ready");
    Ok(())
}
