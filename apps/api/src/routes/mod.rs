pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_upload_resume;
use crate::progress::handlers::{
    handle_adaptive_roadmap, handle_get_progress, handle_update_progress,
};
use crate::state::AppState;

/// Upload size cap for resume PDFs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/upload-resume", post(handle_upload_resume))
        .route("/update-progress", post(handle_update_progress))
        .route("/progress/:user_id", get(handle_get_progress))
        .route("/adaptive-roadmap/:user_id", get(handle_adaptive_roadmap))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
