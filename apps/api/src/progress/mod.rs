//! Roadmap progress: task completion, progress summary, and adaptive
//! readiness recomputation over the stored roadmap.

pub mod handlers;
