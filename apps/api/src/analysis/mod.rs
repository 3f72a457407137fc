//! Resume analysis: upload handling, PDF text extraction, and the pipeline
//! boundary that turns a resume/role pair into a persisted career plan.

pub mod handlers;
pub mod resume;
