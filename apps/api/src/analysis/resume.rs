//! Resume text extraction and prompt-budget truncation.

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;

/// Character budget for resume text sent to the LLM. Applied once, before
/// the pipeline starts — never per retry.
pub const RESUME_CHAR_BUDGET: usize = 4000;

/// Extracts plain text from an uploaded PDF. `pdf-extract` is synchronous,
/// so the work runs on the blocking pool.
pub async fn extract_resume_text(file: Bytes) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&file))
        .await
        .context("resume extraction task failed")?
        .map_err(|e| anyhow!("failed to extract text from resume PDF: {e}"))?;

    if text.trim().is_empty() {
        return Err(anyhow!("resume PDF contained no extractable text"));
    }
    Ok(text)
}

/// Truncates to at most `budget` characters, on a char boundary.
pub fn truncate_for_prompt(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
