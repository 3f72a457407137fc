//! The two readiness scoring rules.
//!
//! They are deliberately separate: the initial rule prices the gap found at
//! analysis time, the adaptive rule rewards task completion afterwards.
//! They use different scales and are never unified.

const SCORE_CEILING: u32 = 100;
const SCORE_FLOOR: u32 = 20;
const MISSING_SKILL_PENALTY: u32 = 15;
const COMPLETED_TASK_BONUS: u32 = 5;

/// Initial readiness for a fresh analysis: 100 minus 15 per missing skill,
/// clamped to [20, 100].
pub fn initial_readiness(missing_count: usize) -> u32 {
    let penalty = MISSING_SKILL_PENALTY.saturating_mul(missing_count as u32);
    SCORE_CEILING
        .saturating_sub(penalty)
        .clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Adaptive readiness after task completions: base plus 5 per completed
/// task, capped at 100. Inputs are assumed non-negative; no error cases.
pub fn adaptive_readiness(base_score: u32, completed_tasks: u32) -> u32 {
    base_score
        .saturating_add(completed_tasks.saturating_mul(COMPLETED_TASK_BONUS))
        .min(SCORE_CEILING)
}
