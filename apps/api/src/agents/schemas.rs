//! Typed result schemas for the four agent steps.
//!
//! Deserialization IS the schema check: each agent parses the extracted JSON
//! into one of these types, and a missing or mistyped field is a retryable
//! validation failure. Profiles are immutable values; every pipeline run
//! constructs fresh instances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Roadmap horizon labels, in presentation order.
pub const ROADMAP_HORIZONS: [&str; 3] = ["30", "60", "90"];

/// Tasks requested per horizon. The learning-path prompt demands exactly
/// this many, so a full roadmap carries `ROADMAP_TOTAL_TASKS` entries.
pub const TASKS_PER_HORIZON: usize = 4;

/// Fixed roadmap size: `TASKS_PER_HORIZON` tasks across three horizons.
pub const ROADMAP_TOTAL_TASKS: usize = TASKS_PER_HORIZON * ROADMAP_HORIZONS.len();

/// Output of the skill-assessment step: skills read from the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub skills: Vec<String>,
    pub experience_level: String,
    pub summary: String,
}

/// Output of the market-demand step: what the target role requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    pub required_skills: Vec<String>,
    pub trend: String,
    pub summary: String,
}

/// Output of the skill-gap step.
///
/// `missing_skills` is normalized by the pipeline to the exact set
/// difference `required_skills ∖ skills`; the model contributes `priority`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapProfile {
    pub missing_skills: Vec<String>,
    pub priority: String,
}

/// One learning task inside a roadmap horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapTask {
    pub skill: String,
    pub goal: String,
    pub resources: String,
    pub mini_project: String,
    #[serde(default)]
    pub completed: bool,
}

/// Horizon label ("30" / "60" / "90") → tasks for that horizon.
pub type LearningRoadmap = BTreeMap<String, Vec<RoadmapTask>>;

/// Output of the learning-path step.
///
/// `career_readiness_score` is never trusted from the model; the pipeline
/// stamps it from the initial scoring rule after a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPathProfile {
    pub roadmap: LearningRoadmap,
    #[serde(default)]
    pub career_readiness_score: u32,
}

impl LearningPathProfile {
    /// Checks that every horizon is present with at least one task.
    /// A violation counts as a schema failure and is retried like any other.
    pub fn validate(&self) -> Result<(), String> {
        for horizon in ROADMAP_HORIZONS {
            match self.roadmap.get(horizon) {
                Some(tasks) if !tasks.is_empty() => {}
                Some(_) => return Err(format!("roadmap horizon '{horizon}' has no tasks")),
                None => return Err(format!("roadmap is missing horizon '{horizon}'")),
            }
        }
        Ok(())
    }

    /// Total number of tasks across all horizons.
    pub fn task_count(&self) -> usize {
        self.roadmap.values().map(Vec::len).sum()
    }
}
