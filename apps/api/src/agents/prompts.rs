//! Prompt builders for the four agent steps.
//!
//! Pure string templates: no validation, no side effects. Every prompt gives
//! the model a role, an EXACT example schema, and explicit negative
//! instructions (no markdown, no explanations) — models do not reliably
//! honor "JSON only" without both.

use crate::agents::schemas::{SkillGapProfile, TASKS_PER_HORIZON};

/// JSON-only directive shared by every agent prompt.
const STRICT_JSON_RULES: &str = "\
STRICT RULES:
- Output ONLY valid JSON
- Do NOT use markdown or code fences
- Do NOT explain anything or add text outside the JSON
- Every string must be quoted
- No trailing commas";

/// Skill-assessment prompt. `resume_text` must already be truncated to the
/// cost-control budget by the caller.
pub fn skill_assessment_prompt(resume_text: &str) -> String {
    format!(
        r#"You are an AI resume analyzer.
Extract the candidate's skills and experience from the resume below.

{STRICT_JSON_RULES}

Return a JSON object with this EXACT schema:
{{
  "skills": ["Python", "SQL"],
  "experience_level": "Beginner | Intermediate | Advanced",
  "summary": "Short professional summary"
}}

Resume:
{resume_text}"#
    )
}

/// Market-demand prompt for a target role.
pub fn market_demand_prompt(target_role: &str) -> String {
    format!(
        r#"You are a job market expert.
Describe the current hiring market for the target role below.

{STRICT_JSON_RULES}

Return a JSON object with this EXACT schema:
{{
  "required_skills": ["Python", "Docker", "AWS"],
  "trend": "High / Medium / Low",
  "summary": "Market demand summary"
}}

Target role:
{target_role}"#
    )
}

/// Skill-gap prompt comparing the user's skills to the market's.
pub fn skill_gap_prompt(user_skills: &[String], market_skills: &[String]) -> String {
    format!(
        r#"You are a career gap analyst.
Compare the user's skills against the skills the market requires and assess the gap.

{STRICT_JSON_RULES}

Return a JSON object with this EXACT schema:
{{
  "missing_skills": ["Docker", "Kubernetes"],
  "priority": "High / Medium / Low"
}}

User skills: {user_skills:?}
Market skills: {market_skills:?}"#
    )
}

/// Learning-path prompt for a skill gap. Demands the canonical roadmap shape:
/// three horizons keyed "30"/"60"/"90" with a fixed number of tasks each.
pub fn learning_path_prompt(skill_gap: &SkillGapProfile) -> String {
    format!(
        r#"You are an expert career coach AI.
Build a 90-day learning roadmap that closes the skill gap below.

{STRICT_JSON_RULES}
- The roadmap MUST have the keys "30", "60" and "90"
- Each key MUST contain exactly {TASKS_PER_HORIZON} tasks
- "30" holds foundation tasks, "60" intermediate, "90" advanced

Return a JSON object with this EXACT schema:
{{
  "roadmap": {{
    "30": [
      {{"skill": "Docker", "goal": "Learn container basics", "resources": "Docker docs, free course", "mini_project": "Containerize a small app", "completed": false}}
    ],
    "60": [
      {{"skill": "Docker", "goal": "Multi-container setups", "resources": "Compose docs", "mini_project": "Compose a two-service stack", "completed": false}}
    ],
    "90": [
      {{"skill": "Kubernetes", "goal": "Deploy to a cluster", "resources": "k8s tutorial", "mini_project": "Deploy the stack to minikube", "completed": false}}
    ]
  }}
}}

Skill gap data:
Missing skills: {missing:?}
Priority: {priority}"#,
        missing = skill_gap.missing_skills,
        priority = skill_gap.priority,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap() -> SkillGapProfile {
        SkillGapProfile {
            missing_skills: vec!["Docker".to_string(), "AWS".to_string()],
            priority: "High".to_string(),
        }
    }

    #[test]
    fn all_prompts_demand_json_only() {
        let user = vec!["Python".to_string()];
        let market = vec!["Docker".to_string()];
        for prompt in [
            skill_assessment_prompt("resume"),
            market_demand_prompt("data analyst"),
            skill_gap_prompt(&user, &market),
            learning_path_prompt(&gap()),
        ] {
            assert!(prompt.contains("ONLY valid JSON"), "missing directive in: {prompt}");
            assert!(prompt.contains("Do NOT use markdown"));
        }
    }

    #[test]
    fn skill_assessment_embeds_resume_text() {
        let prompt = skill_assessment_prompt("Experienced Python developer");
        assert!(prompt.contains("Experienced Python developer"));
        assert!(prompt.contains("\"experience_level\""));
    }

    #[test]
    fn market_demand_embeds_target_role() {
        let prompt = market_demand_prompt("backend developer");
        assert!(prompt.contains("backend developer"));
        assert!(prompt.contains("\"required_skills\""));
    }

    #[test]
    fn skill_gap_embeds_both_lists() {
        let user = vec!["Python".to_string(), "SQL".to_string()];
        let market = vec!["Python".to_string(), "Docker".to_string()];
        let prompt = skill_gap_prompt(&user, &market);
        assert!(prompt.contains("\"SQL\""));
        assert!(prompt.contains("\"Docker\""));
    }

    #[test]
    fn learning_path_demands_all_horizons() {
        let prompt = learning_path_prompt(&gap());
        assert!(prompt.contains("\"30\""));
        assert!(prompt.contains("\"60\""));
        assert!(prompt.contains("\"90\""));
        assert!(prompt.contains(&format!("exactly {TASKS_PER_HORIZON} tasks")));
        assert!(prompt.contains("\"Docker\""));
    }
}
