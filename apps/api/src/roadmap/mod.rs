// Roadmap / Skill-Gap Orchestrator: per-career learning plans and completion tracking.

pub mod handlers;
pub mod planner;
