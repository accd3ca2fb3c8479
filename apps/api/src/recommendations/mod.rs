// Recommendation Orchestrator: regenerates a user's ranked career suggestions.

pub mod handlers;
pub mod orchestrator;
