// Chat Orchestrator: persisted mentor conversation.

pub mod conversation;
pub mod handlers;
