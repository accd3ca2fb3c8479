//! Conversational career mentor.

use tracing::warn;

use super::fill_template;
use super::prompts::{MENTOR_APOLOGY, MENTOR_PERSONA, MENTOR_PROMPT_TEMPLATE};
use crate::llm_client::prompts::CONVERSATIONAL;
use crate::llm_client::GeminiClient;
use crate::models::chat::ChatMessage;

/// Prior turns embedded in each prompt; older turns are dropped.
pub const HISTORY_WINDOW: usize = 6;

/// Renders the most recent `HISTORY_WINDOW` turns, oldest first, one per line.
pub fn render_history(history: &[ChatMessage]) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|msg| {
            let speaker = if msg.is_from_user() { "User" } else { "Assistant" };
            format!("{speaker}: {}", msg.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_mentor_prompt(message: &str, history: &[ChatMessage]) -> String {
    let history = render_history(history);
    fill_template(
        MENTOR_PROMPT_TEMPLATE,
        &[
            ("persona", MENTOR_PERSONA),
            ("history", history.as_str()),
            ("message", message),
        ],
    )
}

/// Returns the mentor's reply, or the fixed apology if the model cannot answer.
pub async fn mentor_reply(llm: &GeminiClient, message: &str, history: &[ChatMessage]) -> String {
    let prompt = build_mentor_prompt(message, history);
    match llm.call(&prompt, CONVERSATIONAL).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Mentor reply unavailable: {e}");
            MENTOR_APOLOGY.to_string()
        }
    }
}
