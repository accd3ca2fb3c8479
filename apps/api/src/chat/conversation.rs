//! One mentor turn.
//!
//! The user's message is stored before the model is asked, the reply is stored after,
//! and the transcript returned to the caller is always re-read from storage.

use tracing::info;
use uuid::Uuid;

use crate::advisor::mentor::mentor_reply;
use crate::llm_client::GeminiClient;
use crate::models::chat::{ChatMessage, ChatRole};
use crate::store::{CareerStore, StoreError};

pub async fn send_message(
    store: &dyn CareerStore,
    llm: &GeminiClient,
    user_id: Uuid,
    message: &str,
) -> Result<Vec<ChatMessage>, StoreError> {
    // prompt context is the transcript as it stood before this turn
    let history = store.list_chat(user_id).await?;

    store.append_chat(user_id, ChatRole::User, message).await?;
    let reply = mentor_reply(llm, message, &history).await;
    store.append_chat(user_id, ChatRole::Assistant, &reply).await?;

    let transcript = store.list_chat(user_id).await?;
    info!(
        "Chat turn stored for user {user_id} ({} messages)",
        transcript.len()
    );
    Ok(transcript)
}
