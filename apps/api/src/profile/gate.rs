//! Session/Profile Gate.
//!
//! Evaluated on every app load: no subject means the landing page, a subject without a
//! complete profile means the setup form, otherwise the main application.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::store::CareerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    ProfileIncomplete,
    Ready,
}

/// Fetches at most one profile row. A failed fetch reads as "no profile", sending the
/// user to the setup form rather than an error screen.
pub async fn resolve_session_state(store: &dyn CareerStore, subject: Option<Uuid>) -> SessionState {
    let Some(user_id) = subject else {
        return SessionState::Unauthenticated;
    };

    match store.get_profile(user_id).await {
        Ok(Some(profile)) if profile.is_complete() => SessionState::Ready,
        Ok(_) => SessionState::ProfileIncomplete,
        Err(e) => {
            warn!("Profile lookup failed for user {user_id}, treating as incomplete: {e}");
            SessionState::ProfileIncomplete
        }
    }
}
