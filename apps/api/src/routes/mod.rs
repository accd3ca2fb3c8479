pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{chat, portfolio, profile, recommendations, roadmap};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session gate + profile setup
        .route("/api/v1/session", get(profile::handlers::handle_session))
        .route(
            "/api/v1/profile",
            get(profile::handlers::handle_get_profile).put(profile::handlers::handle_save_profile),
        )
        .route(
            "/api/v1/achievements",
            get(profile::handlers::handle_list_achievements),
        )
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(recommendations::handlers::handle_list_recommendations),
        )
        .route(
            "/api/v1/recommendations/generate",
            post(recommendations::handlers::handle_generate_recommendations),
        )
        // Roadmaps + skill gaps
        .route(
            "/api/v1/careers/:career_id/roadmap",
            get(roadmap::handlers::handle_get_roadmap),
        )
        .route(
            "/api/v1/careers/:career_id/roadmap/generate",
            post(roadmap::handlers::handle_generate_roadmap),
        )
        .route(
            "/api/v1/roadmap/items/:item_id/toggle",
            post(roadmap::handlers::handle_toggle_item),
        )
        // Mentor chat
        .route(
            "/api/v1/chat",
            get(chat::handlers::handle_list_chat).post(chat::handlers::handle_send_message),
        )
        // Portfolio
        .route(
            "/api/v1/portfolio",
            get(portfolio::handlers::handle_list_portfolio)
                .post(portfolio::handlers::handle_add_item),
        )
        .route(
            "/api/v1/portfolio/:id",
            delete(portfolio::handlers::handle_delete_item),
        )
        .with_state(state)
}
