//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Identity
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/auth/admin/credentials",
            put(handlers::auth::update_admin_credentials),
        )
        // Avatars
        .route(
            "/avatars",
            post(handlers::avatar::create_avatar).get(handlers::avatar::list_avatars),
        )
        .route(
            "/avatars/{id}",
            get(handlers::avatar::get_avatar)
                .put(handlers::avatar::update_avatar)
                .delete(handlers::avatar::delete_avatar),
        )
        .route(
            "/avatars/{id}/summaries",
            get(handlers::avatar::list_avatar_summaries),
        )
        // Conversations
        .route(
            "/conversations",
            post(handlers::conversation::start_conversation)
                .get(handlers::conversation::list_conversations),
        )
        .route(
            "/conversations/{id}",
            get(handlers::conversation::get_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            post(handlers::conversation::append_message),
        )
        .route(
            "/conversations/{id}/end",
            put(handlers::conversation::end_conversation),
        )
        .route(
            "/conversations/{id}/summary",
            post(handlers::summary::generate_summary),
        )
        // Summaries
        .route("/summaries", get(handlers::summary::list_summaries))
        .route("/summaries/{id}", get(handlers::summary::get_summary))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness probe (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
