//! The web routing and orchestration layer for NutriHub.
//!
//! The route layer owns the HTTP concerns: session extraction, role
//! gating for the expert surface, and translating the domain error
//! taxonomy into status codes. Workflow semantics live in `services`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Assembles the full application router.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let user_routes = Router::new()
        .route("/profile", get(handlers::user::profile))
        .route(
            "/queries",
            get(handlers::user::list_queries).post(handlers::user::post_query),
        )
        .route("/query/{id}", get(handlers::user::view_query))
        .route("/solutions", get(handlers::user::list_solutions))
        .route("/tips", get(handlers::user::list_tips))
        .route("/tips/{tip_id}/like", post(handlers::user::toggle_like))
        .route("/feedback", post(handlers::user::post_feedback))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let expert_routes = Router::new()
        .route("/", get(handlers::expert::dashboard))
        .route("/solutions", get(handlers::expert::list_solutions))
        .route("/solution", post(handlers::expert::post_solution))
        .route(
            "/solution/{solution_id}/toggle",
            patch(handlers::expert::toggle_solution),
        )
        .route(
            "/solution/{solution_id}",
            put(handlers::expert::update_solution),
        )
        .route(
            "/solution/{solution_id}/edit",
            get(handlers::expert::solution_for_edit),
        )
        .route("/feedback", get(handlers::expert::view_feedback))
        .route(
            "/tips",
            get(handlers::expert::list_tips).post(handlers::expert::publish_tip),
        )
        .route("/tip/{tip_id}", delete(handlers::expert::delete_tip))
        .route("/tip/{tip_id}/toggle", patch(handlers::expert::toggle_tip))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_expert,
        ));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes)
        .nest("/expert", expert_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
