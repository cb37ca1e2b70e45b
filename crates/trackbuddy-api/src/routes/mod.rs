use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth::require_auth, handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // Everything below sits behind the token gate
    let protected = Router::new()
        // Account
        .route(
            "/api/auth",
            get(handlers::auth::refresh).delete(handlers::auth::delete_account),
        )

        // Profile
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route("/api/profile/tags", get(handlers::profile::get_tags))

        // Journals
        .route(
            "/api/journals",
            get(handlers::journals::list_journals).post(handlers::journals::create_journal),
        )
        .route(
            "/api/journals/:id",
            get(handlers::journals::get_journal)
                .put(handlers::journals::update_journal)
                .delete(handlers::journals::delete_journal),
        )

        // Habits
        .route(
            "/api/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route(
            "/api/habits/:id",
            get(handlers::habits::get_habit)
                .put(handlers::habits::update_habit)
                .delete(handlers::habits::delete_habit),
        )
        .route(
            "/api/habits/:id/check",
            post(handlers::habits::check_habit).delete(handlers::habits::uncheck_habit),
        )
        .route(
            "/api/habits/:id/repetitions",
            get(handlers::habits::get_repetitions),
        )

        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications)
                .post(handlers::notifications::create_notification),
        )
        .route(
            "/api/notifications/:id",
            delete(handlers::notifications::delete_notification),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Registration and login
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))

        .merge(protected)

        // Add state
        .with_state(state)

        // Add CORS and request tracing
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
