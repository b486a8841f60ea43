use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/today", get(handlers::get_today))
        .route("/api/drink", post(handlers::drink))
        .route("/api/undo", post(handlers::undo))
        .route("/api/goal", post(handlers::set_goal))
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/reminders",
            get(handlers::get_reminders).post(handlers::update_reminders),
        )
        .route("/api/notify/test", post(handlers::notify_test))
        .route("/api/notifications", get(handlers::get_notifications))
        .route("/api/sync/export", get(handlers::sync_export))
        .route("/api/sync/import", post(handlers::sync_import))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
