use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tasks/:task_id/toggle", post(handlers::toggle_task))
        .route("/clear", post(handlers::clear_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/history", get(handlers::get_history))
        .route("/api/catalog", get(handlers::get_catalog))
        .route("/api/tasks/:task_id/completion", post(handlers::set_completion))
        .route("/api/tasks/:task_id/proof/begin", post(handlers::begin_proof))
        .route("/api/tasks/:task_id/proof", post(handlers::set_proof))
        .route("/api/clear", post(handlers::clear_today))
        .route("/api/export", get(handlers::export))
        .with_state(state)
}
