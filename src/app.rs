use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/campaigns", post(handlers::submit_form))
        .route("/campaigns/:id/delete", post(handlers::delete_form))
        .route(
            "/api/campaigns",
            get(handlers::list_campaigns).post(handlers::create_campaign),
        )
        .route("/api/campaigns/:id", delete(handlers::delete_campaign))
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/message", get(handlers::get_message))
        .with_state(state)
}
