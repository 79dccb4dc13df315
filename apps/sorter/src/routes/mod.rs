pub mod health;
pub mod sort;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sort", post(sort::handle_sort))
        .with_state(state)
}
