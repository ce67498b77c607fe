use axum::{Router, routing::get};

use crate::handlers::{health::health_handler, seed::seed_handler};
use crate::server::state::HubState;

pub fn hub_router(state: HubState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/seed", get(seed_handler))
        .with_state(state)
}
