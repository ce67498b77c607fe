use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::seed::seed_admin;
use crate::server::state::HubState;

pub const SEED_CREATED_MESSAGE: &str = "Admin user created successfully";

/// GET /api/seed -> creates the bootstrap administrator.
///
/// Answers 404 unless the seed route is enabled for this deployment (see
/// `HubState::seed`).
///
/// Plaintext in both directions: 201 with a confirmation, or 500 with the
/// client-safe message of the failure. Full detail only goes to the log.
pub async fn seed_handler(State(state): State<HubState>) -> Response {
    let Some(admin) = state.seed.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match seed_admin(&state.auth, admin).await {
        Ok(_) => (StatusCode::CREATED, SEED_CREATED_MESSAGE).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.public_message()).into_response(),
    }
}
