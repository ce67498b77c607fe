use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::HubError;
use crate::server::state::HubState;

/// GET /health -> 200 once the database answers a trivial query.
pub async fn health_handler(State(state): State<HubState>) -> Result<Json<Value>, HubError> {
    let pool = state.db.ensure_connected().await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
