use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use super::AppState;
use crate::error::{Result, TravelPlannerError};

pub async fn create_session(State(service): State<AppState>) -> (StatusCode, Json<Value>) {
    let id = service.sessions().create().await;
    (StatusCode::CREATED, Json(json!({ "session_id": id })))
}

/// Discard the session with its history and current plan
pub async fn end_session(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if service.sessions().end(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(TravelPlannerError::SessionNotFound(id))
    }
}
