use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use uuid::Uuid;

use super::AppState;
use crate::error::Result;
use crate::service::HistoryPage;

pub async fn list_trips(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryPage>> {
    Ok(Json(service.history(id).await?))
}

/// View Selected Trip. An unknown trip id is a 404 with kind `trip_not_found`.
pub async fn view_trip(
    State(service): State<AppState>,
    Path((id, trip_id)): Path<(Uuid, u64)>,
) -> Result<Response> {
    let response = match service.view_trip(id, trip_id).await? {
        Some(detail) => Json(detail).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("Trip {trip_id} not found"),
                "kind": "trip_not_found",
            })),
        )
            .into_response(),
    };
    Ok(response)
}

pub async fn delete_trip(
    State(service): State<AppState>,
    Path((id, trip_id)): Path<(Uuid, u64)>,
) -> Result<Json<Value>> {
    let deleted = service.delete_trip(id, trip_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// Close Trip Details
pub async fn close_trip(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.close_trip_view(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
