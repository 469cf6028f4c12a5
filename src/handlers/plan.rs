use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::AppState;
use crate::error::{Result, TravelPlannerError};
use crate::models::TripRequest;
use crate::presentation::{CurrencyView, DEFAULT_CONVERT_AMOUNT};
use crate::service::{PackingToggle, PlanView};

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    pub amount: Option<f64>,
}

/// Find Travel Options
pub async fn plan_trip(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<PlanView>> {
    let Json(request) =
        payload.map_err(|e| TravelPlannerError::InvalidInput(e.body_text()))?;
    let view = service.plan_trip(id, request).await?;
    Ok(Json(view))
}

pub async fn current_plan(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanView>> {
    service
        .current_plan(id)
        .await?
        .map(Json)
        .ok_or(TravelPlannerError::NoCurrentPlan)
}

/// Save This Trip to History
pub async fn save_plan(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let trip_id = service.save_current(id).await?;
    Ok(Json(json!({ "trip_id": trip_id })))
}

pub async fn convert_currency(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ConvertParams>,
) -> Result<Json<CurrencyView>> {
    let amount = params.amount.unwrap_or(DEFAULT_CONVERT_AMOUNT);
    Ok(Json(service.convert_currency(id, amount).await?))
}

pub async fn toggle_packing(
    State(service): State<AppState>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<PackingToggle>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(toggle) = payload.map_err(|e| TravelPlannerError::InvalidInput(e.body_text()))?;
    let item = toggle.item.clone();
    let checked = service.set_packing_item(id, toggle).await?;
    Ok(Json(json!({ "item": item, "checked": checked })))
}
