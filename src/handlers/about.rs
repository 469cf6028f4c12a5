use axum::Json;
use axum::extract::State;

use super::AppState;
use crate::service::AboutPage;

pub async fn about(State(service): State<AppState>) -> Json<AboutPage> {
    Json(service.about())
}
