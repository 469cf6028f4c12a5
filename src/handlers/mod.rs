//! HTTP routes for the Plan a Trip, Trip History and About pages

pub mod about;
pub mod history;
pub mod plan;
pub mod sessions;

#[cfg(test)]
mod test_handlers;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::error::TravelPlannerError;
use crate::service::TravelPlannerService;

pub type AppState = Arc<TravelPlannerService>;

/// Build the router. When `bearer_token` is set every route except `/health`
/// requires it.
pub fn router(service: AppState, bearer_token: Option<String>) -> Router {
    let mut router = Router::new()
        .route("/about", get(about::about))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:id", delete(sessions::end_session))
        .route(
            "/sessions/:id/plan",
            post(plan::plan_trip).get(plan::current_plan),
        )
        .route("/sessions/:id/plan/save", post(plan::save_plan))
        .route("/sessions/:id/plan/convert", get(plan::convert_currency))
        .route("/sessions/:id/packing", post(plan::toggle_packing))
        .route("/sessions/:id/history", get(history::list_trips))
        .route("/sessions/:id/history/viewing", delete(history::close_trip))
        .route(
            "/sessions/:id/history/:trip_id",
            get(history::view_trip).delete(history::delete_trip),
        )
        .with_state(service);

    if let Some(expected) = bearer_token {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(expected),
            require_bearer,
        ));
    }

    router.route("/health", get(|| async { "ok" }))
}

async fn require_bearer(
    State(expected): State<Arc<String>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.uri().path() == "/health" {
        return next.run(req).await;
    }

    let headers: &HeaderMap = req.headers();
    let header_ok = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", expected.as_str()));

    // Clients that cannot set headers may pass access_token or token
    let query_ok = req.uri().query().is_some_and(|q| {
        q.split('&').any(|pair| {
            pair.split_once('=').is_some_and(|(k, v)| {
                (k == "access_token" || k == "token") && v == expected.as_str()
            })
        })
    });

    if !(header_ok || query_ok) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(req).await
}

impl TravelPlannerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::NoCurrentPlan => StatusCode::CONFLICT,
            Self::Upstream { .. } | Self::Network(_) | Self::MalformedModelResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Configuration(_) | Self::Json(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TravelPlannerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        }

        let mut body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let Some(raw) = self.raw_response() {
            body["raw_response"] = json!(raw);
        }
        (status, Json(body)).into_response()
    }
}
