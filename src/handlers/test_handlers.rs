use super::*;
use crate::planner::MockModelClient;

use axum::http::Method;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

const ITINERARY_REPLY: &str = r#"Here is your plan:
{"travel_options": {"flights": [{"name": "JetBlue 23", "cost": "$199"}], "trains": [], "buses": [], "cabs": []},
 "destination_info": {"weather": "Rainy", "attractions": ["Pike Place Market"], "accommodations": [], "local_transport": ["Link light rail"]},
 "recommendation": "Fly direct. It is quickest.",
 "estimated_total_cost": "$450"}"#;

fn mock_client() -> MockModelClient {
    let mut mock = MockModelClient::new();
    mock.expect_generate_itinerary()
        .returning(|_| Ok(ITINERARY_REPLY.to_string()));
    mock.expect_generate_currency().returning(|_| {
        Err(TravelPlannerError::Upstream {
            status: Some(500),
            message: "boom".to_string(),
        })
    });
    mock
}

fn app(mock: MockModelClient, token: Option<&str>) -> Router {
    let service = Arc::new(TravelPlannerService::new(Arc::new(mock), "1.0.0"));
    router(service, token.map(str::to_string))
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn new_session(router: &Router) -> String {
    let (status, body) = send(router, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

fn seattle_trip() -> Value {
    json!({
        "source": "Portland",
        "destination": "Seattle",
        "date": "2025-03-14",
        "travelers": 1,
        "preferences": ["Cheapest", "Direct routes"],
        "budget": "Budget"
    })
}

#[tokio::test]
async fn test_health_and_about() {
    let router = app(MockModelClient::new(), None);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = send(&router, Method::GET, "/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "About AI Travel Planner Pro");
    assert_eq!(body["version"], "AI Travel Planner Pro v1.0.0");
    assert_eq!(body["features"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_plan_save_and_history_routes() {
    let router = app(mock_client(), None);
    let session = new_session(&router).await;

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/sessions/{session}/plan"),
        Some(seattle_trip()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itinerary"]["destination"], "Seattle");
    assert_eq!(body["currency"]["status"], "unavailable");
    assert_eq!(body["itinerary"]["comparison"]["prices"][0]["estimated_cost"], 199.0);

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/sessions/{session}/plan"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["notice"].as_str().unwrap().starts_with("Showing your previously generated"));

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/sessions/{session}/plan/save"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trip_id"], 1);

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/sessions/{session}/history"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trips"][0]["recommended"], "Fly direct");
    assert_eq!(body["choices"][0]["label"], "Trip 1: Portland → Seattle");

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/sessions/{session}/history/1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Trip Details: Portland → Seattle");

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/sessions/{session}/history/7"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "trip_not_found");

    let (status, _) = send(
        &router,
        Method::DELETE,
        &format!("/sessions/{session}/history/viewing"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &router,
        Method::DELETE,
        &format!("/sessions/{session}/history/1"),
        None,
    )
    .await;
    assert_eq!(body["deleted"], true);
    let (_, body) = send(
        &router,
        Method::DELETE,
        &format!("/sessions/{session}/history/1"),
        None,
    )
    .await;
    assert_eq!(body["deleted"], false);
}

#[tokio::test]
async fn test_error_statuses() {
    let mut mock = MockModelClient::new();
    mock.expect_generate_itinerary()
        .returning(|_| Ok("```json\n{\"recommendation\": ".to_string()));
    mock.expect_generate_currency().times(0);
    let router = app(mock, None);
    let session = new_session(&router).await;

    // Malformed reply carries the raw text
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/sessions/{session}/plan"),
        Some(seattle_trip()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "malformed_model_response");
    assert_eq!(body["raw_response"], "```json\n{\"recommendation\": ");

    // Blank destination
    let mut blank = seattle_trip();
    blank["destination"] = json!("");
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/sessions/{session}/plan"),
        Some(blank),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");

    // Nothing generated yet
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/sessions/{session}/plan/save"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "no_current_plan");

    let unknown = Uuid::new_v4();
    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/sessions/{unknown}/history"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "session_not_found");

    let (status, _) = send(&router, Method::DELETE, &format!("/sessions/{session}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
        &router,
        Method::GET,
        &format!("/sessions/{session}/history"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bearer_token_required() {
    let router = app(MockModelClient::new(), Some("s3cret"));

    let (status, _) = send(&router, Method::GET, "/about", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/about")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = send(&router, Method::GET, "/about?token=s3cret", None).await;
    assert_eq!(status, StatusCode::OK);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
