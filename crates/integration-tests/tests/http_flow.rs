use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use integration_tests::Harness;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", "diner-42");
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn settings_and_feedback_journey() {
    let harness = Harness::new(Duration::hours(24));
    let app = harness.router();

    // The toggle starts off and sticks once set.
    let (_, body) = call(&app, Method::GET, "/preferences/dnd", None).await;
    assert_eq!(body, json!({ "dndEnabled": false }));
    call(&app, Method::PUT, "/preferences/dnd", Some(json!({ "enabled": true }))).await;
    let (_, body) = call(&app, Method::GET, "/preferences/dnd", None).await;
    assert_eq!(body, json!({ "dndEnabled": true }));

    // First prompt is allowed; a submission closes the window.
    let (_, body) = call(&app, Method::GET, "/feedback/eligibility", None).await;
    assert_eq!(body["canShowFeedback"], json!(true));

    let feedback = json!({
        "role": "recommender",
        "experienceTags": ["easy to use"],
        "feedbackText": "",
        "rating": 5,
        "sourceAction": "recommendation_sent"
    });
    let (status, body) = call(&app, Method::POST, "/feedback", Some(feedback)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "submitted": true }));

    harness.clock.advance(Duration::hours(12));
    let (_, body) = call(&app, Method::GET, "/feedback/eligibility", None).await;
    assert_eq!(body["canShowFeedback"], json!(false));
    assert_eq!(body["remainingSeconds"], json!(12 * 3600));

    harness.clock.advance(Duration::hours(12));
    let (_, body) = call(&app, Method::GET, "/feedback/eligibility", None).await;
    assert_eq!(body["canShowFeedback"], json!(true));

    // The DND flag is unaffected by feedback activity.
    let (_, body) = call(&app, Method::GET, "/preferences/dnd", None).await;
    assert_eq!(body, json!({ "dndEnabled": true }));
}

#[tokio::test]
async fn time_endpoint_needs_no_user() {
    let harness = Harness::new(Duration::hours(24));
    let app = harness.router();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/server-time")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let request = Request::builder().uri("/server-time").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "now": "2026-01-05T10:00:00.000Z" }));
}
