//! End-to-end router tests against an in-memory database: the envelope
//! shape, the status-code mapping, and a CRUD round trip.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use web_server::{AppState, build_router};

async fn test_app() -> Router {
    let pool = database::connect_with("sqlite::memory:")
        .await
        .expect("in-memory pool");
    database::run_migrations(&pool).await.expect("migrations");
    build_router(Arc::new(AppState::new(pool)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_probe_answers_ok() {
    let app = test_app().await;
    for uri in ["/health", "/api/health"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "OK");
    }
}

#[tokio::test]
async fn customer_crud_round_trip_uses_the_envelope() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/customer",
        Some(json!({"name": "Jane", "mobileNumber": "9876543210"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Jane");
    assert_eq!(body["data"]["mobileNumber"], "9876543210");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/customer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["orders"], json!([]));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/customer/{id}"),
        Some(json!({"mobileNumber": "111"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mobileNumber"], "111");

    let (status, body) = send(&app, "DELETE", &format!("/api/customer/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn missing_rows_are_enveloped_404s() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/product/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn duplicate_product_is_an_enveloped_409() {
    let app = test_app().await;
    let payload = json!({"name": "Idli"});
    let (status, _) = send(&app, "POST", "/api/product", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/api/product", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bad_login_is_a_401() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/login",
        Some(json!({"email": "nobody@rasoi.app", "password": "whatever"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_month_flip_is_a_400() {
    let app = test_app().await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/customer",
        Some(json!({"name": "Jane", "mobileNumber": "1"})),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/dashboard/pending-payments/{id}/month/paid"),
        Some(json!({"year": 2025, "month": 13})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // An empty dashboard still answers with well-formed stats.
    let (status, body) = send(&app, "GET", "/api/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["financial"]["pendingAmount"], 0.0);
    assert_eq!(body["data"]["counts"]["customers"], 1);
}
