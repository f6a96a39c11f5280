// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway routes driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use casebook_core::PluginAdapter;
use casebook_gateway::{GatewayState, HealthState, WebhookAuth, build_router};
use casebook_intake::IntakeDispatcher;
use casebook_test_utils::TestHarness;
use casebook_test_utils::fixtures::{closing_payload, turns};
use tower::ServiceExt;

struct Fixture {
    harness: TestHarness,
    dispatcher: IntakeDispatcher,
    app: Router,
}

async fn fixture(token: Option<&str>, prometheus: Option<&'static str>) -> Fixture {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hello", "hi"]))
        .build()
        .await
        .unwrap();
    let dispatcher = IntakeDispatcher::new(harness.orchestrator.clone());
    let state = GatewayState {
        dispatcher: dispatcher.clone(),
        auth: WebhookAuth {
            token: token.map(str::to_string),
        },
        health: HealthState {
            start_time: Instant::now(),
            storage: Some(harness.storage.clone() as Arc<dyn PluginAdapter>),
            prometheus_render: prometheus.map(|text| {
                Arc::new(move || text.to_string()) as Arc<dyn Fn() -> String + Send + Sync>
            }),
        },
    };
    Fixture {
        harness,
        dispatcher,
        app: build_router(state),
    }
}

fn webhook(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-channel-signature", "sig")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn webhook_acknowledges_and_dispatches() {
    let f = fixture(None, None).await;
    let payload = closing_payload("g1", Some("a@x.com"), Some("Seoul"), &["billing"]);

    let response = f
        .app
        .clone()
        .oneshot(webhook("/webhooks/channel-talk", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"success": true}));

    assert!(f.dispatcher.drain(Duration::from_secs(10)).await);
    assert_eq!(f.harness.recorded_count("g1").await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_body_is_still_acknowledged() {
    let f = fixture(None, None).await;

    let response = f
        .app
        .clone()
        .oneshot(webhook("/webhooks/channel-talk", "not json at all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    assert!(f.dispatcher.drain(Duration::from_secs(10)).await);
    assert_eq!(f.harness.transcripts.fetch_count().await, 0);
}

#[tokio::test]
async fn token_mismatch_is_rejected_without_dispatch() {
    let f = fixture(Some("s3cret"), None).await;
    let payload = closing_payload("g2", None, None, &[]);

    let wrong = f
        .app
        .clone()
        .oneshot(webhook("/webhooks/channel-talk?token=nope", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let missing = f
        .app
        .clone()
        .oneshot(webhook("/webhooks/channel-talk", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    assert!(f.dispatcher.drain(Duration::from_secs(10)).await);
    assert_eq!(f.harness.transcripts.fetch_count().await, 0);
}

#[tokio::test]
async fn matching_token_is_accepted() {
    let f = fixture(Some("s3cret"), None).await;
    let payload = closing_payload("g3", None, None, &[]);

    let response = f
        .app
        .clone()
        .oneshot(webhook("/webhooks/channel-talk?token=s3cret", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(f.dispatcher.drain(Duration::from_secs(10)).await);
    assert_eq!(f.harness.recorded_count("g3").await.unwrap(), 1);
}

#[tokio::test]
async fn health_reports_storage() {
    let f = fixture(Some("s3cret"), None).await;

    let response = f
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn metrics_is_404_without_recorder() {
    let f = fixture(None, None).await;
    let response = f
        .app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_renders_when_recorder_present() {
    let f = fixture(None, Some("casebook_intake_events_total{outcome=\"recorded\"} 1\n")).await;
    let response = f
        .app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("casebook_intake_events_total"));
}
