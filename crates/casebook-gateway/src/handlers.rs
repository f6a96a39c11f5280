// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /webhooks/channel-talk, GET /health, GET /metrics.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use casebook_core::HealthStatus;
use casebook_intake::InboundEvent;

use crate::server::{GatewayState, HealthState};

/// Header carrying Channel Talk's webhook signature.
pub const SIGNATURE_HEADER: &str = "x-channel-signature";

/// Acknowledgement returned for every authenticated webhook call.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Storage health as reported by the store.
    pub storage: String,
}

/// POST /webhooks/channel-talk
///
/// Accepts the event for background processing and acknowledges at once.
/// Bodies that are not a valid event are logged and acknowledged as well.
pub async fn post_channel_talk_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<WebhookAck> {
    if let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        tracing::debug!(signature, "webhook signature header received");
    }

    match InboundEvent::from_slice(&body) {
        Ok(event) => {
            tracing::debug!(
                event = event.event.as_deref().unwrap_or_default(),
                event_type = event.event_type.as_deref().unwrap_or_default(),
                "webhook accepted"
            );
            state.dispatcher.dispatch(event);
        }
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "webhook body is not a valid event, acknowledging anyway");
        }
    }

    Json(WebhookAck { success: true })
}

/// GET /health
///
/// Unauthenticated liveness report including storage health.
pub async fn get_public_health(State(health): State<HealthState>) -> Response {
    let storage = match &health.storage {
        Some(store) => store.health_check().await,
        None => Ok(HealthStatus::Unhealthy("not configured".to_string())),
    };

    let (code, status, storage) = match storage {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok", "healthy".to_string()),
        Ok(HealthStatus::Degraded(reason)) => {
            (StatusCode::OK, "degraded", format!("degraded: {reason}"))
        }
        Ok(HealthStatus::Unhealthy(reason)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "degraded",
            format!("unhealthy: {reason}"),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "degraded",
            format!("unhealthy: {e}"),
        ),
    };

    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: health.start_time.elapsed().as_secs(),
        storage,
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
///
/// Prometheus text exposition, or 404 when no recorder is installed.
pub async fn get_public_metrics(State(health): State<HealthState>) -> Response {
    match &health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
