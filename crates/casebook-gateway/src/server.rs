// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use casebook_config::model::GatewayConfig;
use casebook_core::{CasebookError, PluginAdapter};
use casebook_intake::IntakeDispatcher;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{WebhookAuth, webhook_auth_middleware};
use crate::handlers;

/// State for the unauthenticated health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Store whose health check backs the `storage` field.
    pub storage: Option<Arc<dyn PluginAdapter>>,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct GatewayState {
    pub dispatcher: IntakeDispatcher,
    pub auth: WebhookAuth,
    pub health: HealthState,
}

/// Builds the gateway router.
///
/// - POST /webhooks/channel-talk (token-checked when a token is configured)
/// - GET /health
/// - GET /metrics
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .route("/metrics", get(handlers::get_public_metrics))
        .with_state(state.health.clone());

    let webhook_routes = Router::new()
        .route(
            "/webhooks/channel-talk",
            post(handlers::post_channel_talk_webhook),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            webhook_auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .layer(TraceLayer::new_for_http())
}

/// Serves the gateway until `cancel` fires.
///
/// In-flight requests finish before this returns; intake runs they spawned
/// are drained separately by the dispatcher.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), CasebookError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CasebookError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| CasebookError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
