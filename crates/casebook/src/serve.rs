// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `casebook serve` command implementation.
//!
//! Wires storage, the three upstream collaborators, the intake dispatcher and
//! the HTTP gateway, then runs until SIGINT/SIGTERM. On shutdown the gateway
//! stops accepting, in-flight intake runs are drained, and the WAL is
//! checkpointed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use casebook_channeltalk::ChannelTalkSource;
use casebook_config::model::CasebookConfig;
use casebook_core::{CasebookError, HealthStatus, PluginAdapter};
use casebook_gateway::{GatewayState, HealthState, WebhookAuth};
use casebook_intake::shutdown::install_signal_handler;
use casebook_intake::{IntakeDispatcher, IntakeOrchestrator};
use casebook_notion::NotionPublisher;
use casebook_openai::OpenAiClassifier;
use casebook_storage::SqliteStorage;
use tracing::{info, warn};

type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs the service until a shutdown signal arrives.
pub async fn run_serve(config: CasebookConfig) -> Result<(), CasebookError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let transcripts = Arc::new(ChannelTalkSource::new(&config.channel_talk)?);
    let classifier = Arc::new(OpenAiClassifier::new(&config.openai)?);
    let publisher = Arc::new(NotionPublisher::new(&config.notion)?);

    let adapters: [&dyn PluginAdapter; 4] = [
        storage.as_ref(),
        transcripts.as_ref(),
        classifier.as_ref(),
        publisher.as_ref(),
    ];
    log_adapter_health(&adapters).await;

    let prometheus_render = init_metrics(&config)?;

    let orchestrator = Arc::new(IntakeOrchestrator::new(
        transcripts,
        classifier,
        storage.clone(),
        publisher,
        config.channel_talk.desk_url.clone(),
    ));
    let dispatcher = IntakeDispatcher::new(orchestrator);

    let cancel = install_signal_handler();
    let state = GatewayState {
        dispatcher: dispatcher.clone(),
        auth: WebhookAuth {
            token: config.gateway.webhook_token.clone(),
        },
        health: HealthState {
            start_time: Instant::now(),
            storage: Some(storage.clone() as Arc<dyn PluginAdapter>),
            prometheus_render,
        },
    };

    let served = casebook_gateway::start_server(&config.gateway, state, cancel.clone()).await;
    // A bind failure ends serving too; make sure nothing else keeps waiting.
    cancel.cancel();

    dispatcher
        .drain(Duration::from_secs(config.server.drain_timeout_secs))
        .await;
    if let Err(e) = storage.close().await {
        warn!(error = %e, "WAL checkpoint on shutdown failed");
    }

    served?;
    info!("casebook stopped");
    Ok(())
}

async fn log_adapter_health(adapters: &[&dyn PluginAdapter]) {
    for adapter in adapters {
        match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => {
                info!(adapter = adapter.name(), kind = %adapter.adapter_type(), "adapter ready")
            }
            Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
                warn!(adapter = adapter.name(), reason = %reason, "adapter not fully configured")
            }
            Err(e) => warn!(adapter = adapter.name(), error = %e, "adapter health check failed"),
        }
    }
}

#[cfg(feature = "prometheus")]
fn init_metrics(config: &CasebookConfig) -> Result<Option<MetricsRender>, CasebookError> {
    if !config.prometheus.enabled {
        return Ok(None);
    }
    let adapter = casebook_prometheus::PrometheusAdapter::install()?;
    Ok(Some(Arc::new(move || adapter.render())))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(config: &CasebookConfig) -> Result<Option<MetricsRender>, CasebookError> {
    if config.prometheus.enabled {
        warn!("prometheus.enabled is set but this build has no prometheus feature");
    }
    Ok(None)
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("casebook={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
