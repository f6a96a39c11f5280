// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notion publisher for the Casebook intake pipeline.
//!
//! Mirrors each persisted inquiry as a page in a Notion database. Publishing
//! is best-effort from the pipeline's point of view; this crate only reports
//! failures, the orchestrator decides what they mean.

pub mod client;
pub mod page;

use async_trait::async_trait;
use casebook_config::model::NotionConfig;
use casebook_core::{
    AdapterType, CasebookError, ClassificationResult, HealthStatus, Inquiry, PagePublisher,
    PluginAdapter,
};
use tracing::{debug, info};

use crate::client::NotionClient;

/// Publisher backed by the Notion pages API.
pub struct NotionPublisher {
    client: Option<NotionClient>,
    database_id: Option<String>,
}

impl NotionPublisher {
    /// Creates a publisher from the `[notion]` config section.
    ///
    /// Missing credentials are reported by [`PagePublisher::publish`], not here.
    pub fn new(config: &NotionConfig) -> Result<Self, CasebookError> {
        let client = match config.token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => Some(NotionClient::new(
                token,
                &config.base_url,
                &config.api_version,
            )?),
            None => None,
        };
        let database_id = config
            .database_id
            .clone()
            .filter(|id| !id.trim().is_empty());

        if client.is_some() && database_id.is_some() {
            info!("Notion publisher initialized");
        } else {
            info!("Notion token or database id not configured, publishing will fail");
        }
        Ok(Self {
            client,
            database_id,
        })
    }

    /// Creates a publisher around an existing client.
    pub fn with_client(client: NotionClient, database_id: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            database_id: Some(database_id.into()),
        }
    }
}

#[async_trait]
impl PluginAdapter for NotionPublisher {
    fn name(&self) -> &str {
        "notion"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Publisher
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        Ok(match (&self.client, &self.database_id) {
            (Some(_), Some(_)) => HealthStatus::Healthy,
            (None, _) => HealthStatus::Degraded("token not configured".to_string()),
            (_, None) => HealthStatus::Degraded("database id not configured".to_string()),
        })
    }
}

#[async_trait]
impl PagePublisher for NotionPublisher {
    async fn publish(
        &self,
        inquiry: &Inquiry,
        classification: &ClassificationResult,
    ) -> Result<String, CasebookError> {
        let Some(client) = &self.client else {
            return Err(CasebookError::Config("notion.token is not set".to_string()));
        };
        let Some(database_id) = &self.database_id else {
            return Err(CasebookError::Config(
                "notion.database_id is not set".to_string(),
            ));
        };

        let body = page::build_page_request(database_id, inquiry, classification);
        let url = client.create_page(&body).await?;
        debug!(inquiry_id = %inquiry.id, url = %url, "inquiry published");
        Ok(url)
    }
}
