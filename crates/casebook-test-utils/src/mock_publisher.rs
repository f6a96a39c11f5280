// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock docs publisher that captures what it was asked to publish.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use casebook_core::{
    AdapterType, CasebookError, ClassificationResult, HealthStatus, Inquiry, PagePublisher,
    PluginAdapter,
};

#[derive(Debug, Clone)]
enum Behavior {
    Succeed { base_url: String },
    FailPublish(String),
    FailConfig(String),
}

/// A publisher with scripted success or failure.
///
/// Successful publishes return `{base_url}/{inquiry_id}`.
pub struct MockPublisher {
    behavior: Behavior,
    published: Arc<Mutex<Vec<(Inquiry, ClassificationResult)>>>,
}

impl MockPublisher {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(base_url: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Succeed {
            base_url: base_url.into(),
        })
    }

    /// Every publish fails with a publish error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::FailPublish(message.into()))
    }

    /// Every publish fails with a configuration error.
    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::FailConfig(message.into()))
    }

    /// Inquiries passed to `publish`, with their classification, in call order.
    pub async fn published(&self) -> Vec<(Inquiry, ClassificationResult)> {
        self.published.lock().await.clone()
    }

    pub async fn publish_count(&self) -> usize {
        self.published.lock().await.len()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::succeeding("https://docs.test/pages")
    }
}

#[async_trait]
impl PluginAdapter for MockPublisher {
    fn name(&self) -> &str {
        "mock-publisher"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Publisher
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl PagePublisher for MockPublisher {
    async fn publish(
        &self,
        inquiry: &Inquiry,
        classification: &ClassificationResult,
    ) -> Result<String, CasebookError> {
        self.published
            .lock()
            .await
            .push((inquiry.clone(), classification.clone()));
        match &self.behavior {
            Behavior::Succeed { base_url } => Ok(format!("{base_url}/{}", inquiry.id)),
            Behavior::FailPublish(message) => Err(CasebookError::Publish {
                message: message.clone(),
                source: None,
            }),
            Behavior::FailConfig(message) => Err(CasebookError::Config(message.clone())),
        }
    }
}
