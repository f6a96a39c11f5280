// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI classifier for the Casebook intake pipeline.
//!
//! Implements [`Classifier`] with one chat-completions call per transcript.
//! The classifier never fails: every problem in the call-and-parse sequence
//! becomes [`ClassificationOutcome::Degraded`], and a missing credential or an
//! empty transcript becomes [`ClassificationOutcome::Skipped`] without any
//! network traffic.

pub mod client;
pub mod parse;
pub mod prompt;
pub mod types;

use async_trait::async_trait;
use casebook_config::model::OpenAiConfig;
use casebook_core::{
    AdapterType, CasebookError, ChatTurn, ClassificationOutcome, Classifier, HealthStatus,
    PluginAdapter, SkipReason,
};
use tracing::{debug, info, warn};

use crate::client::OpenAiClient;

/// Classifier backed by the OpenAI chat-completions API.
pub struct OpenAiClassifier {
    client: Option<OpenAiClient>,
}

impl OpenAiClassifier {
    /// Creates a classifier from the `[openai]` config section.
    ///
    /// Without an API key every classification is skipped.
    pub fn new(config: &OpenAiConfig) -> Result<Self, CasebookError> {
        let client = match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                info!(model = %config.model, "OpenAI classifier initialized");
                Some(OpenAiClient::new(
                    key,
                    &config.api_url,
                    &config.model,
                    config.temperature,
                )?)
            }
            None => {
                info!("OpenAI API key not configured, classification disabled");
                None
            }
        };
        Ok(Self { client })
    }

    /// Creates a classifier around an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    async fn call_and_parse(
        client: &OpenAiClient,
        turns: &[ChatTurn],
    ) -> Result<ClassificationOutcome, CasebookError> {
        let prompt = prompt::build_prompt(turns);
        let content = client.complete(&prompt).await?;
        let result = parse::parse_classification(&content)?;
        Ok(ClassificationOutcome::Classified(result))
    }
}

#[async_trait]
impl PluginAdapter for OpenAiClassifier {
    fn name(&self) -> &str {
        "openai"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        Ok(match self.client {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Degraded("API key not configured".to_string()),
        })
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, turns: &[ChatTurn]) -> ClassificationOutcome {
        if turns.is_empty() {
            return ClassificationOutcome::Skipped(SkipReason::EmptyTranscript);
        }
        let Some(client) = &self.client else {
            return ClassificationOutcome::Skipped(SkipReason::MissingCredentials);
        };

        match Self::call_and_parse(client, turns).await {
            Ok(outcome) => {
                debug!(turns = turns.len(), "transcript classified");
                outcome
            }
            Err(e) => {
                warn!(error = %e, model = client.model(), "classification degraded to empty result");
                ClassificationOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }
}
