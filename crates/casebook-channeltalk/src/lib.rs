// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel Talk transcript source for the Casebook intake pipeline.
//!
//! Implements [`TranscriptSource`] on top of the Channel Talk Open API: the
//! message history of a conversation is fetched with a system access key pair
//! and normalized into ordered [`ChatTurn`]s.

pub mod client;
pub mod convert;
pub mod types;

use async_trait::async_trait;
use casebook_config::model::ChannelTalkConfig;
use casebook_core::{
    AdapterType, CasebookError, ChatTurn, HealthStatus, PluginAdapter, TranscriptSource,
};
use tracing::{debug, info};

use crate::client::ChannelTalkClient;

/// Transcript source backed by the Channel Talk Open API.
///
/// Missing credentials do not fail construction; they surface as a
/// configuration error on the first fetch.
pub struct ChannelTalkSource {
    client: Option<ChannelTalkClient>,
}

impl ChannelTalkSource {
    /// Creates a source from the `[channel_talk]` config section.
    pub fn new(config: &ChannelTalkConfig) -> Result<Self, CasebookError> {
        let client = match (non_blank(&config.api_key), non_blank(&config.api_secret)) {
            (Some(key), Some(secret)) => {
                info!(base_url = %config.base_url, "Channel Talk transcript source initialized");
                Some(ChannelTalkClient::new(key, secret, &config.base_url)?)
            }
            _ => {
                info!("Channel Talk credentials not configured, transcript fetches will fail");
                None
            }
        };
        Ok(Self { client })
    }

    /// Creates a source around an existing client.
    pub fn with_client(client: ChannelTalkClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Checks the configured credentials against the upstream.
    ///
    /// Returns false when no credentials are configured.
    pub async fn validate_credentials(&self) -> bool {
        match &self.client {
            Some(client) => client.validate_credentials().await,
            None => false,
        }
    }

    fn client(&self) -> Result<&ChannelTalkClient, CasebookError> {
        self.client.as_ref().ok_or_else(|| {
            CasebookError::Config(
                "channel_talk.api_key and channel_talk.api_secret must be set".to_string(),
            )
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl PluginAdapter for ChannelTalkSource {
    fn name(&self) -> &str {
        "channel-talk"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcript
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        Ok(match self.client {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Degraded("credentials not configured".to_string()),
        })
    }
}

#[async_trait]
impl TranscriptSource for ChannelTalkSource {
    async fn fetch_transcript(&self, conversation_id: &str) -> Result<Vec<ChatTurn>, CasebookError> {
        if conversation_id.trim().is_empty() {
            return Err(CasebookError::InvalidInput(
                "conversation id must not be blank".to_string(),
            ));
        }
        let messages = self.client()?.fetch_messages(conversation_id).await?;
        let turns = convert::to_chat_turns(&messages);
        debug!(
            conversation_id,
            messages = messages.len(),
            turns = turns.len(),
            "transcript normalized"
        );
        Ok(turns)
    }
}
