// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transcript source for deterministic testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use casebook_core::{
    AdapterType, CasebookError, ChatTurn, HealthStatus, PluginAdapter, TranscriptSource,
};

/// Returns the same transcript for every conversation, or fails every fetch.
///
/// Every requested conversation id is recorded for assertions.
pub struct MockTranscriptSource {
    turns: Arc<Mutex<Vec<ChatTurn>>>,
    failure: Option<String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockTranscriptSource {
    /// A source that returns an empty transcript.
    pub fn new() -> Self {
        Self::with_turns(Vec::new())
    }

    /// A source that returns `turns` for every conversation.
    pub fn with_turns(turns: Vec<ChatTurn>) -> Self {
        Self {
            turns: Arc::new(Mutex::new(turns)),
            failure: None,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source whose every fetch fails with a transcript error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Replace the transcript returned by later fetches.
    pub async fn set_turns(&self, turns: Vec<ChatTurn>) {
        *self.turns.lock().await = turns;
    }

    /// Conversation ids passed to `fetch_transcript`, in call order.
    pub async fn requested_ids(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.requested.lock().await.len()
    }
}

impl Default for MockTranscriptSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTranscriptSource {
    fn name(&self) -> &str {
        "mock-transcript"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcript
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn fetch_transcript(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ChatTurn>, CasebookError> {
        self.requested.lock().await.push(conversation_id.to_string());
        if let Some(message) = &self.failure {
            return Err(CasebookError::Transcript {
                message: message.clone(),
                source: None,
            });
        }
        Ok(self.turns.lock().await.clone())
    }
}
