// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript source trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::CasebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ChatTurn;

/// Retrieves the full message history of a conversation.
#[async_trait]
pub trait TranscriptSource: PluginAdapter {
    /// Returns the conversation's turns, oldest first.
    ///
    /// An upstream that reports zero messages yields an empty vector, not an error.
    async fn fetch_transcript(&self, conversation_id: &str)
    -> Result<Vec<ChatTurn>, CasebookError>;
}
