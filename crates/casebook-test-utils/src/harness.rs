// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end intake testing.
//!
//! `TestHarness` wires an [`IntakeOrchestrator`] to mock collaborators and a
//! real SQLite store in a temp directory.

use std::sync::Arc;

use casebook_config::model::StorageConfig;
use casebook_core::{CasebookError, ChatTurn, ClassificationOutcome, InquiryStore};
use casebook_intake::{InboundEvent, IntakeOrchestrator, IntakeOutcome};
use casebook_storage::SqliteStorage;

use crate::mock_classifier::MockClassifier;
use crate::mock_publisher::MockPublisher;
use crate::mock_transcript::MockTranscriptSource;

/// Desk URL prefix used by harness-built orchestrators.
pub const TEST_DESK_URL: &str = "https://desk.test/chats";

/// Builder for creating test environments with configurable collaborators.
pub struct TestHarnessBuilder {
    transcripts: MockTranscriptSource,
    classifier: MockClassifier,
    publisher: MockPublisher,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            transcripts: MockTranscriptSource::new(),
            classifier: MockClassifier::default(),
            publisher: MockPublisher::default(),
        }
    }

    /// Transcript returned for every conversation.
    pub fn with_turns(mut self, turns: Vec<ChatTurn>) -> Self {
        self.transcripts = MockTranscriptSource::with_turns(turns);
        self
    }

    pub fn with_transcripts(mut self, transcripts: MockTranscriptSource) -> Self {
        self.transcripts = transcripts;
        self
    }

    pub fn with_classification(mut self, outcome: ClassificationOutcome) -> Self {
        self.classifier = MockClassifier::returning(outcome);
        self
    }

    pub fn with_publisher(mut self, publisher: MockPublisher) -> Self {
        self.publisher = publisher;
        self
    }

    /// Build the harness, creating and migrating a temp database.
    pub async fn build(self) -> Result<TestHarness, CasebookError> {
        let temp_dir = tempfile::TempDir::new().map_err(CasebookError::storage)?;
        let db_path = temp_dir.path().join("casebook.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            ..StorageConfig::default()
        });
        storage.initialize().await?;
        let storage = Arc::new(storage);

        let transcripts = Arc::new(self.transcripts);
        let classifier = Arc::new(self.classifier);
        let publisher = Arc::new(self.publisher);

        let orchestrator = Arc::new(IntakeOrchestrator::new(
            transcripts.clone(),
            classifier.clone(),
            storage.clone(),
            publisher.clone(),
            TEST_DESK_URL,
        ));

        Ok(TestHarness {
            transcripts,
            classifier,
            publisher,
            storage,
            orchestrator,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete intake environment with mock collaborators and temp storage.
pub struct TestHarness {
    pub transcripts: Arc<MockTranscriptSource>,
    pub classifier: Arc<MockClassifier>,
    pub publisher: Arc<MockPublisher>,
    /// SQLite store (temp DB, removed on drop).
    pub storage: Arc<SqliteStorage>,
    pub orchestrator: Arc<IntakeOrchestrator>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one event through the orchestrator.
    pub async fn process(&self, event: &InboundEvent) -> Result<IntakeOutcome, CasebookError> {
        self.orchestrator.process(event).await
    }

    /// Desk URL the orchestrator builds for `chat_id`.
    pub fn conversation_url(&self, chat_id: &str) -> String {
        format!("{TEST_DESK_URL}/{chat_id}")
    }

    /// Inquiries recorded for `chat_id`.
    pub async fn recorded_count(&self, chat_id: &str) -> Result<u64, CasebookError> {
        self.storage
            .count_by_conversation(&self.conversation_url(chat_id))
            .await
    }
}
