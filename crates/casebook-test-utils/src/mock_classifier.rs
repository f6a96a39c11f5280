// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classifier with a fixed outcome.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use casebook_core::{
    AdapterType, CasebookError, ChatTurn, ClassificationOutcome, ClassificationResult,
    Classifier, HealthStatus, PluginAdapter, SkipReason,
};

/// Returns the configured outcome for every non-empty transcript.
///
/// Empty transcripts are skipped the way the real classifier skips them.
pub struct MockClassifier {
    outcome: ClassificationOutcome,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn returning(outcome: ClassificationOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    /// A classifier that succeeds with `result`.
    pub fn classified(result: ClassificationResult) -> Self {
        Self::returning(ClassificationOutcome::Classified(result))
    }

    /// A classifier whose every attempt degrades.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::returning(ClassificationOutcome::Degraded {
            reason: reason.into(),
        })
    }

    /// Number of `classify` calls so far, including skipped ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::returning(ClassificationOutcome::Skipped(SkipReason::MissingCredentials))
    }
}

#[async_trait]
impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, turns: &[ChatTurn]) -> ClassificationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if turns.is_empty() {
            return ClassificationOutcome::Skipped(SkipReason::EmptyTranscript);
        }
        self.outcome.clone()
    }
}
