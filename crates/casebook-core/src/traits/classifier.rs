// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier trait for LLM-backed conversation judgments.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatTurn, ClassificationOutcome};

/// Produces a department/summary/feedback judgment for a transcript.
///
/// Infallible by contract: every failure is reported as
/// [`ClassificationOutcome::Degraded`] and every deliberate no-op as
/// [`ClassificationOutcome::Skipped`].
#[async_trait]
pub trait Classifier: PluginAdapter {
    async fn classify(&self, turns: &[ChatTurn]) -> ClassificationOutcome;
}
