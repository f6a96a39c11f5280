// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publisher trait for mirroring inquiries into an external docs workspace.

use async_trait::async_trait;

use crate::error::CasebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ClassificationResult, Inquiry};

/// Creates an external page for a persisted inquiry.
#[async_trait]
pub trait PagePublisher: PluginAdapter {
    /// Creates the page and returns its canonical URL.
    async fn publish(
        &self,
        inquiry: &Inquiry,
        classification: &ClassificationResult,
    ) -> Result<String, CasebookError>;
}
