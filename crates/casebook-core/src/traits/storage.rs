// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for inquiry persistence.

use async_trait::async_trait;

use crate::error::CasebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Inquiry, NewInquiry, TaxonomyEntry, TaxonomyKind};

/// Persistence backend for inquiries and their taxonomy.
///
/// `record_inquiry` is the single transactional unit of the pipeline: the
/// inquiry row, its chat turns, and its tag/department links are written
/// together or not at all.
#[async_trait]
pub trait InquiryStore: PluginAdapter {
    /// Persists a new inquiry aggregate and returns it fully materialized.
    async fn record_inquiry(&self, inquiry: &NewInquiry) -> Result<Inquiry, CasebookError>;

    /// Attaches the docs page URL to an existing inquiry.
    async fn attach_docs_url(&self, inquiry_id: &str, url: &str) -> Result<(), CasebookError>;

    /// Loads an inquiry with its chat turns, tags, and departments.
    async fn get_inquiry(&self, inquiry_id: &str) -> Result<Option<Inquiry>, CasebookError>;

    /// Counts inquiries already recorded for a conversation URL.
    async fn count_by_conversation(&self, conversation_url: &str) -> Result<u64, CasebookError>;

    /// Returns the entry with this exact name, creating it if absent.
    ///
    /// Blank names yield `None` and create nothing.
    async fn find_or_create(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<Option<TaxonomyEntry>, CasebookError>;

    /// Lists every entry of a kind, ordered by name.
    async fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, CasebookError>;
}
