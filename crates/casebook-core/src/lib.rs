// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Casebook inquiry intake pipeline.
//!
//! This crate provides the domain types, the error type, and the adapter
//! traits implemented by every pipeline collaborator (transcript source,
//! classifier, store, publisher).

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CasebookError;
pub use types::{
    AdapterType, ChatTurn, ClassificationOutcome, ClassificationResult, Department,
    HealthStatus, Inquiry, InquiryStatus, NewInquiry, PublishOutcome, SenderRole, SkipReason,
    Tag, TaxonomyEntry, TaxonomyKind,
};

pub use traits::{Classifier, InquiryStore, PagePublisher, PluginAdapter, TranscriptSource};
