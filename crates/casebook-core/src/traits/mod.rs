// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the pipeline collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod classifier;
pub mod publisher;
pub mod storage;
pub mod transcript;

pub use adapter::PluginAdapter;
pub use classifier::Classifier;
pub use publisher::PagePublisher;
pub use storage::InquiryStore;
pub use transcript::TranscriptSource;
