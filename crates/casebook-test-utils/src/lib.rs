// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Casebook integration tests.
//!
//! Provides mock collaborators and a harness that wires them to a real
//! SQLite store in a temp directory, so the intake pipeline can be driven
//! end to end without external services.
//!
//! # Components
//!
//! - [`MockTranscriptSource`] - canned transcript or failure, records requested ids
//! - [`MockClassifier`] - fixed outcome, counts calls
//! - [`MockPublisher`] - fixed URL or failure, captures published inquiries
//! - [`TestHarness`] - orchestrator over the mocks and a temp database
//! - [`fixtures`] - webhook payload and transcript builders

pub mod fixtures;
pub mod harness;
pub mod mock_classifier;
pub mod mock_publisher;
pub mod mock_transcript;

pub use harness::TestHarness;
pub use mock_classifier::MockClassifier;
pub use mock_publisher::MockPublisher;
pub use mock_transcript::MockTranscriptSource;
