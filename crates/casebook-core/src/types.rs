// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the intake pipeline, its collaborators, and storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Department labels the classifier is instructed to choose from.
///
/// The set is open: labels outside it are stored as returned by the model.
pub const KNOWN_DEPARTMENTS: [&str; 5] = ["QA", "Marketing", "Engineering", "Operations", "Planning"];

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays in the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Transcript,
    Classifier,
    Storage,
    Publisher,
    Observability,
}

/// Who sent a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    Customer,
    Agent,
    System,
}

impl SenderRole {
    /// Display label used when rendering a transcript for the classifier.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Agent => "Agent",
            Self::System => "System",
        }
    }
}

/// Lifecycle status of an inquiry. Intake always records `Done`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    New,
    InProgress,
    Done,
}

/// One normalized message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: SenderRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured judgment about a conversation. Empty is a valid terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Department labels, blank entries already removed.
    pub departments: Vec<String>,
    /// Summary written for the departments involved.
    pub summary: String,
    /// Key feedback extracted from the conversation.
    pub key_feedback: String,
    /// Department-agnostic summary, when one was produced.
    pub general_summary: Option<String>,
}

impl ClassificationResult {
    /// The empty result used whenever classification is skipped or fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
            && self.summary.is_empty()
            && self.key_feedback.is_empty()
            && self.general_summary.as_deref().is_none_or(str::is_empty)
    }
}

/// Why a classification was deliberately not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    EmptyTranscript,
    MissingCredentials,
}

/// What happened when the classifier was asked for a judgment.
///
/// All three variants carry a usable result; the distinction exists so callers
/// and tests can tell "never tried" apart from "tried and failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// The model answered and the answer parsed.
    Classified(ClassificationResult),
    /// No call was made.
    Skipped(SkipReason),
    /// A call was attempted and failed somewhere in the call-and-parse sequence.
    Degraded { reason: String },
}

impl ClassificationOutcome {
    /// The result to record, empty unless classification succeeded.
    pub fn result(&self) -> ClassificationResult {
        match self {
            Self::Classified(result) => result.clone(),
            Self::Skipped(_) | Self::Degraded { .. } => ClassificationResult::empty(),
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Classified(_) => "classified",
            Self::Skipped(_) => "skipped",
            Self::Degraded { .. } => "degraded",
        }
    }
}

/// Result of the best-effort docs publish step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The page was created and its URL attached to the inquiry.
    Published { url: String },
    /// Publishing failed; the inquiry stays valid without a docs URL.
    Failed { reason: String },
}

impl PublishOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Published { .. } => "published",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Which taxonomy namespace an entry belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Tag,
    Department,
}

/// A named, shared taxonomy entity, unique by exact name within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub id: String,
    pub kind: TaxonomyKind,
    pub name: String,
    pub created_at: String,
}

pub type Tag = TaxonomyEntry;
pub type Department = TaxonomyEntry;

/// Everything the orchestrator builds before persisting an inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub title: String,
    pub status: InquiryStatus,
    pub summary: String,
    pub key_feedback: String,
    pub conversation_url: String,
    pub customer_city: Option<String>,
    pub chat_turns: Vec<ChatTurn>,
    /// Free-text tag names from the source platform, unresolved.
    pub tag_names: Vec<String>,
    /// Department labels from classification, unresolved.
    pub department_names: Vec<String>,
}

/// A persisted inquiry with its owned chat turns and taxonomy links materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: String,
    pub title: String,
    pub status: InquiryStatus,
    pub summary: String,
    pub key_feedback: String,
    pub conversation_url: String,
    pub customer_city: Option<String>,
    pub docs_page_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub chat_turns: Vec<ChatTurn>,
    pub tags: Vec<Tag>,
    pub departments: Vec<Department>,
}

impl Inquiry {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn department_names(&self) -> Vec<&str> {
        self.departments.iter().map(|d| d.name.as_str()).collect()
    }
}

/// Current time in the ISO 8601 form used for stored timestamps.
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Format an instant in the ISO 8601 form used for stored timestamps.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
