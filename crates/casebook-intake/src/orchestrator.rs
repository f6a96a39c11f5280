// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-event intake pipeline.
//!
//! One run walks filter, resolve, fetch, classify, build, persist and publish
//! strictly in order. Only fetch and persist failures abort a run; publishing
//! is isolated from everything before it.

use std::sync::Arc;
use std::time::Instant;

use casebook_core::{
    CasebookError, ClassificationOutcome, ClassificationResult, Classifier, Inquiry,
    InquiryStatus, InquiryStore, NewInquiry, PagePublisher, PublishOutcome, TranscriptSource,
};
use casebook_prometheus::recording;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::event::InboundEvent;

/// Title label used when the event carries no customer email.
pub const FALLBACK_CUSTOMER_LABEL: &str = "customer";

/// Why an event produced no inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotClosing,
    MissingConversationId,
    EmptyTranscript,
}

/// Terminal outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Ignored(IgnoreReason),
    Recorded {
        inquiry_id: String,
        classification: ClassificationOutcome,
        publish: PublishOutcome,
    },
}

impl IntakeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ignored(_) => "ignored",
            Self::Recorded { .. } => "recorded",
        }
    }
}

/// Runs the intake pipeline against its four collaborators.
pub struct IntakeOrchestrator {
    transcripts: Arc<dyn TranscriptSource>,
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn InquiryStore>,
    publisher: Arc<dyn PagePublisher>,
    desk_url: String,
}

impl IntakeOrchestrator {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn InquiryStore>,
        publisher: Arc<dyn PagePublisher>,
        desk_url: impl Into<String>,
    ) -> Self {
        Self {
            transcripts,
            classifier,
            store,
            publisher,
            desk_url: desk_url.into(),
        }
    }

    /// Processes one webhook event to a terminal outcome.
    ///
    /// Errors are processing failures: the transcript could not be fetched or
    /// the inquiry could not be persisted. Nothing is retried.
    pub async fn process(&self, event: &InboundEvent) -> Result<IntakeOutcome, CasebookError> {
        let span = info_span!(
            "intake",
            conversation_id = event.conversation_id().unwrap_or_default()
        );
        let started = Instant::now();
        let result = self.run(event).instrument(span.clone()).await;

        let _enter = span.enter();
        match &result {
            Ok(outcome) => recording::record_intake(outcome.label()),
            Err(e) => {
                error!(error = %e, "intake run failed");
                recording::record_intake("failed");
            }
        }
        recording::record_intake_duration(started.elapsed().as_secs_f64());
        result
    }

    async fn run(&self, event: &InboundEvent) -> Result<IntakeOutcome, CasebookError> {
        if !event.is_closing() {
            debug!(event = event.event.as_deref().unwrap_or_default(), "event is not a close, ignoring");
            return Ok(IntakeOutcome::Ignored(IgnoreReason::NotClosing));
        }

        let Some(conversation_id) = event.conversation_id() else {
            warn!("closing event without conversation id, ignoring");
            return Ok(IntakeOutcome::Ignored(IgnoreReason::MissingConversationId));
        };

        let turns = self.transcripts.fetch_transcript(conversation_id).await?;
        if turns.is_empty() {
            info!("conversation has no messages, ignoring");
            return Ok(IntakeOutcome::Ignored(IgnoreReason::EmptyTranscript));
        }

        let classification = self.classifier.classify(&turns).await;
        recording::record_classification(classification.label());
        let result = classification.result();

        let conversation_url = conversation_url(&self.desk_url, conversation_id);
        self.warn_on_redelivery(&conversation_url).await;

        let new_inquiry = NewInquiry {
            title: inquiry_title(event.customer_email()),
            status: InquiryStatus::Done,
            summary: result.summary.clone(),
            key_feedback: result.key_feedback.clone(),
            conversation_url,
            customer_city: event.customer_city().map(str::to_string),
            chat_turns: turns,
            tag_names: event.tag_names(),
            department_names: result.departments.clone(),
        };
        let inquiry = self.store.record_inquiry(&new_inquiry).await?;
        info!(
            inquiry_id = %inquiry.id,
            turns = inquiry.chat_turns.len(),
            classification = classification.label(),
            "inquiry recorded"
        );

        let publish = self.publish(&inquiry, &result).await;
        recording::record_publish(publish.label());

        Ok(IntakeOutcome::Recorded {
            inquiry_id: inquiry.id,
            classification,
            publish,
        })
    }

    async fn publish(&self, inquiry: &Inquiry, result: &ClassificationResult) -> PublishOutcome {
        let url = match self.publisher.publish(inquiry, result).await {
            Ok(url) => url,
            Err(e) => {
                warn!(inquiry_id = %inquiry.id, error = %e, "docs publish failed, inquiry kept without docs url");
                return PublishOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if let Err(e) = self.store.attach_docs_url(&inquiry.id, &url).await {
            warn!(inquiry_id = %inquiry.id, error = %e, "failed to attach docs url");
            return PublishOutcome::Failed {
                reason: e.to_string(),
            };
        }
        debug!(inquiry_id = %inquiry.id, url = %url, "docs url attached");
        PublishOutcome::Published { url }
    }

    // Redelivered events are recorded again; this only makes the duplicate visible.
    async fn warn_on_redelivery(&self, conversation_url: &str) {
        match self.store.count_by_conversation(conversation_url).await {
            Ok(0) => {}
            Ok(existing) => warn!(
                existing,
                conversation_url, "conversation already has recorded inquiries, recording a duplicate"
            ),
            Err(e) => debug!(error = %e, "redelivery check failed"),
        }
    }
}

/// `"Inquiry - {email}"`, or the fallback label when there is no email.
pub fn inquiry_title(email: Option<&str>) -> String {
    format!("Inquiry - {}", email.unwrap_or(FALLBACK_CUSTOMER_LABEL))
}

/// Desk link for a conversation.
pub fn conversation_url(desk_url: &str, conversation_id: &str) -> String {
    format!("{}/{}", desk_url.trim_end_matches('/'), conversation_id)
}
