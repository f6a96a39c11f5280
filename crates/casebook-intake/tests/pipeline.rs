// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end intake runs over mock collaborators and a temp SQLite store.

use std::sync::Arc;

use casebook_config::model::StorageConfig;
use casebook_core::{
    ClassificationOutcome, ClassificationResult, InquiryStatus, InquiryStore, PublishOutcome,
    SenderRole, SkipReason, TaxonomyKind,
};
use casebook_intake::{IgnoreReason, IntakeOrchestrator, IntakeOutcome};
use casebook_test_utils::fixtures::{closing_event, event_from, opening_event, turns};
use casebook_storage::SqliteStorage;
use casebook_test_utils::{MockClassifier, MockPublisher, MockTranscriptSource, TestHarness};
use serde_json::json;

fn engineering() -> ClassificationResult {
    ClassificationResult {
        departments: vec!["Engineering".into()],
        summary: "Billing page crashes".into(),
        key_feedback: "Cannot open invoices".into(),
        general_summary: Some("Customer cannot view invoices".into()),
    }
}

fn recorded_id(outcome: &IntakeOutcome) -> String {
    match outcome {
        IntakeOutcome::Recorded { inquiry_id, .. } => inquiry_id.clone(),
        other => panic!("expected Recorded, got {other:?}"),
    }
}

#[tokio::test]
async fn closing_event_records_classified_inquiry_and_publishes() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["My invoice page is blank", "Looking into it", "Thanks"]))
        .with_classification(ClassificationOutcome::Classified(engineering()))
        .build()
        .await
        .unwrap();

    let event = closing_event("c1", Some("a@x.com"), Some("Seoul"), &["billing"]);
    let outcome = harness.process(&event).await.unwrap();
    let id = recorded_id(&outcome);

    let inquiry = harness.storage.get_inquiry(&id).await.unwrap().unwrap();
    assert_eq!(inquiry.title, "Inquiry - a@x.com");
    assert_eq!(inquiry.status, InquiryStatus::Done);
    assert_eq!(inquiry.summary, "Billing page crashes");
    assert_eq!(inquiry.key_feedback, "Cannot open invoices");
    assert_eq!(inquiry.conversation_url, harness.conversation_url("c1"));
    assert_eq!(inquiry.customer_city.as_deref(), Some("Seoul"));
    assert_eq!(inquiry.tag_names(), vec!["billing"]);
    assert_eq!(inquiry.department_names(), vec!["Engineering"]);

    let texts: Vec<&str> = inquiry.chat_turns.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["My invoice page is blank", "Looking into it", "Thanks"]);
    assert_eq!(inquiry.chat_turns[1].role, SenderRole::Agent);

    let expected_url = format!("https://docs.test/pages/{id}");
    assert_eq!(inquiry.docs_page_url.as_deref(), Some(expected_url.as_str()));
    let IntakeOutcome::Recorded { publish, .. } = outcome else {
        unreachable!()
    };
    assert_eq!(publish, PublishOutcome::Published { url: expected_url });

    assert_eq!(harness.transcripts.requested_ids().await, vec!["c1"]);
    assert_eq!(harness.classifier.call_count(), 1);
    let published = harness.publisher.published().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].1.departments, vec!["Engineering"]);
}

#[tokio::test]
async fn non_closing_event_has_no_side_effects() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hello"]))
        .build()
        .await
        .unwrap();

    let outcome = harness.process(&opening_event("c1")).await.unwrap();
    assert_eq!(outcome, IntakeOutcome::Ignored(IgnoreReason::NotClosing));
    assert_eq!(harness.transcripts.fetch_count().await, 0);
    assert_eq!(harness.classifier.call_count(), 0);
    assert_eq!(harness.publisher.publish_count().await, 0);
    assert_eq!(harness.recorded_count("c1").await.unwrap(), 0);
}

#[tokio::test]
async fn closing_event_without_conversation_id_is_ignored() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hello"]))
        .build()
        .await
        .unwrap();

    let event = event_from(json!({"event": "push", "entity": {"log": {"action": "close"}}}));
    let outcome = harness.process(&event).await.unwrap();
    assert_eq!(
        outcome,
        IntakeOutcome::Ignored(IgnoreReason::MissingConversationId)
    );
    assert_eq!(harness.transcripts.fetch_count().await, 0);
}

#[tokio::test]
async fn entity_chat_id_is_used_when_user_chat_is_absent() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hello"]))
        .build()
        .await
        .unwrap();

    let event = event_from(json!({
        "event": "push",
        "entity": {"chatId": "c9", "log": {"action": "close"}}
    }));
    let id = recorded_id(&harness.process(&event).await.unwrap());
    assert_eq!(harness.transcripts.requested_ids().await, vec!["c9"]);

    let inquiry = harness.storage.get_inquiry(&id).await.unwrap().unwrap();
    assert_eq!(inquiry.title, "Inquiry - customer");
    assert!(inquiry.customer_city.is_none());
    assert!(inquiry.tags.is_empty());
}

#[tokio::test]
async fn zero_message_transcript_records_nothing() {
    let harness = TestHarness::builder().build().await.unwrap();

    let outcome = harness
        .process(&closing_event("c1", Some("a@x.com"), None, &[]))
        .await
        .unwrap();
    assert_eq!(outcome, IntakeOutcome::Ignored(IgnoreReason::EmptyTranscript));
    assert_eq!(harness.classifier.call_count(), 0);
    assert_eq!(harness.publisher.publish_count().await, 0);
    assert_eq!(harness.recorded_count("c1").await.unwrap(), 0);
}

#[tokio::test]
async fn fetch_failure_aborts_without_writing() {
    let harness = TestHarness::builder()
        .with_transcripts(MockTranscriptSource::failing("HTTP 502"))
        .build()
        .await
        .unwrap();

    let err = harness
        .process(&closing_event("c1", None, None, &["billing"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("HTTP 502"), "got: {err}");
    assert_eq!(harness.classifier.call_count(), 0);
    assert_eq!(harness.recorded_count("c1").await.unwrap(), 0);
    assert!(
        harness
            .storage
            .list_taxonomy(TaxonomyKind::Tag)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn publish_failure_keeps_inquiry_without_docs_url() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["crash on upload", "forwarded"]))
        .with_classification(ClassificationOutcome::Classified(engineering()))
        .with_publisher(MockPublisher::failing("HTTP 500"))
        .build()
        .await
        .unwrap();

    let outcome = harness
        .process(&closing_event("c2", Some("b@x.com"), None, &["bug"]))
        .await
        .unwrap();
    let id = recorded_id(&outcome);
    let IntakeOutcome::Recorded { publish, .. } = &outcome else {
        unreachable!()
    };
    assert!(matches!(publish, PublishOutcome::Failed { .. }));

    let inquiry = harness.storage.get_inquiry(&id).await.unwrap().unwrap();
    assert!(inquiry.docs_page_url.is_none());
    assert_eq!(inquiry.chat_turns.len(), 2);
    assert_eq!(inquiry.tag_names(), vec!["bug"]);
    assert_eq!(inquiry.department_names(), vec!["Engineering"]);
}

#[tokio::test]
async fn unconfigured_publisher_is_isolated_too() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hi"]))
        .with_publisher(MockPublisher::unconfigured("notion.token is not set"))
        .build()
        .await
        .unwrap();

    let outcome = harness
        .process(&closing_event("c3", None, None, &[]))
        .await
        .unwrap();
    let IntakeOutcome::Recorded { publish, .. } = outcome else {
        panic!("expected Recorded");
    };
    assert!(matches!(publish, PublishOutcome::Failed { reason } if reason.contains("notion.token")));
}

#[tokio::test]
async fn skipped_classification_records_empty_fields() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hi"]))
        .with_classification(ClassificationOutcome::Skipped(
            SkipReason::MissingCredentials,
        ))
        .build()
        .await
        .unwrap();

    let outcome = harness
        .process(&closing_event("c4", None, None, &[]))
        .await
        .unwrap();
    let id = recorded_id(&outcome);
    let inquiry = harness.storage.get_inquiry(&id).await.unwrap().unwrap();
    assert_eq!(inquiry.summary, "");
    assert_eq!(inquiry.key_feedback, "");
    assert!(inquiry.departments.is_empty());

    let IntakeOutcome::Recorded { classification, .. } = outcome else {
        unreachable!()
    };
    assert_eq!(
        classification,
        ClassificationOutcome::Skipped(SkipReason::MissingCredentials)
    );
}

#[tokio::test]
async fn redelivered_event_records_a_second_inquiry() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hi"]))
        .build()
        .await
        .unwrap();

    let event = closing_event("c5", None, None, &["billing"]);
    let first = recorded_id(&harness.process(&event).await.unwrap());
    let second = recorded_id(&harness.process(&event).await.unwrap());

    assert_ne!(first, second);
    assert_eq!(harness.recorded_count("c5").await.unwrap(), 2);
    let tags = harness
        .storage
        .list_taxonomy(TaxonomyKind::Tag)
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn billing_scenario_from_plain_user_email() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["payment failed", "refunded"]))
        .with_classification(ClassificationOutcome::Classified(ClassificationResult {
            departments: vec!["Engineering".into()],
            summary: "Payment failure".into(),
            key_feedback: "refund issued".into(),
            general_summary: None,
        }))
        .build()
        .await
        .unwrap();

    let event = event_from(json!({
        "event": "push",
        "entity": {"chatId": "c1", "log": {"action": "close"}},
        "refers": {
            "userChat": {"id": "c1", "tags": ["billing"]},
            "user": {"email": "a@x.com", "city": "Seoul"}
        }
    }));
    let id = recorded_id(&harness.process(&event).await.unwrap());

    let inquiry = harness.storage.get_inquiry(&id).await.unwrap().unwrap();
    assert!(inquiry.title.contains("a@x.com"));
    assert_eq!(inquiry.status, InquiryStatus::Done);
    assert_eq!(inquiry.customer_city.as_deref(), Some("Seoul"));
    assert_eq!(inquiry.chat_turns.len(), 2);
    assert_eq!(inquiry.chat_turns[0].role, SenderRole::Customer);
    assert_eq!(inquiry.chat_turns[0].text, "payment failed");
    assert_eq!(inquiry.chat_turns[1].role, SenderRole::Agent);
    assert_eq!(inquiry.chat_turns[1].text, "refunded");
    assert_eq!(inquiry.tag_names(), vec!["billing"]);
    assert_eq!(inquiry.department_names(), vec!["Engineering"]);
    assert_eq!(inquiry.summary, "Payment failure");
    assert_eq!(inquiry.key_feedback, "refund issued");
}

#[tokio::test]
#[tracing_test::traced_test]
async fn redelivery_is_logged_as_warning() {
    let harness = TestHarness::builder()
        .with_turns(turns(&["hi"]))
        .build()
        .await
        .unwrap();

    let event = closing_event("c6", None, None, &[]);
    harness.process(&event).await.unwrap();
    assert!(!logs_contain("already has recorded inquiries"));

    harness.process(&event).await.unwrap();
    assert!(logs_contain("already has recorded inquiries"));
}

#[tokio::test]
async fn persistence_failure_is_an_error_and_skips_publish() {
    let transcripts = Arc::new(MockTranscriptSource::with_turns(turns(&["hello", "hi"])));
    let classifier = Arc::new(MockClassifier::classified(engineering()));
    let publisher = Arc::new(MockPublisher::default());
    // Never initialized, so every store call fails.
    let store = Arc::new(SqliteStorage::new(StorageConfig::default()));
    let orchestrator = IntakeOrchestrator::new(
        transcripts.clone(),
        classifier.clone(),
        store,
        publisher.clone(),
        "https://desk.test/chats",
    );

    let err = orchestrator
        .process(&closing_event("c7", Some("a@x.com"), None, &["billing"]))
        .await
        .unwrap_err();
    assert!(
        matches!(err, casebook_core::CasebookError::Storage { .. }),
        "got: {err}"
    );
    assert_eq!(transcripts.fetch_count().await, 1);
    assert_eq!(classifier.call_count(), 1);
    assert_eq!(publisher.publish_count().await, 0);
}
