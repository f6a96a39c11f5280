// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end transcript fetches against a mocked Channel Talk API.

use casebook_channeltalk::ChannelTalkSource;
use casebook_config::model::ChannelTalkConfig;
use casebook_core::{CasebookError, HealthStatus, PluginAdapter, SenderRole, TranscriptSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str) -> ChannelTalkConfig {
    ChannelTalkConfig {
        api_key: Some("key".into()),
        api_secret: Some("secret".into()),
        base_url: base_url.to_string(),
        ..ChannelTalkConfig::default()
    }
}

#[tokio::test]
async fn transcript_is_normalized_in_source_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open/v5/user-chats/690e09fc/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [
                {"personType": "user", "plainText": "My invoice is wrong", "createdAt": 1700000000000i64},
                {"personType": "bot", "plainText": "", "blocks": []},
                {"personType": "manager", "blocks": [
                    {"type": "text", "value": "Sorry about that."},
                    {"type": "bullets", "blocks": [{"type": "text", "value": "Refund issued"}]}
                ], "createdAt": 1700000060000i64},
                {"personType": "bot", "plainText": "Chat closed", "createdAt": 1700000120000i64}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = ChannelTalkSource::new(&config(&server.uri())).unwrap();
    let turns = source.fetch_transcript("690e09fc").await.unwrap();

    let summary: Vec<(SenderRole, &str)> =
        turns.iter().map(|t| (t.role, t.text.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (SenderRole::Customer, "My invoice is wrong"),
            (SenderRole::Agent, "Sorry about that. Refund issued"),
            (SenderRole::System, "Chat closed"),
        ]
    );
    assert!(turns.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn blank_conversation_id_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let source = ChannelTalkSource::new(&config(&server.uri())).unwrap();
    let err = source.fetch_transcript("  ").await.unwrap_err();
    assert!(matches!(err, CasebookError::InvalidInput(_)));
}

#[tokio::test]
async fn missing_credentials_surface_as_config_error_on_use() {
    let source = ChannelTalkSource::new(&ChannelTalkConfig::default()).unwrap();
    assert!(matches!(
        source.health_check().await.unwrap(),
        HealthStatus::Degraded(_)
    ));
    let err = source.fetch_transcript("chat").await.unwrap_err();
    assert!(err.is_config(), "got: {err}");
    assert!(!source.validate_credentials().await);
}

#[tokio::test]
async fn zero_messages_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"messages": []})))
        .mount(&server)
        .await;

    let source = ChannelTalkSource::new(&config(&server.uri())).unwrap();
    assert!(source.fetch_transcript("chat").await.unwrap().is_empty());
}

#[tokio::test]
async fn odd_typed_block_value_does_not_abort_the_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open/v5/user-chats/chat/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [
                {"personType": "user", "blocks": [{"value": 42}], "createdAt": 1700000000000i64},
                {"personType": "manager", "plainText": "Order 42 refunded", "createdAt": "1700000060000"}
            ]
        })))
        .mount(&server)
        .await;

    let source = ChannelTalkSource::new(&config(&server.uri())).unwrap();
    let turns = source.fetch_transcript("chat").await.unwrap();

    let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["42", "Order 42 refunded"]);
    assert_eq!(turns[1].timestamp.timestamp_millis(), 1_700_000_060_000);
}
