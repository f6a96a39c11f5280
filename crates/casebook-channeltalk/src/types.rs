// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel Talk Open API response types.
//!
//! Only the fields the transcript fetch reads are modelled; everything else in
//! the payload is ignored. Field parsing is lenient: a value of an unexpected
//! type reads as absent, and a message or block that is not an object is
//! skipped, so one odd entry never fails the whole transcript.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of `GET /open/v5/user-chats/{id}/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    /// Absent when the conversation has no messages.
    #[serde(default, deserialize_with = "lenient_list")]
    pub messages: Option<Vec<RawMessage>>,
}

/// One message as returned by the upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    /// `user`, `manager`, `bot`, ... (compared case-insensitively).
    #[serde(default, deserialize_with = "lenient_text")]
    pub person_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub plain_text: Option<String>,
    /// Rich-text blocks, used when `plainText` is blank.
    #[serde(default, deserialize_with = "lenient_list")]
    pub blocks: Option<Vec<MessageBlock>>,
    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub created_at: Option<i64>,
}

/// A rich-text block; blocks nest arbitrarily deep.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBlock {
    #[serde(default, deserialize_with = "lenient_text")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub blocks: Option<Vec<MessageBlock>>,
}

/// Strings as-is, numbers and booleans in their JSON spelling.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Integral or fractional numbers, or a numeric string.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// An array whose unparseable entries are dropped; anything else is absent.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn odd_typed_fields_do_not_fail_the_response() {
        let body = json!({
            "messages": [
                {"personType": "user", "blocks": [{"value": 42}, {"value": "ok"}], "createdAt": "1700000000000"},
                "not a message",
                {"personType": 7, "plainText": {"nested": true}, "createdAt": 1.7e12},
                {"personType": "manager", "plainText": "fine", "blocks": "oops"}
            ]
        });
        let parsed: MessagesResponse = serde_json::from_value(body).unwrap();
        let messages = parsed.messages.unwrap();
        assert_eq!(messages.len(), 3);

        let blocks = messages[0].blocks.as_ref().unwrap();
        assert_eq!(blocks[0].value.as_deref(), Some("42"));
        assert_eq!(blocks[1].value.as_deref(), Some("ok"));
        assert_eq!(messages[0].created_at, Some(1_700_000_000_000));

        assert_eq!(messages[1].person_type.as_deref(), Some("7"));
        assert!(messages[1].plain_text.is_none());
        assert_eq!(messages[1].created_at, Some(1_700_000_000_000));

        assert_eq!(messages[2].plain_text.as_deref(), Some("fine"));
        assert!(messages[2].blocks.is_none());
    }

    #[test]
    fn non_array_messages_reads_as_absent() {
        let parsed: MessagesResponse =
            serde_json::from_value(json!({"messages": {"unexpected": 1}})).unwrap();
        assert!(parsed.messages.is_none());
    }
}
