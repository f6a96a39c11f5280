// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for webhook payloads and transcripts.

use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};

use casebook_core::{ChatTurn, SenderRole};
use casebook_intake::InboundEvent;

/// Turns alternating customer/agent, one second apart, starting with the customer.
pub fn turns(texts: &[&str]) -> Vec<ChatTurn> {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().unwrap_or_else(Utc::now);
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| ChatTurn {
            role: if i % 2 == 0 {
                SenderRole::Customer
            } else {
                SenderRole::Agent
            },
            text: (*text).to_string(),
            timestamp: start + Duration::seconds(i as i64),
        })
        .collect()
}

/// JSON body of a closing webhook for `chat_id`.
pub fn closing_payload(
    chat_id: &str,
    email: Option<&str>,
    city: Option<&str>,
    tags: &[&str],
) -> Value {
    json!({
        "event": "push",
        "type": "userChat",
        "entity": {"id": "log-1", "chatId": chat_id, "log": {"action": "close"}},
        "refers": {
            "userChat": {"id": chat_id, "tags": tags},
            "user": {"city": city, "profile": {"email": email}}
        }
    })
}

/// A closing event for `chat_id`.
pub fn closing_event(
    chat_id: &str,
    email: Option<&str>,
    city: Option<&str>,
    tags: &[&str],
) -> InboundEvent {
    event_from(closing_payload(chat_id, email, city, tags))
}

/// An event that is not a close (an `open` action on the same chat).
pub fn opening_event(chat_id: &str) -> InboundEvent {
    event_from(json!({
        "event": "push",
        "entity": {"chatId": chat_id, "log": {"action": "open"}},
        "refers": {"userChat": {"id": chat_id}}
    }))
}

/// Any JSON object deserializes into an event, so a failure here is a broken fixture.
pub fn event_from(value: Value) -> InboundEvent {
    serde_json::from_value(value).unwrap_or_default()
}
