// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound Channel Talk webhook payload.
//!
//! Every field is optional and unknown fields are ignored, so any JSON object
//! deserializes. Whether an event is actionable is decided by the accessors.

use serde::Deserialize;

/// A Channel Talk webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InboundEvent {
    pub event: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub entity: Option<EventEntity>,
    pub refers: Option<EventRefers>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventEntity {
    pub id: Option<String>,
    pub chat_id: Option<String>,
    pub log: Option<EventLog>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventLog {
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventRefers {
    pub user_chat: Option<UserChat>,
    pub user: Option<EventUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserChat {
    pub id: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventUser {
    pub email: Option<String>,
    pub city: Option<String>,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub email: Option<String>,
}

impl InboundEvent {
    /// Parses a raw webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// True for a `push` event whose log action is `close`.
    pub fn is_closing(&self) -> bool {
        let action = self
            .entity
            .as_ref()
            .and_then(|e| e.log.as_ref())
            .and_then(|log| log.action.as_deref());
        self.event.as_deref() == Some("push") && action == Some("close")
    }

    /// The conversation id: `refers.userChat.id`, else `entity.chatId`.
    pub fn conversation_id(&self) -> Option<&str> {
        let from_refers = self
            .refers
            .as_ref()
            .and_then(|r| r.user_chat.as_ref())
            .and_then(|chat| chat.id.as_deref())
            .and_then(non_blank);
        from_refers.or_else(|| {
            self.entity
                .as_ref()
                .and_then(|e| e.chat_id.as_deref())
                .and_then(non_blank)
        })
    }

    /// The customer email: profile email first, then the user's own field.
    pub fn customer_email(&self) -> Option<&str> {
        let user = self.user()?;
        user.profile
            .as_ref()
            .and_then(|p| p.email.as_deref())
            .and_then(non_blank)
            .or_else(|| user.email.as_deref().and_then(non_blank))
    }

    pub fn customer_city(&self) -> Option<&str> {
        self.user()?.city.as_deref().and_then(non_blank)
    }

    /// Tag names attached to the conversation, as sent.
    pub fn tag_names(&self) -> Vec<String> {
        self.refers
            .as_ref()
            .and_then(|r| r.user_chat.as_ref())
            .and_then(|chat| chat.tags.clone())
            .unwrap_or_default()
    }

    fn user(&self) -> Option<&EventUser> {
        self.refers.as_ref().and_then(|r| r.user.as_ref())
    }
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> InboundEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn closing_push_event_is_detected() {
        let event = parse(json!({
            "event": "push",
            "type": "message",
            "entity": {"chatId": "c1", "log": {"action": "close"}}
        }));
        assert!(event.is_closing());
        assert_eq!(event.event_type.as_deref(), Some("message"));
    }

    #[test]
    fn other_actions_and_events_are_not_closing() {
        let opened = parse(json!({"event": "push", "entity": {"log": {"action": "open"}}}));
        assert!(!opened.is_closing());

        let upsert = parse(json!({"event": "upsert", "entity": {"log": {"action": "close"}}}));
        assert!(!upsert.is_closing());

        assert!(!parse(json!({"event": "push"})).is_closing());
        assert!(!InboundEvent::default().is_closing());
    }

    #[test]
    fn conversation_id_prefers_user_chat() {
        let event = parse(json!({
            "entity": {"chatId": "from-entity"},
            "refers": {"userChat": {"id": "from-refers"}}
        }));
        assert_eq!(event.conversation_id(), Some("from-refers"));
    }

    #[test]
    fn conversation_id_falls_back_to_entity_chat_id() {
        let event = parse(json!({
            "entity": {"chatId": "from-entity"},
            "refers": {"userChat": {"id": "  "}}
        }));
        assert_eq!(event.conversation_id(), Some("from-entity"));

        assert_eq!(parse(json!({"entity": {"chatId": ""}})).conversation_id(), None);
    }

    #[test]
    fn email_prefers_profile() {
        let event = parse(json!({
            "refers": {"user": {"email": "plain@x.com", "profile": {"email": "profile@x.com"}}}
        }));
        assert_eq!(event.customer_email(), Some("profile@x.com"));

        let event = parse(json!({"refers": {"user": {"email": "plain@x.com", "profile": {}}}}));
        assert_eq!(event.customer_email(), Some("plain@x.com"));

        assert_eq!(InboundEvent::default().customer_email(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let event = InboundEvent::from_slice(
            br#"{"event": "push", "extra": 1, "refers": {"user": {"city": "Seoul", "name": "Kim"}}}"#,
        )
        .unwrap();
        assert_eq!(event.customer_city(), Some("Seoul"));
        assert!(event.tag_names().is_empty());
    }

    #[test]
    fn tags_are_kept_as_sent() {
        let event = parse(json!({"refers": {"userChat": {"tags": ["billing", " vip", "billing"]}}}));
        assert_eq!(event.tag_names(), vec!["billing", " vip", "billing"]);
    }
}
