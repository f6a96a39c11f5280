// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of upstream messages into [`ChatTurn`]s.

use casebook_core::{ChatTurn, SenderRole};
use chrono::{DateTime, TimeZone, Utc};

use crate::types::{MessageBlock, RawMessage};

/// Convert upstream messages into chat turns, preserving order.
///
/// Messages with no extractable text are dropped.
pub fn to_chat_turns(messages: &[RawMessage]) -> Vec<ChatTurn> {
    messages.iter().filter_map(to_chat_turn).collect()
}

/// Convert a single message, or `None` if it carries no text.
pub fn to_chat_turn(message: &RawMessage) -> Option<ChatTurn> {
    let text = message_text(message)?;
    Some(ChatTurn {
        role: sender_role(message.person_type.as_deref()),
        text,
        timestamp: message
            .created_at
            .and_then(epoch_millis)
            .unwrap_or_else(Utc::now),
    })
}

/// Map an upstream `personType` onto a sender role.
pub fn sender_role(person_type: Option<&str>) -> SenderRole {
    match person_type.map(str::to_ascii_lowercase).as_deref() {
        Some("user") => SenderRole::Customer,
        Some("manager") => SenderRole::Agent,
        _ => SenderRole::System,
    }
}

/// `plainText` when non-blank, otherwise the text of the rich blocks.
pub fn message_text(message: &RawMessage) -> Option<String> {
    match message.plain_text.as_deref() {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        _ => message
            .blocks
            .as_deref()
            .and_then(block_text)
            .filter(|text| !text.trim().is_empty()),
    }
}

/// Concatenate non-blank block values depth-first, separated by one space.
pub fn block_text(blocks: &[MessageBlock]) -> Option<String> {
    let mut fragments = Vec::new();
    collect_fragments(blocks, &mut fragments);
    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(" "))
    }
}

fn collect_fragments<'a>(blocks: &'a [MessageBlock], out: &mut Vec<&'a str>) {
    for block in blocks {
        if let Some(value) = block.value.as_deref()
            && !value.trim().is_empty()
        {
            out.push(value);
        }
        if let Some(nested) = block.blocks.as_deref() {
            collect_fragments(nested, out);
        }
    }
}

fn epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block(value: Option<&str>, nested: Option<Vec<MessageBlock>>) -> MessageBlock {
        MessageBlock {
            value: value.map(str::to_string),
            blocks: nested,
        }
    }

    fn message(person_type: Option<&str>, plain: Option<&str>) -> RawMessage {
        RawMessage {
            person_type: person_type.map(str::to_string),
            plain_text: plain.map(str::to_string),
            blocks: None,
            created_at: Some(1_700_000_000_000),
        }
    }

    #[test]
    fn person_type_mapping_is_case_insensitive() {
        assert_eq!(sender_role(Some("user")), SenderRole::Customer);
        assert_eq!(sender_role(Some("USER")), SenderRole::Customer);
        assert_eq!(sender_role(Some("Manager")), SenderRole::Agent);
        assert_eq!(sender_role(Some("bot")), SenderRole::System);
        assert_eq!(sender_role(None), SenderRole::System);
    }

    #[test]
    fn plain_text_preferred_over_blocks() {
        let mut msg = message(Some("user"), Some("hello"));
        msg.blocks = Some(vec![block(Some("ignored"), None)]);
        assert_eq!(message_text(&msg).as_deref(), Some("hello"));
    }

    #[test]
    fn blank_plain_text_falls_back_to_nested_blocks() {
        let mut msg = message(Some("manager"), Some("   "));
        msg.blocks = Some(vec![block(
            Some("Hi"),
            Some(vec![block(Some("there"), None)]),
        )]);
        let turn = to_chat_turn(&msg).unwrap();
        assert_eq!(turn.text, "Hi there");
        assert_eq!(turn.role, SenderRole::Agent);
    }

    #[test]
    fn blank_values_are_skipped_between_fragments() {
        let blocks = vec![
            block(Some("a"), None),
            block(Some(" "), Some(vec![block(None, None)])),
            block(None, Some(vec![block(Some("b"), None)])),
        ];
        assert_eq!(block_text(&blocks).as_deref(), Some("a b"));
    }

    #[test]
    fn messages_without_text_are_dropped() {
        let mut empty_blocks = message(Some("user"), None);
        empty_blocks.blocks = Some(vec![block(Some(""), None)]);
        let messages = vec![
            message(Some("user"), Some("first")),
            message(Some("user"), None),
            empty_blocks,
            message(Some("manager"), Some("second")),
        ];
        let turns = to_chat_turns(&messages);
        let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn created_at_is_epoch_millis_utc() {
        let turn = to_chat_turn(&message(None, Some("x"))).unwrap();
        assert_eq!(turn.timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(turn.role, SenderRole::System);
    }

    #[test]
    fn missing_created_at_uses_now() {
        let mut msg = message(None, Some("x"));
        msg.created_at = None;
        let before = Utc::now();
        let turn = to_chat_turn(&msg).unwrap();
        assert!(turn.timestamp >= before);
    }

    fn arb_block() -> impl Strategy<Value = MessageBlock> {
        let leaf = proptest::option::of("[ a-z]{0,6}").prop_map(|value| MessageBlock {
            value,
            blocks: None,
        });
        leaf.prop_recursive(4, 32, 4, |inner| {
            (
                proptest::option::of("[ a-z]{0,6}"),
                proptest::option::of(prop::collection::vec(inner, 0..4)),
            )
                .prop_map(|(value, blocks)| MessageBlock { value, blocks })
        })
    }

    fn flatten(blocks: &[MessageBlock], out: &mut Vec<String>) {
        for b in blocks {
            if let Some(v) = &b.value {
                out.push(v.clone());
            }
            if let Some(nested) = &b.blocks {
                flatten(nested, out);
            }
        }
    }

    proptest! {
        #[test]
        fn block_text_joins_every_non_blank_value_in_order(
            blocks in prop::collection::vec(arb_block(), 0..5)
        ) {
            let mut values = Vec::new();
            flatten(&blocks, &mut values);
            let expected: Vec<String> =
                values.into_iter().filter(|v| !v.trim().is_empty()).collect();

            match block_text(&blocks) {
                None => prop_assert!(expected.is_empty()),
                Some(text) => prop_assert_eq!(text, expected.join(" ")),
            }
        }
    }
}
