// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page-create request body for an inquiry.
//!
//! Property names match the columns of the team's Notion inquiry database.
//! Optional properties and body sections are omitted when blank.

use casebook_core::{ClassificationResult, Inquiry};
use serde_json::{Map, Value, json};

pub const PROP_TITLE: &str = "제목";
pub const PROP_STATUS: &str = "상태";
pub const PROP_SUMMARY: &str = "요약";
pub const PROP_KEY_FEEDBACK: &str = "주요 피드백";
pub const PROP_CONVERSATION_URL: &str = "채널톡 URL";
pub const PROP_CITY: &str = "고객 도시";
pub const PROP_DEPARTMENTS: &str = "부서";

pub const HEADING_GENERAL_SUMMARY: &str = "전체 요약";
pub const HEADING_DEPARTMENT_SUMMARY: &str = "부서별 요약";

/// Build the `POST /pages` body for an inquiry in database `database_id`.
pub fn build_page_request(
    database_id: &str,
    inquiry: &Inquiry,
    classification: &ClassificationResult,
) -> Value {
    let mut properties = Map::new();
    properties.insert(
        PROP_TITLE.to_string(),
        json!({ "title": rich_text(&inquiry.title) }),
    );
    properties.insert(
        PROP_STATUS.to_string(),
        json!({ "status": { "name": inquiry.status.to_string() } }),
    );

    if let Some(summary) = non_blank(&classification.summary) {
        properties.insert(
            PROP_SUMMARY.to_string(),
            json!({ "rich_text": rich_text(summary) }),
        );
    }
    if let Some(feedback) = non_blank(&classification.key_feedback) {
        properties.insert(
            PROP_KEY_FEEDBACK.to_string(),
            json!({ "rich_text": rich_text(feedback) }),
        );
    }
    if let Some(url) = non_blank(&inquiry.conversation_url) {
        properties.insert(PROP_CONVERSATION_URL.to_string(), json!({ "url": url }));
    }
    if let Some(city) = inquiry.customer_city.as_deref().and_then(non_blank) {
        properties.insert(PROP_CITY.to_string(), json!({ "rich_text": rich_text(city) }));
    }

    let departments: Vec<Value> = classification
        .departments
        .iter()
        .filter_map(|d| non_blank(d))
        .map(|name| json!({ "name": name }))
        .collect();
    if !departments.is_empty() {
        properties.insert(
            PROP_DEPARTMENTS.to_string(),
            json!({ "multi_select": departments }),
        );
    }

    let mut children = Vec::new();
    if let Some(general) = classification.general_summary.as_deref().and_then(non_blank) {
        children.push(heading(HEADING_GENERAL_SUMMARY));
        children.push(paragraph(general));
    }
    if let Some(summary) = non_blank(&classification.summary) {
        children.push(heading(HEADING_DEPARTMENT_SUMMARY));
        children.push(paragraph(summary));
    }

    let mut body = json!({
        "parent": { "type": "database_id", "database_id": database_id },
        "properties": properties,
    });
    if !children.is_empty() {
        body["children"] = Value::Array(children);
    }
    body
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

fn heading(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "heading_2",
        "heading_2": { "rich_text": rich_text(content) }
    })
}

fn paragraph(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": rich_text(content) }
    })
}
