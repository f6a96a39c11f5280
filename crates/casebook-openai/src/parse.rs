// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive parsing of the model's answer.
//!
//! Models wrap JSON in markdown fences, return `department` as a bare string,
//! or omit fields. All of that is accepted; only an answer that is not a JSON
//! object at all is an error.

use casebook_core::{CasebookError, ClassificationResult};
use serde_json::Value;

use crate::types::ChatResponse;

/// Extract `choices[0].message.content` from a raw response body.
pub fn extract_content(body: &str) -> Result<String, CasebookError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| parse_error(
        format!("failed to parse completion response: {e}"),
        e,
    ))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CasebookError::Classifier {
            message: "completion response has no message content".to_string(),
            source: None,
        })
}

/// Remove markdown code fences (```` ```json ```` and ```` ``` ````) and trim.
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse the model's JSON answer into a classification.
pub fn parse_classification(content: &str) -> Result<ClassificationResult, CasebookError> {
    let cleaned = strip_code_fences(content);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| parse_error(format!("answer is not valid JSON: {e}"), e))?;
    let Value::Object(fields) = value else {
        return Err(CasebookError::Classifier {
            message: "answer is not a JSON object".to_string(),
            source: None,
        });
    };

    let departments = match fields.get("department") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(name)) if !name.trim().is_empty() => vec![name.clone()],
        _ => Vec::new(),
    };

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let general_summary = Some(text("generalSummary")).filter(|s| !s.trim().is_empty());

    Ok(ClassificationResult {
        departments,
        summary: text("summary"),
        key_feedback: text("keyFeedback"),
        general_summary,
    })
}

fn parse_error(message: String, source: serde_json::Error) -> CasebookError {
    CasebookError::Classifier {
        message,
        source: Some(Box::new(source)),
    }
}
