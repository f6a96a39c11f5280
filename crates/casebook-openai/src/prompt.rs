// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification prompt template.
//!
//! The template is fixed; only the transcript lines vary, so the same
//! transcript always renders the same prompt.

use std::fmt::Write;

use casebook_core::ChatTurn;
use casebook_core::types::{KNOWN_DEPARTMENTS, format_timestamp};

const INSTRUCTIONS: &str = r#"The following is a customer support chat. Respond with a single JSON object containing these fields:

1. department: which departments this inquiry concerns, as an array of one or more of {departments}.
   - Include one entry if a single department is involved.
   - Include every department that is involved.

2. summary: a summary of the inquiry written for the departments involved (200 characters or fewer).
   - Engineering: technical terms, concrete details such as bugs, features, APIs, error codes.
   - Operations: service stability, infrastructure, monitoring, outages.
   - QA: testing, quality, reproducibility, bug reports.
   - Marketing: customer experience, branding, campaigns, events.
   - Planning: feature requirements, user experience, improvements, priorities.
   - Several departments: summarize so that each of them can follow it.

3. keyFeedback: the key feedback in the conversation, or an empty string if there is none.
   - Engineering: error messages, reproduction steps, technical details.
   - Operations: outage duration, impact, recovery status.
   - QA: reproduction steps, test environment, expected versus actual result.
   - Marketing: customer complaints, brand perception, campaign effect.
   - Planning: user requirements, UX problems, improvement proposals.

4. generalSummary: a department-neutral summary of the whole conversation.

Response format:
{
  "department": ["Engineering"],
  "summary": "Login API returns 500 (Chrome, POST /api/auth/login)",
  "keyFeedback": "Clicking the login button shows a server error; console reports 500 Internal Server Error",
  "generalSummary": "Customer cannot log in because the login endpoint fails"
}

Example with several departments:
{
  "department": ["Engineering", "Operations"],
  "summary": "Payment API errors and slow responses (POST /api/payment, over 10s)",
  "keyFeedback": "Payment button fails to call the API; requests time out on slow server responses",
  "generalSummary": "Customer could not complete a payment because checkout timed out"
}

Chat transcript:
"#;

/// Render the full classification prompt for a transcript.
pub fn build_prompt(turns: &[ChatTurn]) -> String {
    let departments = KNOWN_DEPARTMENTS.join(", ");
    let mut prompt = INSTRUCTIONS.replace("{departments}", &departments);
    for turn in turns {
        let _ = writeln!(prompt, "{}", transcript_line(turn));
    }
    prompt
}

/// One `[timestamp] Label: text` line.
pub fn transcript_line(turn: &ChatTurn) -> String {
    format!(
        "[{}] {}: {}",
        format_timestamp(&turn.timestamp),
        turn.role.label(),
        turn.text
    )
}
