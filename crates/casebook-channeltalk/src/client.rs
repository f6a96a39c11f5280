// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Channel Talk Open API.

use std::time::Duration;

use casebook_core::CasebookError;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{MessagesResponse, RawMessage};

/// Request timeout for transcript fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Request timeout for the credential check.
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Authenticated Channel Talk client using a system access key pair.
#[derive(Debug, Clone)]
pub struct ChannelTalkClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChannelTalkClient {
    /// Creates a client that sends `x-access-key`/`x-access-secret` on every request.
    pub fn new(api_key: &str, api_secret: &str, base_url: &str) -> Result<Self, CasebookError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-access-key", header_value("x-access-key", api_key)?);
        headers.insert("x-access-secret", header_value("x-access-secret", api_secret)?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CasebookError::Transcript {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetches the raw message list for a conversation, oldest first.
    ///
    /// A response without a `messages` array yields an empty list.
    pub async fn fetch_messages(&self, chat_id: &str) -> Result<Vec<RawMessage>, CasebookError> {
        let url = self.endpoint(&["open", "v5", "user-chats", chat_id, "messages"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CasebookError::Transcript {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, chat_id, "messages response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, chat_id, "message fetch rejected");
            return Err(CasebookError::Transcript {
                message: format!("message fetch failed: HTTP {status}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| CasebookError::Transcript {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| CasebookError::Transcript {
                message: format!("failed to parse messages response: {e}"),
                source: Some(Box::new(e)),
            })?;

        match parsed.messages {
            Some(messages) => Ok(messages),
            None => {
                debug!(chat_id, "response has no messages array");
                Ok(Vec::new())
            }
        }
    }

    /// Returns true when the upstream accepts the configured credentials.
    ///
    /// Any network failure counts as invalid.
    pub async fn validate_credentials(&self) -> bool {
        let url = match self.endpoint(&["open", "v5", "channel"]) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.client.get(url).timeout(VALIDATE_TIMEOUT).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => true,
            Ok(response) => {
                warn!(status = %response.status(), "credential check rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "credential check failed");
                false
            }
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CasebookError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CasebookError::Config(format!("invalid channel_talk.base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                CasebookError::Config("channel_talk.base_url cannot be a base URL".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, CasebookError> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| CasebookError::Config(format!("invalid {name} header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
