// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Notion pages API.

use std::time::Duration;

use casebook_core::CasebookError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Subset of the page object returned by `POST /pages`.
#[derive(Debug, Deserialize)]
struct CreatedPage {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Error envelope returned by Notion on non-2xx responses.
#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Bearer-authenticated Notion client pinned to one API version.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `token` - integration token
    /// * `base_url` - API root, e.g. `https://api.notion.com/v1`
    /// * `api_version` - value of the `Notion-Version` header
    pub fn new(token: &str, base_url: &str, api_version: &str) -> Result<Self, CasebookError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| CasebookError::Config(format!("invalid Notion token header value: {e}")))?;
        auth.set_sensitive(true);
        let version = HeaderValue::from_str(api_version)
            .map_err(|e| CasebookError::Config(format!("invalid Notion-Version value: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", version);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CasebookError::Publish {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a page and returns its URL.
    pub async fn create_page(&self, body: &serde_json::Value) -> Result<String, CasebookError> {
        let url = format!("{}/pages", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CasebookError::Publish {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| CasebookError::Publish {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<NotionErrorBody>(&text) {
                Ok(NotionErrorBody {
                    code: Some(code),
                    message,
                }) => format!(
                    "Notion API error ({code}): {}",
                    message.as_deref().unwrap_or("no message")
                ),
                _ => format!("API returned {status}: {text}"),
            };
            return Err(CasebookError::Publish {
                message,
                source: None,
            });
        }

        let page: CreatedPage = serde_json::from_str(&text).map_err(|e| CasebookError::Publish {
            message: format!("failed to parse created page: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(page_id = page.id.as_deref().unwrap_or(""), "Notion page created");

        page.url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| CasebookError::Publish {
                message: "created page has no url".to_string(),
                source: None,
            })
    }
}
