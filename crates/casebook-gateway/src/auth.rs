// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-token check for the webhook route.
//!
//! Channel Talk cannot send custom auth headers, so the token travels as the
//! `token` query parameter of the registered webhook URL. With no token
//! configured every request is accepted.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

/// Webhook authentication configuration.
#[derive(Clone, Default)]
pub struct WebhookAuth {
    /// Expected `token` query value. `None` disables the check.
    pub token: Option<String>,
}

impl std::fmt::Debug for WebhookAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookAuth")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Middleware that rejects webhook calls whose `token` does not match.
pub async fn webhook_auth_middleware(
    State(auth): State<WebhookAuth>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = Query::<TokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.token);

    if provided.as_deref() == Some(expected) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            token_present = provided.is_some(),
            "webhook rejected: token mismatch"
        );
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let auth = WebhookAuth {
            token: Some("hunter2".into()),
        };
        let out = format!("{auth:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("[redacted]"));
    }
}
