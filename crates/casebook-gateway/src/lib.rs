// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Casebook.
//!
//! Receives Channel Talk webhooks and hands them to the intake dispatcher.
//! The webhook response never reflects processing: an authenticated call is
//! always acknowledged with `{"success": true}`.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::WebhookAuth;
pub use server::{GatewayState, HealthState, build_router, start_server};
