// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inquiry intake for Casebook.
//!
//! Turns a "conversation closed" webhook into a persisted, classified inquiry
//! and a best-effort docs page. [`IntakeOrchestrator`] runs one event;
//! [`IntakeDispatcher`] runs many in the background and drains them on
//! shutdown.

pub mod dispatch;
pub mod event;
pub mod orchestrator;
pub mod shutdown;

pub use dispatch::IntakeDispatcher;
pub use event::InboundEvent;
pub use orchestrator::{IgnoreReason, IntakeOrchestrator, IntakeOutcome};
