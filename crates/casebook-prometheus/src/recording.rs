// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Recording goes through the metrics-rs facade, so these helpers are no-ops
//! until a recorder is installed.

use metrics::{describe_counter, describe_histogram};

pub const INTAKE_EVENTS_TOTAL: &str = "casebook_intake_events_total";
pub const CLASSIFICATION_TOTAL: &str = "casebook_classification_total";
pub const PUBLISH_TOTAL: &str = "casebook_publish_total";
pub const INTAKE_DURATION_SECONDS: &str = "casebook_intake_duration_seconds";

/// Register all Casebook metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        INTAKE_EVENTS_TOTAL,
        "Intake events by terminal outcome (recorded, ignored, failed)"
    );
    describe_counter!(
        CLASSIFICATION_TOTAL,
        "Classification attempts by result (classified, skipped, degraded)"
    );
    describe_counter!(PUBLISH_TOTAL, "Docs publish attempts by result");
    describe_histogram!(
        INTAKE_DURATION_SECONDS,
        "Wall-clock duration of one intake run in seconds"
    );
}

/// Record the terminal outcome of one intake event.
pub fn record_intake(outcome: &'static str) {
    metrics::counter!(INTAKE_EVENTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a classification result label.
pub fn record_classification(result: &'static str) {
    metrics::counter!(CLASSIFICATION_TOTAL, "result" => result).increment(1);
}

/// Record a publish result label.
pub fn record_publish(result: &'static str) {
    metrics::counter!(PUBLISH_TOTAL, "result" => result).increment(1);
}

/// Record how long one intake run took.
pub fn record_intake_duration(seconds: f64) {
    metrics::histogram!(INTAKE_DURATION_SECONDS).record(seconds);
}
