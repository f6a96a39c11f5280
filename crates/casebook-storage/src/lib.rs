// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Casebook intake pipeline.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, async access via
//! `tokio-rusqlite`, transactional persistence of the inquiry aggregate, and
//! race-safe find-or-create for tags and departments.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
