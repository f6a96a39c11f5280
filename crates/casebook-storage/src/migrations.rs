// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary via
//! `embed_migrations!` and applied whenever a [`Database`](crate::Database) opens.

use casebook_core::CasebookError;
use tracing::info;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), CasebookError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| CasebookError::storage(e.to_string()))?;
    for migration in report.applied_migrations() {
        info!(migration = %migration, "applied migration");
    }
    Ok(())
}
