// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `casebook migrate` command implementation.

use casebook_config::model::CasebookConfig;
use casebook_core::CasebookError;
use casebook_storage::Database;

/// Opens the configured database, which applies pending migrations, then closes it.
pub async fn run_migrate(config: &CasebookConfig) -> Result<(), CasebookError> {
    let db = Database::open_with(&config.storage).await?;
    let path = db.path().to_string();
    db.close().await?;
    println!("casebook: database {path} is up to date");
    Ok(())
}
