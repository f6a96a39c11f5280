// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Find-or-create for tags and departments.
//!
//! Uniqueness is enforced by the `UNIQUE(name)` constraint, not by a prior
//! lookup: the insert is `ON CONFLICT(name) DO NOTHING` and the row is then
//! re-selected, so two writers racing on the same new name both end up with
//! the single surviving row.

use std::collections::HashSet;

use casebook_core::types::now_timestamp;
use casebook_core::{CasebookError, TaxonomyEntry, TaxonomyKind};
use rusqlite::{Connection, TransactionBehavior, params};

use crate::database::Database;

fn table(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Tag => "tags",
        TaxonomyKind::Department => "departments",
    }
}

/// Resolve one name inside an open transaction.
///
/// Blank names return `None` and touch nothing. Non-blank names are stored
/// exactly as given.
pub(crate) fn resolve(
    conn: &Connection,
    kind: TaxonomyKind,
    name: &str,
) -> rusqlite::Result<Option<TaxonomyEntry>> {
    if name.trim().is_empty() {
        return Ok(None);
    }

    let table = table(kind);
    conn.execute(
        &format!(
            "INSERT INTO {table} (id, name, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO NOTHING"
        ),
        params![uuid::Uuid::new_v4().to_string(), name, now_timestamp()],
    )?;

    let entry = conn.query_row(
        &format!("SELECT id, name, created_at FROM {table} WHERE name = ?1"),
        params![name],
        |row| {
            Ok(TaxonomyEntry {
                id: row.get(0)?,
                kind,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )?;
    Ok(Some(entry))
}

/// Resolve a list of names, skipping blanks and collapsing duplicates.
///
/// The result keeps first-occurrence order.
pub(crate) fn resolve_all(
    conn: &Connection,
    kind: TaxonomyKind,
    names: &[String],
) -> rusqlite::Result<Vec<TaxonomyEntry>> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            continue;
        }
        if let Some(entry) = resolve(conn, kind, name)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Standalone find-or-create in its own write transaction.
pub async fn find_or_create(
    db: &Database,
    kind: TaxonomyKind,
    name: &str,
) -> Result<Option<TaxonomyEntry>, CasebookError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let entry = resolve(&tx, kind, &name)?;
            tx.commit()?;
            Ok(entry)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find or create a tag by exact name.
pub async fn find_or_create_tag(
    db: &Database,
    name: &str,
) -> Result<Option<TaxonomyEntry>, CasebookError> {
    find_or_create(db, TaxonomyKind::Tag, name).await
}

/// Find or create a department by exact name.
pub async fn find_or_create_department(
    db: &Database,
    name: &str,
) -> Result<Option<TaxonomyEntry>, CasebookError> {
    find_or_create(db, TaxonomyKind::Department, name).await
}

/// List every entry of a kind, ordered by name.
pub async fn list(db: &Database, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, CasebookError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, name, created_at FROM {} ORDER BY name ASC",
                table(kind)
            ))?;
            let rows = stmt.query_map([], |row| {
                Ok(TaxonomyEntry {
                    id: row.get(0)?,
                    kind,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
