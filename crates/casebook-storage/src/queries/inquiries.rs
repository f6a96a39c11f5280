// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inquiry aggregate persistence.
//!
//! An inquiry is written together with its chat turns and taxonomy links in a
//! single `BEGIN IMMEDIATE` transaction. The docs page URL is the only field
//! updated afterwards.

use std::str::FromStr;

use casebook_core::types::{format_timestamp, now_timestamp};
use casebook_core::{
    CasebookError, ChatTurn, Inquiry, InquiryStatus, NewInquiry, SenderRole, TaxonomyEntry,
    TaxonomyKind,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::database::Database;
use crate::queries::taxonomy;

/// Persist a new inquiry aggregate and return it as stored.
pub async fn record_inquiry(db: &Database, inquiry: &NewInquiry) -> Result<Inquiry, CasebookError> {
    let inquiry = inquiry.clone();
    db.connection()
        .call(move |conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = now_timestamp();

            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "INSERT INTO inquiries (id, title, status, summary, key_feedback,
                     conversation_url, customer_city, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    id,
                    inquiry.title,
                    inquiry.status.to_string(),
                    inquiry.summary,
                    inquiry.key_feedback,
                    inquiry.conversation_url,
                    inquiry.customer_city,
                    now,
                ],
            )?;

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO chat_turns (inquiry_id, position, role, text, sent_at, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for (position, turn) in inquiry.chat_turns.iter().enumerate() {
                    stmt.execute(params![
                        id,
                        position as i64,
                        turn.role.to_string(),
                        turn.text,
                        format_timestamp(&turn.timestamp),
                        now,
                    ])?;
                }
            }

            for tag in taxonomy::resolve_all(&tx, TaxonomyKind::Tag, &inquiry.tag_names)? {
                tx.execute(
                    "INSERT OR IGNORE INTO inquiry_tags (inquiry_id, tag_id, created_at)
                     VALUES (?1, ?2, ?3)",
                    params![id, tag.id, now],
                )?;
            }

            let departments =
                taxonomy::resolve_all(&tx, TaxonomyKind::Department, &inquiry.department_names)?;
            for department in departments {
                tx.execute(
                    "INSERT OR IGNORE INTO inquiry_departments (inquiry_id, department_id, created_at)
                     VALUES (?1, ?2, ?3)",
                    params![id, department.id, now],
                )?;
            }

            // Read back inside the transaction so callers see stored precision.
            let stored = load(&tx, &id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            tx.commit()?;
            Ok(stored)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set the docs page URL on an existing inquiry.
///
/// Returns `false` if no inquiry has this id.
pub async fn attach_docs_url(db: &Database, id: &str, url: &str) -> Result<bool, CasebookError> {
    let id = id.to_string();
    let url = url.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE inquiries SET docs_page_url = ?1, updated_at = ?2 WHERE id = ?3",
                params![url, now_timestamp(), id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load an inquiry with its chat turns, tags, and departments.
pub async fn get_inquiry(db: &Database, id: &str) -> Result<Option<Inquiry>, CasebookError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| load(conn, &id))
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count inquiries already recorded for a conversation URL.
pub async fn count_by_conversation(
    db: &Database,
    conversation_url: &str,
) -> Result<u64, CasebookError> {
    let url = conversation_url.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM inquiries WHERE conversation_url = ?1",
                params![url],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|count| count.max(0) as u64)
        .map_err(crate::database::map_tr_err)
}

fn load(conn: &Connection, id: &str) -> rusqlite::Result<Option<Inquiry>> {
    let row = conn
        .query_row(
            "SELECT id, title, status, summary, key_feedback, conversation_url,
                    customer_city, docs_page_url, created_at, updated_at
             FROM inquiries WHERE id = ?1",
            params![id],
            |row| {
                Ok(Inquiry {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    status: parse_column::<InquiryStatus>(row, 2)?,
                    summary: row.get(3)?,
                    key_feedback: row.get(4)?,
                    conversation_url: row.get(5)?,
                    customer_city: row.get(6)?,
                    docs_page_url: row.get(7)?,
                    created_at: row.get(8)?,
                    updated_at: row.get(9)?,
                    chat_turns: Vec::new(),
                    tags: Vec::new(),
                    departments: Vec::new(),
                })
            },
        )
        .optional()?;

    let Some(mut inquiry) = row else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT role, text, sent_at FROM chat_turns
         WHERE inquiry_id = ?1 ORDER BY position ASC",
    )?;
    let turns = stmt.query_map(params![id], |row| {
        let sent_at: String = row.get(2)?;
        let timestamp = DateTime::parse_from_rfc3339(&sent_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);
        Ok(ChatTurn {
            role: parse_column::<SenderRole>(row, 0)?,
            text: row.get(1)?,
            timestamp,
        })
    })?;
    inquiry.chat_turns = turns.collect::<rusqlite::Result<_>>()?;

    inquiry.tags = load_links(
        conn,
        "SELECT t.id, t.name, t.created_at FROM inquiry_tags l
         JOIN tags t ON t.id = l.tag_id
         WHERE l.inquiry_id = ?1 ORDER BY l.rowid ASC",
        id,
        TaxonomyKind::Tag,
    )?;
    inquiry.departments = load_links(
        conn,
        "SELECT d.id, d.name, d.created_at FROM inquiry_departments l
         JOIN departments d ON d.id = l.department_id
         WHERE l.inquiry_id = ?1 ORDER BY l.rowid ASC",
        id,
        TaxonomyKind::Department,
    )?;

    Ok(Some(inquiry))
}

fn load_links(
    conn: &Connection,
    sql: &str,
    id: &str,
    kind: TaxonomyKind,
) -> rusqlite::Result<Vec<TaxonomyEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![id], |row| {
        Ok(TaxonomyEntry {
            id: row.get(0)?,
            kind,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;
    rows.collect()
}

fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    T::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
