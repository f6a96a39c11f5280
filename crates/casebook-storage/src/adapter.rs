// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `InquiryStore` trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use casebook_config::model::StorageConfig;
use casebook_core::{
    AdapterType, CasebookError, HealthStatus, Inquiry, InquiryStore, NewInquiry, PluginAdapter,
    TaxonomyEntry, TaxonomyKind,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed inquiry store.
///
/// The database is opened lazily by [`SqliteStorage::initialize`]; every
/// store operation before that fails with a storage error.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new store. Nothing is opened until [`initialize`](Self::initialize).
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and apply pending migrations.
    pub async fn initialize(&self) -> Result<(), CasebookError> {
        let db = Database::open_with(&self.config).await?;
        self.db
            .set(db)
            .map_err(|_| CasebookError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL so the database file is self-contained.
    pub async fn close(&self) -> Result<(), CasebookError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    fn db(&self) -> Result<&Database, CasebookError> {
        self.db
            .get()
            .ok_or_else(|| CasebookError::storage("storage not initialized, call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CasebookError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl InquiryStore for SqliteStorage {
    async fn record_inquiry(&self, inquiry: &NewInquiry) -> Result<Inquiry, CasebookError> {
        queries::inquiries::record_inquiry(self.db()?, inquiry).await
    }

    async fn attach_docs_url(&self, inquiry_id: &str, url: &str) -> Result<(), CasebookError> {
        if queries::inquiries::attach_docs_url(self.db()?, inquiry_id, url).await? {
            Ok(())
        } else {
            Err(CasebookError::storage(format!(
                "inquiry {inquiry_id} not found"
            )))
        }
    }

    async fn get_inquiry(&self, inquiry_id: &str) -> Result<Option<Inquiry>, CasebookError> {
        queries::inquiries::get_inquiry(self.db()?, inquiry_id).await
    }

    async fn count_by_conversation(&self, conversation_url: &str) -> Result<u64, CasebookError> {
        queries::inquiries::count_by_conversation(self.db()?, conversation_url).await
    }

    async fn find_or_create(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<Option<TaxonomyEntry>, CasebookError> {
        queries::taxonomy::find_or_create(self.db()?, kind, name).await
    }

    async fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, CasebookError> {
        queries::taxonomy::list(self.db()?, kind).await
    }
}
