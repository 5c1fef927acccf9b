//! Repository over a single `groups.json` document.
//!
//! Reads parse the whole document. Writes validate the group, serialize the
//! updated document to a temporary file and rename it over the original, so
//! readers see either the old or the new document, never a partial one.

use std::path::{Path, PathBuf};

use potluck_core::expense::validate_expense;
use potluck_shared::types::GroupId;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{GroupRecord, StoreDocument};

/// File name of the store document inside the data directory.
pub const STORE_FILE_NAME: &str = "groups.json";

/// JSON-file group repository.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Creates a store backed by `<data_dir>/groups.json`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORE_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every group. A missing document is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed.
    pub async fn load_all(&self) -> Result<Vec<GroupRecord>, StoreError> {
        Ok(self.read_document().await?.groups)
    }

    /// Finds a group by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::GroupNotFound` if no group has this ID.
    pub async fn find_group(&self, id: &GroupId) -> Result<GroupRecord, StoreError> {
        self.read_document()
            .await?
            .groups
            .into_iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| StoreError::GroupNotFound(id.clone()))
    }

    /// Inserts or replaces a group.
    ///
    /// # Errors
    ///
    /// Returns an error if any expense breaks a business rule or the
    /// document cannot be written.
    pub async fn upsert_group(&self, group: GroupRecord) -> Result<(), StoreError> {
        let member_ids = group.member_ids();
        for expense in &group.expenses {
            validate_expense(expense, &member_ids).map_err(|source| {
                StoreError::InvalidExpense {
                    expense_id: expense.id.clone(),
                    source,
                }
            })?;
        }

        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;

        match document.groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => document.groups.push(group),
        }

        self.write_document(&document).await
    }

    async fn read_document(&self) -> Result<StoreDocument, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store document missing, treating as empty");
                Ok(StoreDocument::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write_document(&self, document: &StoreDocument) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        info!(
            path = %self.path.display(),
            groups = document.groups.len(),
            "Store document written"
        );
        Ok(())
    }
}
