//! Layout persistence
//!
//! A floor's layout is stored as one [`FloorLayout`] record keyed by floor id.
//! Saving replaces the whole record (last writer wins).
//!
//! Loading distinguishes "nothing saved yet" (`Ok(None)`) from a failed load
//! (`Err`), so callers never mistake a broken store for an empty floor.

mod memory;
mod redb_store;

pub use memory::MemoryLayoutStore;
pub use redb_store::RedbLayoutStore;

use shared::models::{FloorLayout, Table};
use thiserror::Error;

use crate::floor::validation;

/// Backend errors shared by every store implementation
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Saving a layout failed; the in-memory layout is untouched
#[derive(Debug, Error)]
#[error("failed to save layout for floor {floor_id}: {source}")]
pub struct PersistError {
    pub floor_id: String,
    #[source]
    pub source: StorageError,
}

/// Loading a layout failed (as opposed to nothing being saved)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read layout for floor {floor_id}: {source}")]
    Backend {
        floor_id: String,
        #[source]
        source: StorageError,
    },

    #[error("stored layout for floor {floor_id} is corrupted: {source}")]
    Corrupted {
        floor_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Decodable record holding a table no edit could have produced
    #[error("stored layout for floor {floor_id} has invalid table {table_id}: {reason}")]
    InvalidTable {
        floor_id: String,
        table_id: String,
        reason: String,
    },
}

impl LoadError {
    pub fn floor_id(&self) -> &str {
        match self {
            Self::Backend { floor_id, .. }
            | Self::Corrupted { floor_id, .. }
            | Self::InvalidTable { floor_id, .. } => floor_id,
        }
    }
}

/// Persistence boundary for floor layouts
pub trait LayoutStore: Send + Sync {
    /// Replace the stored layout of `floor_id` with `tables`
    fn save_layout(&self, floor_id: &str, tables: &[Table]) -> Result<(), PersistError>;

    /// `Ok(None)` when nothing has been saved for `floor_id`
    fn load_layout(&self, floor_id: &str) -> Result<Option<Vec<Table>>, LoadError>;

    /// Drop the stored layout; returns whether one existed
    fn delete_layout(&self, floor_id: &str) -> Result<bool, PersistError>;

    /// Floors with a stored layout, sorted by id
    fn list_floors(&self) -> Result<Vec<String>, LoadError>;
}

/// Encode a layout record, stamped with the current time
pub(crate) fn encode_layout(floor_id: &str, tables: &[Table]) -> StorageResult<Vec<u8>> {
    let layout = FloorLayout::new(floor_id, tables, shared::util::now_millis());
    Ok(serde_json::to_vec(&layout)?)
}

pub(crate) fn decode_layout(floor_id: &str, bytes: &[u8]) -> Result<Vec<Table>, LoadError> {
    let layout: FloorLayout =
        serde_json::from_slice(bytes).map_err(|source| LoadError::Corrupted {
            floor_id: floor_id.to_string(),
            source,
        })?;
    layout
        .into_tables()
        .into_iter()
        .map(|table| {
            let table_id = table.id.clone();
            validation::validate(table).map_err(|errors| LoadError::InvalidTable {
                floor_id: floor_id.to_string(),
                table_id,
                reason: validation::join_errors(&errors),
            })
        })
        .collect()
}
