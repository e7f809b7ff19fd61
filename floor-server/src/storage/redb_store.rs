//! redb-backed layout store
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `floor_layouts` | `floor_id` | JSON-serialized `FloorLayout` |

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::Table;
use std::path::Path;
use std::sync::Arc;

use super::{
    LayoutStore, LoadError, PersistError, StorageError, StorageResult, decode_layout,
    encode_layout,
};

const LAYOUTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("floor_layouts");

/// Layout store backed by an embedded redb file
#[derive(Clone)]
pub struct RedbLayoutStore {
    db: Arc<Database>,
}

impl RedbLayoutStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LAYOUTS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    fn put(&self, floor_id: &str, tables: &[Table]) -> StorageResult<()> {
        let value = encode_layout(floor_id, tables)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LAYOUTS_TABLE)?;
            table.insert(floor_id, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get(&self, floor_id: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LAYOUTS_TABLE)?;
        Ok(table.get(floor_id)?.map(|value| value.value().to_vec()))
    }

    fn remove(&self, floor_id: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(LAYOUTS_TABLE)?;
            table.remove(floor_id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LAYOUTS_TABLE)?;
        let mut floors = Vec::new();
        for result in table.iter()? {
            let (key, _) = result?;
            floors.push(key.value().to_string());
        }
        Ok(floors)
    }
}

impl LayoutStore for RedbLayoutStore {
    fn save_layout(&self, floor_id: &str, tables: &[Table]) -> Result<(), PersistError> {
        self.put(floor_id, tables).map_err(|source| PersistError {
            floor_id: floor_id.to_string(),
            source,
        })?;
        tracing::info!(floor_id = %floor_id, tables = tables.len(), "Layout saved");
        Ok(())
    }

    fn load_layout(&self, floor_id: &str) -> Result<Option<Vec<Table>>, LoadError> {
        let bytes = self.get(floor_id).map_err(|source| LoadError::Backend {
            floor_id: floor_id.to_string(),
            source,
        })?;
        match bytes {
            Some(bytes) => decode_layout(floor_id, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn delete_layout(&self, floor_id: &str) -> Result<bool, PersistError> {
        self.remove(floor_id).map_err(|source| PersistError {
            floor_id: floor_id.to_string(),
            source,
        })
    }

    fn list_floors(&self) -> Result<Vec<String>, LoadError> {
        // redb iterates keys in order
        self.keys().map_err(|source: StorageError| LoadError::Backend {
            floor_id: "*".to_string(),
            source,
        })
    }
}
