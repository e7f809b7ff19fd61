//! Process-local layout store

use parking_lot::RwLock;
use shared::models::Table;
use std::collections::BTreeMap;

use super::{LayoutStore, LoadError, PersistError, decode_layout, encode_layout};

/// Keeps encoded records in memory so loads go through the same decoding as redb
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    layouts: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn save_layout(&self, floor_id: &str, tables: &[Table]) -> Result<(), PersistError> {
        let record = encode_layout(floor_id, tables).map_err(|source| PersistError {
            floor_id: floor_id.to_string(),
            source,
        })?;
        self.layouts.write().insert(floor_id.to_string(), record);
        tracing::info!(floor_id = %floor_id, tables = tables.len(), "Layout saved (memory)");
        Ok(())
    }

    fn load_layout(&self, floor_id: &str) -> Result<Option<Vec<Table>>, LoadError> {
        let layouts = self.layouts.read();
        layouts
            .get(floor_id)
            .map(|bytes| decode_layout(floor_id, bytes))
            .transpose()
    }

    fn delete_layout(&self, floor_id: &str) -> Result<bool, PersistError> {
        Ok(self.layouts.write().remove(floor_id).is_some())
    }

    fn list_floors(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.layouts.read().keys().cloned().collect())
    }
}
