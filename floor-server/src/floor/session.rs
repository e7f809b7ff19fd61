//! Floor sessions - one live editor per floor
//!
//! A [`FloorSession`] owns the [`FloorEditor`] of a floor behind a
//! `parking_lot::Mutex`. Editor calls are synchronous and the editor lock is
//! never held across an await or a store call. Store round trips (save,
//! reset) are serialized by a second per-session lock so the recorded saved
//! revision always matches what the store holds last.
//!
//! Sessions exist only for floors being edited. Reads of a floor without a
//! session are answered from the store, and idle sessions are evicted.
//!
//! Every committed layout mutation is published as a [`LayoutChange`] on a
//! broadcast channel shared by all sessions.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::models::{FloorStatistics, Position, Table, TableRecord};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::defaults::default_layout;
use super::editor::{EditorError, FloorEditor, NewTableForm};
use super::grid::Grid;
use super::inspector::{EditOutcome, InspectorError, InspectorForm, TableEdit};
use crate::storage::{LayoutStore, LoadError, PersistError};

/// Change broadcast capacity
const CHANGE_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutChangeKind {
    TableAdded,
    TableRemoved,
    TableMoved,
    TableUpdated,
    Saved,
    Reset,
}

/// Published after each committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutChange {
    pub floor_id: String,
    pub kind: LayoutChangeKind,
    pub table_id: Option<String>,
    pub revision: u64,
}

/// Snapshot of a floor for the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorView {
    pub floor_id: String,
    pub tables: Vec<TableRecord>,
    pub selected_table_id: Option<String>,
    pub statistics: FloorStatistics,
    pub revision: u64,
    pub has_unsaved_changes: bool,
}

struct SessionInner {
    editor: FloorEditor,
    /// Editor revision last written to (or read from) the store
    saved_revision: u64,
}

pub struct FloorSession {
    floor_id: String,
    inner: Mutex<SessionInner>,
    /// Held across snapshot, store call and revision update
    persist: Mutex<()>,
    store: Arc<dyn LayoutStore>,
    change_tx: broadcast::Sender<LayoutChange>,
}

impl std::fmt::Debug for FloorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorSession")
            .field("floor_id", &self.floor_id)
            .field("store", &"<LayoutStore>")
            .field("change_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl FloorSession {
    fn new(
        floor_id: String,
        editor: FloorEditor,
        store: Arc<dyn LayoutStore>,
        change_tx: broadcast::Sender<LayoutChange>,
    ) -> Self {
        let saved_revision = editor.revision();
        Self {
            floor_id,
            inner: Mutex::new(SessionInner {
                editor,
                saved_revision,
            }),
            persist: Mutex::new(()),
            store,
            change_tx,
        }
    }

    pub fn floor_id(&self) -> &str {
        &self.floor_id
    }

    fn publish(&self, kind: LayoutChangeKind, table_id: Option<String>, revision: u64) {
        let change = LayoutChange {
            floor_id: self.floor_id.clone(),
            kind,
            table_id,
            revision,
        };
        // No receivers is normal when nothing listens
        if self.change_tx.send(change).is_err() {
            tracing::trace!(floor_id = %self.floor_id, "Layout change dropped: no receivers");
        }
    }

    // ========== Reads ==========

    pub fn view(&self) -> FloorView {
        let inner = self.inner.lock();
        let editor = &inner.editor;
        FloorView {
            floor_id: self.floor_id.clone(),
            tables: editor.tables().iter().map(TableRecord::from).collect(),
            selected_table_id: editor.selected_id().map(str::to_string),
            statistics: editor.statistics(),
            revision: editor.revision(),
            has_unsaved_changes: editor.revision() != inner.saved_revision,
        }
    }

    /// Nothing unsaved and nothing selected: dropping the session loses nothing
    fn is_idle(&self) -> bool {
        let inner = self.inner.lock();
        inner.editor.revision() == inner.saved_revision && inner.editor.selected_id().is_none()
    }

    pub fn statistics(&self) -> FloorStatistics {
        self.inner.lock().editor.statistics()
    }

    pub fn tables(&self) -> Vec<Table> {
        self.inner.lock().editor.tables().to_vec()
    }

    pub fn inspector(&self) -> Option<InspectorForm> {
        self.inner.lock().editor.inspector()
    }

    // ========== Mutations ==========

    pub fn add_table(&self, mut form: NewTableForm) -> Result<Table, EditorError> {
        let (table, revision) = {
            let mut inner = self.inner.lock();
            let table = inner.editor.add_table(&mut form)?;
            (table, inner.editor.revision())
        };
        self.publish(LayoutChangeKind::TableAdded, Some(table.id.clone()), revision);
        Ok(table)
    }

    pub fn remove_table(&self, id: &str) -> Option<Table> {
        let (removed, revision) = {
            let mut inner = self.inner.lock();
            let removed = inner.editor.remove_table(id)?;
            (removed, inner.editor.revision())
        };
        self.publish(LayoutChangeKind::TableRemoved, Some(removed.id.clone()), revision);
        Some(removed)
    }

    pub fn move_table(&self, id: &str, position: Position) -> Option<Position> {
        let (stored, before, after) = {
            let mut inner = self.inner.lock();
            let before = inner.editor.revision();
            let stored = inner.editor.move_table(id, position)?;
            (stored, before, inner.editor.revision())
        };
        if after != before {
            self.publish(LayoutChangeKind::TableMoved, Some(id.to_string()), after);
        }
        Some(stored)
    }

    pub fn select_table(&self, id: &str) -> bool {
        self.inner.lock().editor.select_table(id)
    }

    pub fn clear_selection(&self) {
        self.inner.lock().editor.finish_editing();
    }

    /// Apply an inspector edit; `NoSelection` when nothing is selected at the time of the edit
    pub fn apply_edit(&self, edit: TableEdit) -> Result<EditOutcome, InspectorError> {
        let (outcome, before, after) = {
            let mut inner = self.inner.lock();
            if inner.editor.selected_id().is_none() {
                return Err(InspectorError::NoSelection);
            }
            let before = inner.editor.revision();
            let outcome = inner.editor.apply_edit(edit)?;
            (outcome, before, inner.editor.revision())
        };
        if after != before {
            if let EditOutcome::Applied(table) = &outcome {
                self.publish(LayoutChangeKind::TableUpdated, Some(table.id.clone()), after);
            }
        }
        Ok(outcome)
    }

    pub fn remove_selected(&self) -> Option<Table> {
        let (removed, revision) = {
            let mut inner = self.inner.lock();
            let removed = inner.editor.remove_selected()?;
            (removed, inner.editor.revision())
        };
        self.publish(LayoutChangeKind::TableRemoved, Some(removed.id.clone()), revision);
        Some(removed)
    }

    // ========== Persistence ==========

    /// Write the current tables to the store.
    ///
    /// On failure the in-memory layout is kept and stays marked unsaved.
    pub fn save(&self) -> Result<FloorView, PersistError> {
        let _persist = self.persist.lock();
        let (tables, revision) = {
            let inner = self.inner.lock();
            (inner.editor.tables().to_vec(), inner.editor.revision())
        };

        if let Err(e) = self.store.save_layout(&self.floor_id, &tables) {
            tracing::warn!(floor_id = %self.floor_id, error = %e, "Layout save failed");
            return Err(e);
        }

        // Edits made while saving keep the floor dirty
        self.inner.lock().saved_revision = revision;
        self.publish(LayoutChangeKind::Saved, None, revision);
        Ok(self.view())
    }

    /// Discard in-memory edits and reload the stored layout (or the default).
    ///
    /// On load failure the in-memory layout is kept.
    pub fn reset(&self) -> Result<FloorView, LoadError> {
        let _persist = self.persist.lock();
        let tables = match self.store.load_layout(&self.floor_id) {
            Ok(tables) => tables.unwrap_or_else(default_layout),
            Err(e) => {
                tracing::warn!(
                    floor_id = %self.floor_id,
                    error = %e,
                    "Layout load failed, keeping current layout"
                );
                return Err(e);
            }
        };

        let revision = {
            let mut inner = self.inner.lock();
            inner.editor.replace_tables(tables);
            inner.saved_revision = inner.editor.revision();
            inner.saved_revision
        };
        self.publish(LayoutChangeKind::Reset, None, revision);
        Ok(self.view())
    }
}

/// All open floor sessions
pub struct FloorSessions {
    sessions: DashMap<String, Arc<FloorSession>>,
    store: Arc<dyn LayoutStore>,
    grid: Grid,
    change_tx: broadcast::Sender<LayoutChange>,
}

impl std::fmt::Debug for FloorSessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorSessions")
            .field("open", &self.sessions.len())
            .field("grid", &self.grid)
            .finish()
    }
}

impl FloorSessions {
    pub fn new(store: Arc<dyn LayoutStore>, grid: Grid) -> Self {
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            sessions: DashMap::new(),
            store,
            grid,
            change_tx,
        }
    }

    /// Layout change feed for every floor
    pub fn subscribe(&self) -> broadcast::Receiver<LayoutChange> {
        self.change_tx.subscribe()
    }

    /// Stored tables of a floor, or the default layout when nothing is stored
    fn load_tables(&self, floor_id: &str) -> Result<Vec<Table>, LoadError> {
        let tables = match self.store.load_layout(floor_id)? {
            Some(tables) => {
                tracing::debug!(floor_id = %floor_id, tables = tables.len(), "Layout loaded");
                tables
            }
            None => {
                tracing::debug!(floor_id = %floor_id, "No saved layout, using default");
                default_layout()
            }
        };
        Ok(tables)
    }

    /// Session of a floor if one is open
    pub fn get(&self, floor_id: &str) -> Option<Arc<FloorSession>> {
        self.sessions.get(floor_id).map(|entry| entry.clone())
    }

    /// Get the session of a floor, loading it on first use.
    ///
    /// A floor with nothing stored opens on the default layout. A failed load
    /// opens nothing, so a later call retries.
    pub fn open(&self, floor_id: &str) -> Result<Arc<FloorSession>, LoadError> {
        if let Some(session) = self.get(floor_id) {
            return Ok(session);
        }

        let tables = self.load_tables(floor_id)?;
        let session = self
            .sessions
            .entry(floor_id.to_string())
            .or_insert_with(|| {
                Arc::new(FloorSession::new(
                    floor_id.to_string(),
                    FloorEditor::with_tables(tables, self.grid),
                    self.store.clone(),
                    self.change_tx.clone(),
                ))
            })
            .clone();
        Ok(session)
    }

    /// Snapshot of a floor without opening a session for it
    pub fn view(&self, floor_id: &str) -> Result<FloorView, LoadError> {
        if let Some(session) = self.get(floor_id) {
            return Ok(session.view());
        }
        let tables = self.load_tables(floor_id)?;
        Ok(FloorView {
            floor_id: floor_id.to_string(),
            statistics: FloorStatistics::compute(&tables),
            tables: tables.iter().map(TableRecord::from).collect(),
            selected_table_id: None,
            revision: 0,
            has_unsaved_changes: false,
        })
    }

    pub fn statistics(&self, floor_id: &str) -> Result<FloorStatistics, LoadError> {
        match self.get(floor_id) {
            Some(session) => Ok(session.statistics()),
            None => Ok(FloorStatistics::compute(&self.load_tables(floor_id)?)),
        }
    }

    /// Drop the stored layout and any open session of a floor.
    ///
    /// Returns whether a stored layout existed.
    pub fn delete(&self, floor_id: &str) -> Result<bool, PersistError> {
        let existed = self.store.delete_layout(floor_id)?;
        self.sessions.remove(floor_id);
        tracing::info!(floor_id = %floor_id, existed, "Layout deleted");
        Ok(existed)
    }

    /// Close sessions with no unsaved edits, no selection and no request
    /// holding them. Returns how many were closed.
    pub fn evict_idle(&self) -> usize {
        let before = self.sessions.len();
        // The shard lock held by retain blocks new clones, so a strong count
        // of one means no request is using the session
        self.sessions
            .retain(|_, session| Arc::strong_count(session) > 1 || !session.is_idle());
        before.saturating_sub(self.sessions.len())
    }

    /// Floors with a saved layout, sorted
    pub fn floor_ids(&self) -> Result<Vec<String>, LoadError> {
        self.store.list_floors()
    }

    pub fn open_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryLayoutStore, StorageError};
    use shared::models::{TableShape, TableStatusKind};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn sessions() -> FloorSessions {
        FloorSessions::new(Arc::new(MemoryLayoutStore::new()), Grid::default())
    }

    /// Store whose loads always fail
    struct BrokenStore;

    impl LayoutStore for BrokenStore {
        fn save_layout(&self, floor_id: &str, _tables: &[Table]) -> Result<(), PersistError> {
            Err(PersistError {
                floor_id: floor_id.to_string(),
                source: StorageError::Serialization(serde_json::from_str::<()>("x").unwrap_err()),
            })
        }

        fn load_layout(&self, floor_id: &str) -> Result<Option<Vec<Table>>, LoadError> {
            Err(LoadError::Corrupted {
                floor_id: floor_id.to_string(),
                source: serde_json::from_str::<()>("x").unwrap_err(),
            })
        }

        fn delete_layout(&self, _floor_id: &str) -> Result<bool, PersistError> {
            Ok(false)
        }

        fn list_floors(&self) -> Result<Vec<String>, LoadError> {
            Ok(vec![])
        }
    }

    /// Memory store whose first save waits until released
    struct GatedStore {
        inner: MemoryLayoutStore,
        entered: Mutex<Option<mpsc::Sender<()>>>,
        release: Mutex<Option<mpsc::Receiver<()>>>,
    }

    impl GatedStore {
        fn new(entered: mpsc::Sender<()>, release: mpsc::Receiver<()>) -> Self {
            Self {
                inner: MemoryLayoutStore::new(),
                entered: Mutex::new(Some(entered)),
                release: Mutex::new(Some(release)),
            }
        }
    }

    impl LayoutStore for GatedStore {
        fn save_layout(&self, floor_id: &str, tables: &[Table]) -> Result<(), PersistError> {
            let entered = self.entered.lock().take();
            if let Some(entered) = entered {
                entered.send(()).unwrap();
                let release = self.release.lock().take().unwrap();
                release.recv().unwrap();
            }
            self.inner.save_layout(floor_id, tables)
        }

        fn load_layout(&self, floor_id: &str) -> Result<Option<Vec<Table>>, LoadError> {
            self.inner.load_layout(floor_id)
        }

        fn delete_layout(&self, floor_id: &str) -> Result<bool, PersistError> {
            self.inner.delete_layout(floor_id)
        }

        fn list_floors(&self) -> Result<Vec<String>, LoadError> {
            self.inner.list_floors()
        }
    }

    #[test]
    fn test_overlapping_saves_store_the_newest_layout() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Arc::new(GatedStore::new(entered_tx, release_rx));
        let sessions = FloorSessions::new(store.clone(), Grid::default());
        let session = sessions.open("main").unwrap();
        session.remove_table("table-1");

        // First save snapshots 4 tables and stalls inside the store
        let first = {
            let session = session.clone();
            thread::spawn(move || session.save().unwrap())
        };
        entered_rx.recv().unwrap();

        session
            .add_table(NewTableForm::new("6", "4", TableShape::Round))
            .unwrap();
        let second = {
            let session = session.clone();
            thread::spawn(move || session.save().unwrap())
        };
        thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();

        first.join().unwrap();
        second.join().unwrap();

        let stored = store.load_layout("main").unwrap().unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored, session.tables());
        assert!(!session.view().has_unsaved_changes);
    }

    #[test]
    fn test_edit_during_save_stays_unsaved() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Arc::new(GatedStore::new(entered_tx, release_rx));
        let sessions = FloorSessions::new(store.clone(), Grid::default());
        let session = sessions.open("main").unwrap();

        let saving = {
            let session = session.clone();
            thread::spawn(move || session.save().unwrap())
        };
        entered_rx.recv().unwrap();
        session.remove_table("table-1");
        release_tx.send(()).unwrap();
        saving.join().unwrap();

        assert_eq!(store.load_layout("main").unwrap().unwrap().len(), 5);
        assert!(session.view().has_unsaved_changes);
    }

    #[test]
    fn test_reads_do_not_open_sessions() {
        let sessions = sessions();
        for i in 0..20 {
            let floor_id = format!("ghost-{i}");
            assert_eq!(sessions.statistics(&floor_id).unwrap().total_capacity, 22);
            assert_eq!(sessions.view(&floor_id).unwrap().tables.len(), 5);
        }
        assert_eq!(sessions.open_count(), 0);
        assert!(sessions.get("ghost-0").is_none());
        assert!(sessions.floor_ids().unwrap().is_empty());
    }

    #[test]
    fn test_view_prefers_open_session() {
        let sessions = sessions();
        sessions.open("main").unwrap().remove_table("table-1");
        let view = sessions.view("main").unwrap();
        assert_eq!(view.tables.len(), 4);
        assert!(view.has_unsaved_changes);
    }

    #[test]
    fn test_evict_idle_keeps_dirty_and_selected() {
        let sessions = sessions();
        sessions.open("idle").unwrap();
        sessions.open("dirty").unwrap().remove_table("table-1");
        assert!(sessions.open("selected").unwrap().select_table("table-2"));
        let held = sessions.open("held").unwrap();

        assert_eq!(sessions.evict_idle(), 1);
        assert!(sessions.get("idle").is_none());
        assert!(sessions.get("dirty").is_some());
        assert!(sessions.get("selected").is_some());
        assert!(sessions.get("held").is_some());

        drop(held);
        let dirty = sessions.get("dirty").unwrap();
        dirty.save().unwrap();
        drop(dirty);
        assert_eq!(sessions.evict_idle(), 2);
        assert_eq!(sessions.open_count(), 1);

        // Saved layout survives eviction
        assert_eq!(sessions.view("dirty").unwrap().tables.len(), 4);
    }

    #[test]
    fn test_delete_drops_layout_and_session() {
        let sessions = sessions();
        let session = sessions.open("patio").unwrap();
        session.remove_table("table-1");
        session.save().unwrap();
        drop(session);
        assert_eq!(sessions.floor_ids().unwrap(), vec!["patio"]);

        assert!(sessions.delete("patio").unwrap());
        assert!(!sessions.delete("patio").unwrap());
        assert_eq!(sessions.open_count(), 0);
        assert!(sessions.floor_ids().unwrap().is_empty());
        assert_eq!(sessions.view("patio").unwrap().tables.len(), 5);
    }

    #[test]
    fn test_edit_without_selection_is_rejected() {
        let session = sessions().open("main").unwrap();
        assert_eq!(
            session.apply_edit(TableEdit::Capacity("6".into())),
            Err(InspectorError::NoSelection)
        );
        session.select_table("table-1");
        session.clear_selection();
        assert_eq!(
            session.apply_edit(TableEdit::Shape(TableShape::Round)),
            Err(InspectorError::NoSelection)
        );
    }

    #[test]
    fn test_open_unsaved_floor_uses_default() {
        let sessions = sessions();
        let session = sessions.open("main").unwrap();
        let view = session.view();
        assert_eq!(view.statistics.total, 5);
        assert_eq!(view.statistics.total_capacity, 22);
        assert!(!view.has_unsaved_changes);
        assert!(Arc::ptr_eq(&session, &sessions.open("main").unwrap()));
    }

    #[test]
    fn test_open_failure_is_not_cached() {
        let sessions = FloorSessions::new(Arc::new(BrokenStore), Grid::default());
        assert!(sessions.open("main").is_err());
        assert_eq!(sessions.open_count(), 0);
    }

    #[test]
    fn test_save_then_reopen_in_new_sessions() {
        let store: Arc<dyn LayoutStore> = Arc::new(MemoryLayoutStore::new());
        let first = FloorSessions::new(store.clone(), Grid::default());
        let session = first.open("main").unwrap();
        session
            .add_table(NewTableForm::new("6", "4", TableShape::Round))
            .unwrap();
        assert!(session.view().has_unsaved_changes);

        let view = session.save().unwrap();
        assert!(!view.has_unsaved_changes);

        let second = FloorSessions::new(store, Grid::default());
        let reopened = second.open("main").unwrap();
        assert_eq!(reopened.tables(), session.tables());
        assert_eq!(reopened.statistics().total_capacity, 26);
        assert_eq!(second.floor_ids().unwrap(), vec!["main"]);
    }

    #[test]
    fn test_save_failure_keeps_edits() {
        let sessions = FloorSessions::new(Arc::new(MemoryLayoutStore::new()), Grid::default());
        let session = sessions.open("main").unwrap();
        session.remove_table("table-1");

        // Swap in a failing store for the same editor state
        let broken = FloorSession::new(
            "main".into(),
            FloorEditor::with_tables(session.tables(), Grid::default()),
            Arc::new(BrokenStore),
            broadcast::channel(1).0,
        );
        broken.remove_table("table-2");
        assert!(broken.save().is_err());
        assert_eq!(broken.tables().len(), 3);
        assert!(broken.view().has_unsaved_changes);
    }

    #[test]
    fn test_reset_discards_edits() {
        let sessions = sessions();
        let session = sessions.open("main").unwrap();
        session.remove_table("table-1");
        session.select_table("table-2");

        let view = session.reset().unwrap();
        assert_eq!(view.tables.len(), 5);
        assert!(view.selected_table_id.is_none());
        assert!(!view.has_unsaved_changes);
    }

    #[test]
    fn test_reset_failure_keeps_edits() {
        let session = FloorSession::new(
            "main".into(),
            FloorEditor::with_tables(default_layout(), Grid::default()),
            Arc::new(BrokenStore),
            broadcast::channel(1).0,
        );
        session.remove_table("table-1");
        assert!(session.reset().is_err());
        assert_eq!(session.tables().len(), 4);
    }

    #[test]
    fn test_changes_are_published() {
        let sessions = sessions();
        let mut rx = sessions.subscribe();
        let session = sessions.open("main").unwrap();

        session.move_table("table-1", Position::new(17.0, 23.0));
        let change = rx.try_recv().unwrap();
        assert_eq!(change.kind, LayoutChangeKind::TableMoved);
        assert_eq!(change.table_id.as_deref(), Some("table-1"));

        // Same cell: nothing committed, nothing published
        session.move_table("table-1", Position::new(21.0, 19.0));
        assert!(rx.try_recv().is_err());

        session.select_table("table-1");
        assert!(rx.try_recv().is_err());

        session
            .apply_edit(TableEdit::Status(TableStatusKind::Cleaning))
            .unwrap();
        assert_eq!(rx.try_recv().unwrap().kind, LayoutChangeKind::TableUpdated);

        session.remove_selected().unwrap();
        assert_eq!(rx.try_recv().unwrap().kind, LayoutChangeKind::TableRemoved);

        session.save().unwrap();
        let saved = rx.try_recv().unwrap();
        assert_eq!(saved.kind, LayoutChangeKind::Saved);
        assert_eq!(saved.floor_id, "main");
    }

    #[test]
    fn test_view_records_use_flat_shape() {
        let session = sessions().open("main").unwrap();
        let json = serde_json::to_value(session.view()).unwrap();
        assert_eq!(json["floorId"], "main");
        assert_eq!(json["tables"][1]["status"], "occupied");
        assert_eq!(json["tables"][1]["currentPartySize"], 3);
        assert_eq!(json["statistics"]["totalCapacity"], 22);
    }
}
