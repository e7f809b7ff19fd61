//! FloorEditor - authoritative table set of one floor plan
//!
//! Owns the tables and the current selection. Every mutation goes through
//! here: add, remove, drag (grid-snapped), select, and inspector edits
//! (see [`super::inspector`]).
//!
//! # Mutation paths
//!
//! ```text
//! add_table(form)      ──► coerce ──► push, reset form
//! move_table(id, pos)  ──► grid.snap ──► position
//! apply_edit(edit)     ──► coerce ──► validate ──► selected table
//! remove_table(id)     ──► retain, drop selection if it pointed there
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::models::{FloorStatistics, Position, Table, TableShape};
use thiserror::Error;

use super::grid::Grid;
use super::validation::MAX_CAPACITY;

/// Capacity used when the add form's capacity is empty, not a number or out of range
pub const DEFAULT_CAPACITY: u32 = 4;

/// Area new tables are dropped into (canvas units, before snapping)
const SPAWN_X: std::ops::Range<f64> = 50.0..450.0;
const SPAWN_Y: std::ops::Range<f64> = 50.0..350.0;

/// "Add table" form as typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTableForm {
    #[serde(default)]
    pub table_number: String,
    #[serde(default)]
    pub capacity: String,
    #[serde(default)]
    pub shape: TableShape,
}

impl Default for NewTableForm {
    fn default() -> Self {
        Self {
            table_number: String::new(),
            capacity: DEFAULT_CAPACITY.to_string(),
            shape: TableShape::Square,
        }
    }
}

impl NewTableForm {
    pub fn new(table_number: &str, capacity: &str, shape: TableShape) -> Self {
        Self {
            table_number: table_number.to_string(),
            capacity: capacity.to_string(),
            shape,
        }
    }

    /// Whether the add button is enabled
    pub fn can_submit(&self) -> bool {
        self.parsed_table_number().is_some()
    }

    fn parsed_table_number(&self) -> Option<u32> {
        self.table_number
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
    }

    fn parsed_capacity(&self) -> u32 {
        self.capacity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|c| (1..=MAX_CAPACITY).contains(c))
            .unwrap_or(DEFAULT_CAPACITY)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("table number is required")]
    MissingTableNumber,
}

/// In-memory floor plan state
#[derive(Debug, Clone)]
pub struct FloorEditor {
    pub(super) tables: Vec<Table>,
    pub(super) selected: Option<String>,
    grid: Grid,
    /// Bumped on every committed mutation of the table set
    pub(super) revision: u64,
}

impl FloorEditor {
    pub fn new(grid: Grid) -> Self {
        Self::with_tables(Vec::new(), grid)
    }

    pub fn with_tables(tables: Vec<Table>, grid: Grid) -> Self {
        Self {
            tables,
            selected: None,
            grid,
            revision: 0,
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn statistics(&self) -> FloorStatistics {
        FloorStatistics::compute(&self.tables)
    }

    /// Replace the whole table set (rehydration from storage)
    pub fn replace_tables(&mut self, tables: Vec<Table>) {
        self.tables = tables;
        self.selected = None;
        self.touch();
    }

    pub(super) fn touch(&mut self) {
        self.revision += 1;
    }

    // ========== Add / Remove ==========

    /// Create an available table at a random grid-aligned spot and reset the form.
    ///
    /// Table numbers are not checked for uniqueness. A missing table number is
    /// the only rejection; bad capacity input falls back to [`DEFAULT_CAPACITY`].
    pub fn add_table(&mut self, form: &mut NewTableForm) -> Result<Table, EditorError> {
        let table_number = form
            .parsed_table_number()
            .ok_or(EditorError::MissingTableNumber)?;

        let table = Table::new(
            shared::util::new_id(),
            table_number,
            form.parsed_capacity(),
            form.shape,
            self.spawn_position(),
        );

        tracing::debug!(
            table_id = %table.id,
            table_number = table.table_number,
            capacity = table.capacity,
            "Table added"
        );

        self.tables.push(table.clone());
        self.touch();
        form.reset();
        Ok(table)
    }

    fn spawn_position(&self) -> Position {
        let mut rng = rand::thread_rng();
        self.grid.snap(Position::new(
            rng.gen_range(SPAWN_X),
            rng.gen_range(SPAWN_Y),
        ))
    }

    /// Remove a table; unknown ids are a silent no-op
    pub fn remove_table(&mut self, id: &str) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.id == id)?;
        let removed = self.tables.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.touch();
        tracing::debug!(table_id = %id, "Table removed");
        Some(removed)
    }

    // ========== Drag ==========

    /// Store a dragged position, snapped to the grid. Returns the stored position.
    pub fn move_table(&mut self, id: &str, position: Position) -> Option<Position> {
        let snapped = self.grid.snap(position);
        let table = self.tables.iter_mut().find(|t| t.id == id)?;
        if table.position != snapped {
            table.position = snapped;
            self.touch();
        }
        Some(snapped)
    }

    // ========== Selection ==========

    /// Select a table; unknown ids leave the selection as it was
    pub fn select_table(&mut self, id: &str) -> bool {
        if self.table(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Table> {
        self.selected.as_deref().and_then(|id| self.table(id))
    }

    pub(super) fn selected_mut(&mut self) -> Option<&mut Table> {
        let id = self.selected.clone()?;
        self.tables.iter_mut().find(|t| t.id == id)
    }
}

impl Default for FloorEditor {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}
