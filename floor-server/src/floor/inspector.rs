//! Inspector - edit form bound to the selected table
//!
//! Edits write straight through to the selected table: numeric fields are
//! coerced (non-numeric input is dropped), the candidate table is validated,
//! and only a valid candidate replaces the committed one.

use serde::{Deserialize, Serialize};
use shared::models::{ReservationInfo, Table, TableShape, TableStatus, TableStatusKind};
use thiserror::Error;

use super::editor::FloorEditor;
use super::validation::{self, ValidationError, join_errors};

/// Form fields as shown in the side panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorForm {
    pub table_id: String,
    pub table_number: String,
    pub capacity: String,
    pub status: TableStatusKind,
    pub status_label: String,
    pub shape: TableShape,
    /// Only filled while occupied
    pub party_size: String,
    pub estimated_turn_time: String,
    /// Only present while reserved with a reservation
    pub reservation: Option<ReservationInfo>,
    pub over_capacity: bool,
}

impl InspectorForm {
    pub fn from_table(table: &Table) -> Self {
        let (party_size, estimated_turn_time) = match &table.status {
            TableStatus::Occupied {
                party_size,
                estimated_turn_time,
            } => (
                party_size.map(|p| p.to_string()).unwrap_or_default(),
                estimated_turn_time.clone().unwrap_or_default(),
            ),
            _ => (String::new(), String::new()),
        };

        Self {
            table_id: table.id.clone(),
            table_number: table.table_number.to_string(),
            capacity: table.capacity.to_string(),
            status: table.status_kind(),
            status_label: table.badge_label().to_string(),
            shape: table.shape,
            party_size,
            estimated_turn_time,
            reservation: table.status.reservation().cloned(),
            over_capacity: table.is_over_capacity(),
        }
    }
}

/// A single field edit coming from the inspector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum TableEdit {
    TableNumber(String),
    Capacity(String),
    Status(TableStatusKind),
    Shape(TableShape),
    /// Occupied only; empty clears it
    PartySize(String),
    /// Occupied only; empty clears it
    EstimatedTurnTime(String),
    /// Reserved only; `None` clears it
    Reservation(Option<ReservationInfo>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The selected table after the edit
    Applied(Table),
    /// Nothing selected, input not coercible, or field not meaningful in the current status
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectorError {
    #[error("edit rejected: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    /// Raised by a session when the edit arrives with nothing selected
    #[error("no table selected")]
    NoSelection,
}

fn parse_count(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

/// Build the candidate table for an edit, `None` when the edit is dropped
fn edited(current: &Table, edit: TableEdit) -> Option<Table> {
    let mut table = current.clone();

    match edit {
        TableEdit::TableNumber(input) => table.table_number = parse_count(&input)?,
        TableEdit::Capacity(input) => table.capacity = parse_count(&input)?,
        TableEdit::Shape(shape) => table.shape = shape,
        TableEdit::Status(kind) => {
            if table.status_kind() != kind {
                table.status = TableStatus::empty(kind);
            }
        }
        TableEdit::PartySize(input) => {
            let TableStatus::Occupied { party_size, .. } = &mut table.status else {
                return None;
            };
            *party_size = if input.trim().is_empty() {
                None
            } else {
                Some(parse_count(&input)?)
            };
        }
        TableEdit::EstimatedTurnTime(input) => {
            let TableStatus::Occupied {
                estimated_turn_time,
                ..
            } = &mut table.status
            else {
                return None;
            };
            let input = input.trim();
            *estimated_turn_time = (!input.is_empty()).then(|| input.to_string());
        }
        TableEdit::Reservation(info) => {
            let TableStatus::Reserved { reservation } = &mut table.status else {
                return None;
            };
            *reservation = info;
        }
    }

    Some(table)
}

impl FloorEditor {
    /// Form for the current selection
    pub fn inspector(&self) -> Option<InspectorForm> {
        self.selected().map(InspectorForm::from_table)
    }

    /// Apply one inspector edit to the selected table
    pub fn apply_edit(&mut self, edit: TableEdit) -> Result<EditOutcome, InspectorError> {
        let Some(current) = self.selected() else {
            return Ok(EditOutcome::Ignored);
        };
        let Some(candidate) = edited(current, edit) else {
            return Ok(EditOutcome::Ignored);
        };
        if &candidate == current {
            return Ok(EditOutcome::Applied(candidate));
        }

        let candidate = validation::validate(candidate).map_err(|errors| {
            tracing::debug!(errors = %join_errors(&errors), "Inspector edit rejected");
            InspectorError::Invalid(errors)
        })?;

        if let Some(slot) = self.selected_mut() {
            *slot = candidate.clone();
        }
        self.touch();
        Ok(EditOutcome::Applied(candidate))
    }

    /// "Remove": delete the selected table and clear the selection
    pub fn remove_selected(&mut self) -> Option<Table> {
        let id = self.selected.take()?;
        self.remove_table(&id)
    }

    /// "Done": close the inspector without deleting
    pub fn finish_editing(&mut self) {
        self.clear_selection();
    }
}
