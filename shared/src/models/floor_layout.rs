//! Floor Layout Model
//!
//! Flat wire/persistence shape of a floor plan. One [`TableRecord`] per table,
//! status-specific fields are nullable on the wire and folded back into
//! [`TableStatus`] on read.

use serde::{Deserialize, Serialize};

use super::floor_table::{
    Position, ReservationInfo, Table, TableShape, TableStatus, TableStatusKind,
};

/// Persisted table record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    pub id: String,
    pub table_number: u32,
    pub capacity: u32,
    pub status: TableStatusKind,
    pub shape: TableShape,
    pub position: Position,
    #[serde(default)]
    pub current_party_size: Option<u32>,
    #[serde(default)]
    pub estimated_turn_time: Option<String>,
    #[serde(default)]
    pub reservation_info: Option<ReservationInfo>,
}

impl From<&Table> for TableRecord {
    fn from(table: &Table) -> Self {
        let (current_party_size, estimated_turn_time, reservation_info) = match &table.status {
            TableStatus::Occupied {
                party_size,
                estimated_turn_time,
            } => (*party_size, estimated_turn_time.clone(), None),
            TableStatus::Reserved { reservation } => (None, None, reservation.clone()),
            _ => (None, None, None),
        };

        Self {
            id: table.id.clone(),
            table_number: table.table_number,
            capacity: table.capacity,
            status: table.status_kind(),
            shape: table.shape,
            position: table.position,
            current_party_size,
            estimated_turn_time,
            reservation_info,
        }
    }
}

impl From<TableRecord> for Table {
    /// Fields that do not belong to the record's status are dropped
    fn from(record: TableRecord) -> Self {
        let status = match record.status {
            TableStatusKind::Available => TableStatus::Available,
            TableStatusKind::Occupied => TableStatus::Occupied {
                party_size: record.current_party_size,
                estimated_turn_time: record.estimated_turn_time,
            },
            TableStatusKind::Reserved => TableStatus::Reserved {
                reservation: record.reservation_info,
            },
            TableStatusKind::Cleaning => TableStatus::Cleaning,
            TableStatusKind::OutOfOrder => TableStatus::OutOfOrder,
        };

        Self {
            id: record.id,
            table_number: record.table_number,
            capacity: record.capacity,
            shape: record.shape,
            status,
            position: record.position,
        }
    }
}

/// One floor's saved layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorLayout {
    pub floor_id: String,
    pub tables: Vec<TableRecord>,
    /// Unix millis
    pub saved_at: i64,
}

impl FloorLayout {
    pub fn new(floor_id: impl Into<String>, tables: &[Table], saved_at: i64) -> Self {
        Self {
            floor_id: floor_id.into(),
            tables: tables.iter().map(TableRecord::from).collect(),
            saved_at,
        }
    }

    pub fn into_tables(self) -> Vec<Table> {
        self.tables.into_iter().map(Table::from).collect()
    }
}
