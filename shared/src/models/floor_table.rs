//! Floor Table Model
//!
//! 楼面布局中的单张桌台。状态使用带数据的枚举，
//! 只有 `Occupied` 携带就座人数，只有 `Reserved` 携带预订信息。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual shape of a table node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Square,
    Round,
    Rectangle,
}

impl TableShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Round => "round",
            Self::Rectangle => "rectangle",
        }
    }
}

impl FromStr for TableShape {
    type Err = ParseFloorEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "round" => Ok(Self::Round),
            "rectangle" => Ok(Self::Rectangle),
            other => Err(ParseFloorEnumError::new("shape", other)),
        }
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain status discriminant, without per-status data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableStatusKind {
    Available,
    Occupied,
    Reserved,
    Cleaning,
    OutOfOrder,
}

impl TableStatusKind {
    pub const ALL: [TableStatusKind; 5] = [
        Self::Available,
        Self::Occupied,
        Self::Reserved,
        Self::Cleaning,
        Self::OutOfOrder,
    ];

    /// Wire value (`out-of-order` etc.)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
            Self::Cleaning => "cleaning",
            Self::OutOfOrder => "out-of-order",
        }
    }

    /// Staff-facing badge label
    pub fn badge_label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::Reserved => "Reserved",
            Self::Cleaning => "Cleaning",
            Self::OutOfOrder => "Out of Order",
        }
    }
}

impl FromStr for TableStatusKind {
    type Err = ParseFloorEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "reserved" => Ok(Self::Reserved),
            "cleaning" => Ok(Self::Cleaning),
            "out-of-order" | "out_of_order" => Ok(Self::OutOfOrder),
            other => Err(ParseFloorEnumError::new("status", other)),
        }
    }
}

impl fmt::Display for TableStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown shape/status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown table {field}: {value:?}")]
pub struct ParseFloorEnumError {
    pub field: &'static str,
    pub value: String,
}

impl ParseFloorEnumError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Reservation held on a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInfo {
    pub customer_name: String,
    /// Display time, e.g. "7:30 PM"
    pub time: String,
    pub party_size: u32,
}

/// Table status with the data that only makes sense in that status
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied {
        party_size: Option<u32>,
        estimated_turn_time: Option<String>,
    },
    Reserved {
        reservation: Option<ReservationInfo>,
    },
    Cleaning,
    OutOfOrder,
}

impl TableStatus {
    pub fn kind(&self) -> TableStatusKind {
        match self {
            Self::Available => TableStatusKind::Available,
            Self::Occupied { .. } => TableStatusKind::Occupied,
            Self::Reserved { .. } => TableStatusKind::Reserved,
            Self::Cleaning => TableStatusKind::Cleaning,
            Self::OutOfOrder => TableStatusKind::OutOfOrder,
        }
    }

    /// Empty status of the given kind
    pub fn empty(kind: TableStatusKind) -> Self {
        match kind {
            TableStatusKind::Available => Self::Available,
            TableStatusKind::Occupied => Self::Occupied {
                party_size: None,
                estimated_turn_time: None,
            },
            TableStatusKind::Reserved => Self::Reserved { reservation: None },
            TableStatusKind::Cleaning => Self::Cleaning,
            TableStatusKind::OutOfOrder => Self::OutOfOrder,
        }
    }

    pub fn party_size(&self) -> Option<u32> {
        match self {
            Self::Occupied { party_size, .. } => *party_size,
            _ => None,
        }
    }

    pub fn reservation(&self) -> Option<&ReservationInfo> {
        match self {
            Self::Reserved { reservation } => reservation.as_ref(),
            _ => None,
        }
    }
}

/// Canvas coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Floor table entity (楼面桌台)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub table_number: u32,
    pub capacity: u32,
    pub shape: TableShape,
    pub status: TableStatus,
    pub position: Position,
}

impl Table {
    /// New available table
    pub fn new(
        id: impl Into<String>,
        table_number: u32,
        capacity: u32,
        shape: TableShape,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            table_number,
            capacity,
            shape,
            status: TableStatus::Available,
            position,
        }
    }

    pub fn with_status(mut self, status: TableStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status_kind(&self) -> TableStatusKind {
        self.status.kind()
    }

    /// Seated party is larger than the table
    pub fn is_over_capacity(&self) -> bool {
        self.status
            .party_size()
            .is_some_and(|size| size > self.capacity)
    }

    pub fn badge_label(&self) -> &'static str {
        self.status_kind().badge_label()
    }
}
