//! Shared types for the floor-plan service
//!
//! Table/layout models and the unified error system, used by the server
//! and by any client that speaks the layout JSON format.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    FloorLayout, FloorStatistics, Position, ReservationInfo, Table, TableRecord, TableShape,
    TableStatus, TableStatusKind,
};
