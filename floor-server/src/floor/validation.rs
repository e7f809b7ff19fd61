//! Table validation
//!
//! Runs between coerced form input and the committed table. A candidate that
//! fails any rule is rejected as a whole and the committed table is untouched.

use serde::Serialize;
use shared::models::{Table, TableStatus};
use thiserror::Error;

// ── Limits ──────────────────────────────────────────────────────────

/// Largest single table we accept (banquet rounds top out well below this)
pub const MAX_CAPACITY: u32 = 50;

/// Reservation customer names
pub const MAX_NAME_LEN: usize = 200;

/// Short display strings: reservation time, turn time
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("table number must be at least 1")]
    TableNumber,

    #[error("capacity must be between 1 and {max}")]
    Capacity { max: u32 },

    #[error("party size must be at least 1")]
    PartySize,

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong {
        #[serde(rename = "name")]
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("reservation customer name must not be empty")]
    CustomerName,
}

impl ValidationError {
    /// Field the rule applies to, for API details
    pub fn field(&self) -> &'static str {
        match self {
            Self::TableNumber => "tableNumber",
            Self::Capacity { .. } => "capacity",
            Self::PartySize => "partySize",
            Self::TooLong { field, .. } => field,
            Self::CustomerName => "customerName",
        }
    }
}

fn check_len(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.push(ValidationError::TooLong { field, len, max });
    }
}

/// All failed rules on one line, for logs and error messages
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a candidate table, handing it back unchanged when every rule passes.
///
/// Over-capacity parties are allowed; [`Table::is_over_capacity`] flags them.
pub fn validate(table: Table) -> Result<Table, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if table.table_number == 0 {
        errors.push(ValidationError::TableNumber);
    }
    if table.capacity == 0 || table.capacity > MAX_CAPACITY {
        errors.push(ValidationError::Capacity { max: MAX_CAPACITY });
    }

    match &table.status {
        TableStatus::Occupied {
            party_size,
            estimated_turn_time,
        } => {
            if *party_size == Some(0) {
                errors.push(ValidationError::PartySize);
            }
            if let Some(turn_time) = estimated_turn_time {
                check_len(&mut errors, "estimatedTurnTime", turn_time, MAX_SHORT_TEXT_LEN);
            }
        }
        TableStatus::Reserved {
            reservation: Some(info),
        } => {
            if info.customer_name.trim().is_empty() {
                errors.push(ValidationError::CustomerName);
            }
            check_len(&mut errors, "customerName", &info.customer_name, MAX_NAME_LEN);
            check_len(&mut errors, "time", &info.time, MAX_SHORT_TEXT_LEN);
            if info.party_size == 0 {
                errors.push(ValidationError::PartySize);
            }
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(table)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Position, ReservationInfo, TableShape};

    fn table() -> Table {
        Table::new("t", 1, 4, TableShape::Square, Position::default())
    }

    #[test]
    fn test_valid_table_passes_through() {
        let t = table();
        assert_eq!(validate(t.clone()), Ok(t));
    }

    #[test]
    fn test_zero_number_and_capacity() {
        let mut t = table();
        t.table_number = 0;
        t.capacity = 0;
        let errors = validate(t).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::TableNumber,
                ValidationError::Capacity { max: MAX_CAPACITY }
            ]
        );
    }

    #[test]
    fn test_capacity_upper_bound() {
        let mut t = table();
        t.capacity = MAX_CAPACITY + 1;
        assert!(validate(t).is_err());
    }

    #[test]
    fn test_over_capacity_party_is_allowed() {
        let t = table().with_status(TableStatus::Occupied {
            party_size: Some(9),
            estimated_turn_time: None,
        });
        assert!(validate(t).is_ok());
    }

    #[test]
    fn test_zero_party_rejected() {
        let t = table().with_status(TableStatus::Occupied {
            party_size: Some(0),
            estimated_turn_time: None,
        });
        assert_eq!(validate(t).unwrap_err(), vec![ValidationError::PartySize]);
    }

    #[test]
    fn test_reservation_rules() {
        let t = table().with_status(TableStatus::Reserved {
            reservation: Some(ReservationInfo {
                customer_name: "  ".into(),
                time: "x".repeat(MAX_SHORT_TEXT_LEN + 1),
                party_size: 2,
            }),
        });
        let errors = validate(t).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], ValidationError::CustomerName);
        assert_eq!(errors[1].field(), "time");
    }

    #[test]
    fn test_error_serializes_with_field_tag() {
        let json = serde_json::to_value(ValidationError::TableNumber).unwrap();
        assert_eq!(json["field"], "tableNumber");
    }
}
