//! Built-in layout shown when a floor has nothing saved yet

use shared::models::{Position, ReservationInfo, Table, TableShape, TableStatus};

/// Five tables, capacities 2/4/6/2/8
pub fn default_layout() -> Vec<Table> {
    vec![
        Table::new("table-1", 1, 2, TableShape::Square, Position::new(100.0, 100.0)),
        Table::new("table-2", 2, 4, TableShape::Round, Position::new(250.0, 100.0)).with_status(
            TableStatus::Occupied {
                party_size: Some(3),
                estimated_turn_time: Some("45 min".to_string()),
            },
        ),
        Table::new("table-3", 3, 6, TableShape::Rectangle, Position::new(400.0, 100.0))
            .with_status(TableStatus::Reserved {
                reservation: Some(ReservationInfo {
                    customer_name: "Johnson".to_string(),
                    time: "7:30 PM".to_string(),
                    party_size: 5,
                }),
            }),
        Table::new("table-4", 4, 2, TableShape::Square, Position::new(100.0, 250.0))
            .with_status(TableStatus::Cleaning),
        Table::new("table-5", 5, 8, TableShape::Rectangle, Position::new(250.0, 250.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::FloorStatistics;

    #[test]
    fn test_default_layout_totals() {
        let tables = default_layout();
        let stats = FloorStatistics::compute(&tables);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.total_capacity, 22);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.reserved, 1);
        assert_eq!(stats.cleaning, 1);
        assert_eq!(stats.available, 2);
    }

    #[test]
    fn test_default_positions_on_grid() {
        for table in default_layout() {
            assert_eq!(table.position.x % 10.0, 0.0);
            assert_eq!(table.position.y % 10.0, 0.0);
        }
    }
}
