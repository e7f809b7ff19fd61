//! Floor statistics
//!
//! Derived view over a floor's tables, recomputed on demand.

use serde::{Deserialize, Serialize};

use super::floor_table::{Table, TableStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorStatistics {
    pub total: usize,
    pub total_capacity: u32,
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
    pub cleaning: usize,
    pub out_of_order: usize,
    /// Sum of party sizes at occupied tables
    pub seated_guests: u32,
    /// Occupied tables whose party exceeds capacity
    pub over_capacity: usize,
}

impl FloorStatistics {
    pub fn compute(tables: &[Table]) -> Self {
        let mut stats = Self {
            total: tables.len(),
            ..Self::default()
        };

        for table in tables {
            stats.total_capacity = stats.total_capacity.saturating_add(table.capacity);
            match &table.status {
                TableStatus::Available => stats.available += 1,
                TableStatus::Occupied { party_size, .. } => {
                    stats.occupied += 1;
                    stats.seated_guests =
                        stats.seated_guests.saturating_add(party_size.unwrap_or(0));
                }
                TableStatus::Reserved { .. } => stats.reserved += 1,
                TableStatus::Cleaning => stats.cleaning += 1,
                TableStatus::OutOfOrder => stats.out_of_order += 1,
            }
            if table.is_over_capacity() {
                stats.over_capacity += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::floor_table::{Position, TableShape, TableStatusKind};

    fn table(capacity: u32, kind: TableStatusKind) -> Table {
        Table::new("x", 1, capacity, TableShape::Square, Position::default())
            .with_status(TableStatus::empty(kind))
    }

    #[test]
    fn test_huge_capacities_saturate() {
        let tables = vec![
            table(u32::MAX, TableStatusKind::Available),
            table(u32::MAX, TableStatusKind::Available),
        ];
        assert_eq!(FloorStatistics::compute(&tables).total_capacity, u32::MAX);
    }

    #[test]
    fn test_empty_floor() {
        assert_eq!(FloorStatistics::compute(&[]), FloorStatistics::default());
    }

    #[test]
    fn test_counts_by_status() {
        let tables = vec![
            table(2, TableStatusKind::Available),
            table(4, TableStatusKind::Available),
            table(6, TableStatusKind::Reserved),
            table(2, TableStatusKind::Cleaning),
            table(8, TableStatusKind::OutOfOrder),
            table(4, TableStatusKind::Occupied),
        ];
        let stats = FloorStatistics::compute(&tables);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.total_capacity, 26);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.reserved, 1);
        assert_eq!(stats.cleaning, 1);
        assert_eq!(stats.out_of_order, 1);
    }

    #[test]
    fn test_seated_guests_and_over_capacity() {
        let tables = vec![
            table(2, TableStatusKind::Available).with_status(TableStatus::Occupied {
                party_size: Some(3),
                estimated_turn_time: None,
            }),
            table(4, TableStatusKind::Available).with_status(TableStatus::Occupied {
                party_size: Some(2),
                estimated_turn_time: None,
            }),
        ];
        let stats = FloorStatistics::compute(&tables);
        assert_eq!(stats.seated_guests, 5);
        assert_eq!(stats.over_capacity, 1);
    }
}
