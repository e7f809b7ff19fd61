//! Grid snapping for dragged table positions

use shared::models::Position;

/// Default snapping unit
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// Rounds canvas coordinates to the nearest multiple of `size`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    size: f64,
}

impl Grid {
    /// Non-positive or non-finite sizes fall back to [`DEFAULT_GRID_SIZE`]
    pub fn new(size: f64) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size
        } else {
            DEFAULT_GRID_SIZE
        };
        Self { size }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn snap_value(&self, value: f64) -> f64 {
        (value / self.size).round() * self.size
    }

    pub fn snap(&self, position: Position) -> Position {
        Position::new(self.snap_value(position.x), self.snap_value(position.y))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_nearest_multiple() {
        let grid = Grid::default();
        assert_eq!(grid.snap(Position::new(17.0, 23.0)), Position::new(20.0, 20.0));
        assert_eq!(grid.snap(Position::new(4.9, 5.0)), Position::new(0.0, 10.0));
        assert_eq!(grid.snap(Position::new(-7.0, 0.0)), Position::new(-10.0, 0.0));
    }

    #[test]
    fn test_custom_grid() {
        let grid = Grid::new(25.0);
        assert_eq!(grid.snap(Position::new(30.0, 40.0)), Position::new(25.0, 50.0));
    }

    #[test]
    fn test_invalid_size_falls_back() {
        assert_eq!(Grid::new(0.0).size(), DEFAULT_GRID_SIZE);
        assert_eq!(Grid::new(-5.0).size(), DEFAULT_GRID_SIZE);
        assert_eq!(Grid::new(f64::NAN).size(), DEFAULT_GRID_SIZE);
    }
}
