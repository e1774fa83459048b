use std::fmt::{self, Display};

use gridmark_core::Cell;

use crate::Mode;

/// Settings of a puzzle session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PuzzleSettings {
    /// Size of the drawn grid. Cells outside it cannot be selected.
    pub grid: GridSize,
    /// Mode active when the session starts or is reset.
    pub initial_mode: Mode,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            initial_mode: Mode::Normal,
        }
    }
}

/// Number of columns and rows of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    /// Number of columns.
    pub columns: u16,
    /// Number of rows.
    pub rows: u16,
}

impl GridSize {
    /// Creates a grid size.
    #[must_use]
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Returns `true` if `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        cell.col() < self.columns && cell.row() < self.rows
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(9, 9)
    }
}

impl Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_contains() {
        let grid = GridSize::default();
        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(8, 8)));
        assert!(!grid.contains(Cell::new(9, 0)));
        assert!(!grid.contains(Cell::new(0, 9)));
        assert!(!GridSize::new(0, 0).contains(Cell::new(0, 0)));
        assert_eq!(GridSize::new(16, 12).to_string(), "16x12");
    }
}
