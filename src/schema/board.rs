use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::AttributeId;

/// Number of rows on the standard 6x5 board.
pub const BOARD_ROWS: usize = 5;
/// Number of columns on the standard 6x5 board.
pub const BOARD_COLUMNS: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("board occupancy needs 5 rows, got {0}")]
    RowCount(usize),
    #[error("column index {column} in row {row} is outside the board")]
    ColumnOutOfRange { row: usize, column: u8 },
}

/// Which cells of the board a positional effect touches.
///
/// Each row is kept sorted and free of duplicates, so two occupancies
/// describing the same cells always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct GridOccupancy {
    rows: [Vec<u8>; BOARD_ROWS],
}

impl GridOccupancy {
    /// Build an occupancy from per-row column lists.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, SchemaError> {
        if rows.len() != BOARD_ROWS {
            return Err(SchemaError::RowCount(rows.len()));
        }
        let mut out: [Vec<u8>; BOARD_ROWS] = Default::default();
        for (row_idx, (slot, mut row)) in out.iter_mut().zip(rows).enumerate() {
            if let Some(&column) = row.iter().find(|&&c| c as usize >= BOARD_COLUMNS) {
                return Err(SchemaError::ColumnOutOfRange {
                    row: row_idx,
                    column,
                });
            }
            row.sort_unstable();
            row.dedup();
            *slot = row;
        }
        Ok(Self { rows: out })
    }

    pub fn empty() -> Self {
        Self {
            rows: Default::default(),
        }
    }

    pub fn rows(&self) -> &[Vec<u8>; BOARD_ROWS] {
        &self.rows
    }

    /// Total number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Owned copy of the rows for callers that need to mutate them.
    pub fn to_scratch(&self) -> [Vec<u8>; BOARD_ROWS] {
        self.rows.clone()
    }
}

impl TryFrom<Vec<Vec<u8>>> for GridOccupancy {
    type Error = SchemaError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<GridOccupancy> for Vec<Vec<u8>> {
    fn from(grid: GridOccupancy) -> Self {
        grid.rows.into_iter().collect()
    }
}

/// One row or column of a row/column change effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChange {
    /// Row index (0 = top) or column index (0 = left).
    pub index: u8,
    /// Orb attributes the line turns into.
    pub attributes: Vec<AttributeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_sorted_and_deduplicated() {
        let grid = GridOccupancy::new(vec![vec![5, 0, 5], vec![], vec![3, 1], vec![], vec![]]).unwrap();
        assert_eq!(grid.rows()[0], vec![0, 5]);
        assert_eq!(grid.rows()[2], vec![1, 3]);
        assert_eq!(grid.cell_count(), 4);
    }

    #[test]
    fn wrong_row_count_rejected() {
        let err = GridOccupancy::new(vec![vec![0]; 4]).unwrap_err();
        assert_eq!(err, SchemaError::RowCount(4));
    }

    #[test]
    fn column_out_of_range_rejected() {
        let err = GridOccupancy::new(vec![vec![], vec![6], vec![], vec![], vec![]]).unwrap_err();
        assert_eq!(err, SchemaError::ColumnOutOfRange { row: 1, column: 6 });
    }

    #[test]
    fn deserializes_from_nested_lists() {
        let grid: GridOccupancy = ron::from_str("[[0, 5], [], [], [], [0, 5]]").unwrap();
        assert_eq!(grid.cell_count(), 4);

        let bad: Result<GridOccupancy, _> = ron::from_str("[[0], [1]]");
        assert!(bad.is_err());
    }

    #[test]
    fn empty_grid() {
        let grid = GridOccupancy::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.cell_count(), 0);
    }
}
