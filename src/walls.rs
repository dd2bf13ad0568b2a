use bit_set::BitSet;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::RectGrid;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// The wall-connectivity structure of a generated maze.
///
/// Two bitsets record which walls between adjacent cells have been removed:
/// the vertical wall right of cell `(row, column)` for `column < columns - 1`
/// and the horizontal wall below cell `(row, column)` for `row < rows - 1`.
/// A set bit means the passage is open. The outer boundary of the grid has no
/// entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallOpenings {
    vertical: BitSet,
    horizontal: BitSet,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl WallOpenings {
    /// Capture the open passages of a grid as wall state.
    ///
    /// Each cell contributes its East and South sides only, which covers
    /// every interior wall exactly once.
    pub fn from_grid(grid: &RectGrid) -> WallOpenings {
        let RowsCount(rows) = grid.rows();
        let ColumnsCount(columns) = grid.columns();

        let mut vertical = BitSet::with_capacity(rows * columns.saturating_sub(1));
        let mut horizontal = BitSet::with_capacity(rows.saturating_sub(1) * columns);

        for cell in grid.iter() {
            if grid.is_neighbour_linked(cell, CompassPrimary::East) {
                vertical.insert(vertical_bit_index(cell, columns));
            }
            if grid.is_neighbour_linked(cell, CompassPrimary::South) {
                horizontal.insert(horizontal_bit_index(cell, columns));
            }
        }

        WallOpenings {
            vertical,
            horizontal,
            rows: grid.rows(),
            columns: grid.columns(),
        }
    }

    /// Is the wall between `(row, column)` and `(row, column + 1)` removed?
    ///
    /// Positions without a wall entry (outside the grid, or the boundary
    /// column) report closed.
    pub fn is_vertical_open(&self, row: RowIndex, column: ColumnIndex) -> bool {
        let (RowIndex(y), ColumnIndex(x)) = (row, column);
        if y < self.rows.0 && x + 1 < self.columns.0 {
            self.vertical.contains(y * (self.columns.0 - 1) + x)
        } else {
            false
        }
    }

    /// Is the wall between `(row, column)` and `(row + 1, column)` removed?
    pub fn is_horizontal_open(&self, row: RowIndex, column: ColumnIndex) -> bool {
        let (RowIndex(y), ColumnIndex(x)) = (row, column);
        if y + 1 < self.rows.0 && x < self.columns.0 {
            self.horizontal.contains(y * self.columns.0 + x)
        } else {
            false
        }
    }

    /// Total count of open passages over both wall sets.
    pub fn open_passages_count(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }
}

fn vertical_bit_index(cell: Cartesian2DCoordinate, columns: usize) -> usize {
    cell.y as usize * (columns - 1) + cell.x as usize
}

fn horizontal_bit_index(cell: Cartesian2DCoordinate, columns: usize) -> usize {
    cell.y as usize * columns + cell.x as usize
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grid::RectGrid;
    use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

    fn rect_grid(rows: usize, columns: usize) -> RectGrid {
        RectGrid::new(RowsCount(rows), ColumnsCount(columns)).expect("valid test dimensions")
    }

    #[test]
    fn all_walls_present_on_fresh_grid() {
        let walls = WallOpenings::from_grid(&rect_grid(3, 4));
        assert_eq!(walls.open_passages_count(), 0);
        for y in 0..3 {
            for x in 0..4 {
                assert!(!walls.is_vertical_open(RowIndex(y), ColumnIndex(x)));
                assert!(!walls.is_horizontal_open(RowIndex(y), ColumnIndex(x)));
            }
        }
    }

    #[test]
    fn linked_cells_open_their_shared_wall() {
        let mut g = rect_grid(2, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(1, 0), gc(1, 1)).expect("link failed");
        g.link(gc(1, 1), gc(2, 1)).expect("link failed");

        let walls = WallOpenings::from_grid(&g);
        assert!(walls.is_vertical_open(RowIndex(0), ColumnIndex(0)));
        assert!(walls.is_horizontal_open(RowIndex(0), ColumnIndex(1)));
        assert!(walls.is_vertical_open(RowIndex(1), ColumnIndex(1)));
        assert_eq!(walls.open_passages_count(), 3);

        // Unrelated walls stay closed
        assert!(!walls.is_vertical_open(RowIndex(0), ColumnIndex(1)));
        assert!(!walls.is_vertical_open(RowIndex(1), ColumnIndex(0)));
        assert!(!walls.is_horizontal_open(RowIndex(0), ColumnIndex(0)));
        assert!(!walls.is_horizontal_open(RowIndex(0), ColumnIndex(2)));
    }

    #[test]
    fn out_of_range_queries_report_closed() {
        let mut g = rect_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(0, 0), gc(0, 1)).expect("link failed");
        g.link(gc(1, 0), gc(1, 1)).expect("link failed");
        let walls = WallOpenings::from_grid(&g);

        // The boundary column/row has no wall entry, whatever the links say.
        assert!(!walls.is_vertical_open(RowIndex(0), ColumnIndex(1)));
        assert!(!walls.is_horizontal_open(RowIndex(1), ColumnIndex(0)));
        assert!(!walls.is_vertical_open(RowIndex(5), ColumnIndex(0)));
        assert!(!walls.is_horizontal_open(RowIndex(0), ColumnIndex(5)));
    }

    #[test]
    fn single_cell_grid_has_no_wall_entries() {
        let walls = WallOpenings::from_grid(&rect_grid(1, 1));
        assert_eq!(walls.open_passages_count(), 0);
        assert!(!walls.is_vertical_open(RowIndex(0), ColumnIndex(0)));
        assert!(!walls.is_horizontal_open(RowIndex(0), ColumnIndex(0)));
    }
}
