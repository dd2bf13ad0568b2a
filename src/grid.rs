use crate::cells::{self, Cartesian2DCoordinate, CompassPrimary, COMPASS_PRIMARIES};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

use petgraph::graph;
use petgraph::{Graph, Undirected};
use rand::Rng;
use smallvec::SmallVec;
use std::cmp;
use std::error;
use std::fmt;
use std::slice;
use std::u32;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

/// A rows × columns grid of cells where a graph edge between two adjacent
/// cells is an open passage (a removed wall).
#[derive(Debug)]
pub struct RectGrid {
    graph: Graph<(), (), Undirected, u32>,
    rows: RowsCount,
    columns: ColumnsCount,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridCreationError {
    ZeroRows,
    ZeroColumns,
    TooManyCells,
}

impl fmt::Display for GridCreationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridCreationError::ZeroRows => write!(f, "grid rows count must be at least 1"),
            GridCreationError::ZeroColumns => write!(f, "grid columns count must be at least 1"),
            GridCreationError::TooManyCells => {
                write!(f, "grid cells count exceeds the maximum cell index")
            }
        }
    }
}

impl error::Error for GridCreationError {}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

impl RectGrid {
    /// Create a grid with every wall between adjacent cells present.
    ///
    /// Fails fast on empty dimensions or on a cells count that does not fit
    /// the graph's u32 node index space.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<RectGrid, GridCreationError> {
        if rows.0 == 0 {
            return Err(GridCreationError::ZeroRows);
        }
        if columns.0 == 0 {
            return Err(GridCreationError::ZeroColumns);
        }
        let cells_count = rows.0
            .checked_mul(columns.0)
            .filter(|&count| count <= u32::MAX as usize)
            .ok_or(GridCreationError::TooManyCells)?;

        let (NodesCount(nodes), EdgesCount(edges)) = graph_size(rows, columns, cells_count);
        let mut grid = RectGrid {
            graph: Graph::with_capacity(nodes, edges),
            rows,
            columns,
        };
        for _ in 0..cells_count {
            let _ = grid.graph.add_node(());
        }

        Ok(grid)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Count of open passages in the grid.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen::<usize>() % self.size();
        Cartesian2DCoordinate::from_row_major_index(index, self.columns)
    }

    /// Open the passage between two cells.
    pub fn link(&mut self,
                a: Cartesian2DCoordinate,
                b: Cartesian2DCoordinate)
                -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        match (self.grid_coordinate_graph_index(a), self.grid_coordinate_graph_index(b)) {
            (Some(a_index), Some(b_index)) => {
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Are two cells in the grid linked by an open passage?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        if let (Some(a_index), Some(b_index)) =
            (self.grid_coordinate_graph_index(a), self.grid_coordinate_graph_index(b)) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false,
                    |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Cells linked to a particular cell by an open passage.
    /// None if the coordinate is not within the grid.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.grid_coordinate_graph_index(coord)
            .map(|graph_node_index| {
                self.graph
                    .neighbors(graph_node_index)
                    .map(|linked_node_index| {
                        Cartesian2DCoordinate::from_row_major_index(linked_node_index.index(),
                                                                    self.columns)
                    })
                    .collect()
            })
    }

    /// Cells to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        COMPASS_PRIMARIES.iter()
                         .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
                         .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        cells::offset_coordinate(coord, direction)
            .and_then(|neighbour_coord| {
                if self.is_valid_coordinate(neighbour_coord) {
                    Some(neighbour_coord)
                } else {
                    None
                }
            })
    }

    /// Is the grid coordinate within the grid's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.columns.0 && (coord.y as usize) < self.rows.0
    }

    /// Convert a grid coordinate to a row-major index in `0..self.size()`.
    /// None if the coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.columns.0 + coord.x as usize)
        } else {
            None
        }
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: self.size(),
            row_width: self.columns,
        }
    }

    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            row_width: self.columns,
        }
    }

    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: Cartesian2DCoordinate)
                                   -> Option<graph::NodeIndex<u32>> {
        self.grid_coordinate_to_index(coord).map(graph::NodeIndex::<u32>::new)
    }
}

fn graph_size(rows: RowsCount, columns: ColumnsCount, cells_count: usize) -> (NodesCount, EdgesCount) {
    // Overkill for a maze that only keeps a spanning tree, but we never want
    // the graph reallocating mid generation.
    let edges_count_hint = 4 * cells_count - 4 * cmp::max(rows.0, columns.0);
    (NodesCount(cells_count), EdgesCount(edges_count_hint))
}

/// Renders the maze walls as ASCII, one `+---+` bordered room per cell.
impl fmt::Display for RectGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let RowsCount(rows) = self.rows;
        let ColumnsCount(columns) = self.columns;

        // The northern boundary, then per grid row one room line and one
        // southern wall line. Each cell only draws its east and south sides,
        // using the previous row/column for the others.
        let mut output = String::from("+");
        for _ in 0..columns {
            output.push_str("---+");
        }
        output.push('\n');

        for y in 0..rows {
            let mut room_line = String::from("|");
            let mut wall_line = String::from("+");

            for x in 0..columns {
                let cell = Cartesian2DCoordinate::new(x as u32, y as u32);
                room_line.push_str("   ");
                room_line.push(if self.is_neighbour_linked(cell, CompassPrimary::East) {
                    ' '
                } else {
                    '|'
                });
                wall_line.push_str(if self.is_neighbour_linked(cell, CompassPrimary::South) {
                    "   "
                } else {
                    "---"
                });
                wall_line.push('+');
            }

            output.push_str(&room_line);
            output.push('\n');
            output.push_str(&wall_line);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    row_width: ColumnsCount,
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    self.row_width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        (lower_bound, Some(lower_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a RectGrid {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct LinksIter<'a> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), u32>>,
    row_width: ColumnsCount,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            let src_cell_coord = Cartesian2DCoordinate::from_row_major_index(edge.source().index(),
                                                                             self.row_width);
            let dst_cell_coord = Cartesian2DCoordinate::from_row_major_index(edge.target().index(),
                                                                             self.row_width);
            (src_cell_coord, dst_cell_coord)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a> ExactSizeIterator for LinksIter<'a> {} // default impl using size_hint()
