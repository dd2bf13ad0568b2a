use bit_set::BitSet;
use fnv::FnvHasher;
use rand::Rng;
use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, COMPASS_PRIMARIES};
use crate::grid::RectGrid;

type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;

/// Apply the recursive backtracker maze generation algorithm to a grid,
/// starting from a uniformly random cell.
///
/// The traversal walks the grid depth first: each cell entered shuffles its
/// four neighbour candidates into a fresh random order, carves a passage to
/// the first in-bounds unvisited one and descends into it, resuming the
/// remaining candidates only once that whole branch is exhausted
/// (backtracking). Every cell is visited exactly once, so the open passages
/// form a spanning tree of the grid: any two cells are connected by exactly
/// one route.
///
/// `rng` is trusted to be a conforming uniform source; a biased or
/// non-terminating one skews or hangs the shuffle.
pub fn recursive_backtracker<R: Rng>(grid: &mut RectGrid, rng: &mut R) {
    let start = grid.random_cell(rng);
    recursive_backtracker_from(grid, start, rng);
}

/// Recursive backtracker with a caller-chosen starting cell, for
/// reproducible mazes. Leaves the grid untouched if `start` is not a valid
/// coordinate.
///
/// The depth-first traversal runs on an explicit frame stack rather than
/// call recursion: the deepest unbacktracked path in a maze can reach every
/// cell of the grid, which would overflow the call stack on large grids.
/// Each frame keeps its own shuffled candidate order and a cursor into it,
/// so the visit order is identical to the recursive form.
pub fn recursive_backtracker_from<R: Rng>(grid: &mut RectGrid,
                                          start: Cartesian2DCoordinate,
                                          rng: &mut R) {
    let start_index = match grid.grid_coordinate_to_index(start) {
        Some(index) => index,
        None => return,
    };

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);
    let mut stack = vec![Frame::new(start, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.tried == frame.directions.len() {
            // Dead end or fully explored: backtrack.
            stack.pop();
            continue;
        }
        let direction = frame.directions[frame.tried];
        frame.tried += 1;
        let cell = frame.cell;

        if let Some(neighbour) = grid.neighbour_at_direction(cell, direction) {
            let neighbour_index = grid.grid_coordinate_to_index(neighbour)
                                      .expect("in-bounds neighbour has a row-major index");
            if !visited.contains(neighbour_index) {
                visited.insert(neighbour_index);
                grid.link(cell, neighbour)
                    .expect("adjacent distinct cells are always linkable");
                stack.push(Frame::new(neighbour, rng));
            }
        }
    }
}

/// Is the grid's passage graph a spanning tree over all its cells?
///
/// True when the open passage count is exactly `cells - 1` and a flood fill
/// over passages from one cell reaches every other, which together rule out
/// cycles and unreachable cells.
pub fn is_perfect_maze(grid: &RectGrid) -> bool {
    if grid.links_count() != grid.size() - 1 {
        return false;
    }

    let start = Cartesian2DCoordinate::new(0, 0);
    let mut reached: FnvHashSet<Cartesian2DCoordinate> =
        HashSet::with_capacity_and_hasher(grid.size(), BuildHasherDefault::default());
    reached.insert(start);

    let mut frontier = vec![start];
    while let Some(cell) = frontier.pop() {
        let links = grid.links(cell).expect("flood fill only reaches valid coordinates");
        for linked_cell in &*links {
            if reached.insert(*linked_cell) {
                frontier.push(*linked_cell);
            }
        }
    }

    reached.len() == grid.size()
}

struct Frame {
    cell: Cartesian2DCoordinate,
    directions: [CompassPrimary; 4],
    tried: usize,
}

impl Frame {
    fn new<R: Rng>(cell: Cartesian2DCoordinate, rng: &mut R) -> Frame {
        let mut directions = COMPASS_PRIMARIES;
        rng.shuffle(&mut directions);
        Frame {
            cell,
            directions,
            tried: 0,
        }
    }
}
