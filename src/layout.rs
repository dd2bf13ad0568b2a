use itertools::Itertools;
use serde_derive::Serialize;
use std::error;
use std::fmt;

use crate::units::{CellSize, ColumnIndex, ColumnsCount, RowIndex, RowsCount};
use crate::walls::WallOpenings;

/// Tag carried by every body descriptor so the consuming engine can wire up
/// collision handling by kind.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyKind {
    Wall,
    Goal,
    BallStart,
}

/// An axis-aligned rectangle, positioned by its centre.
#[derive(PartialEq, Copy, Clone, Debug, Serialize)]
pub struct RectBody {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: BodyKind,
}

#[derive(PartialEq, Copy, Clone, Debug, Serialize)]
pub struct PointBody {
    pub x: f64,
    pub y: f64,
    pub kind: BodyKind,
}

/// Obstacle placements for one maze, in a single coordinate space spanning
/// `columns * cell_size` by `rows * cell_size`.
#[derive(PartialEq, Clone, Debug, Serialize)]
pub struct MazeLayout {
    pub field_width: f64,
    pub field_height: f64,
    pub walls: Vec<RectBody>,
    pub goal: PointBody,
    pub ball_start: PointBody,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct LayoutOptions {
    cell_size: CellSize,
    wall_thickness: f64,
    border_thickness: f64,
    include_border: bool,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct LayoutOptionsBuilder {
    options: LayoutOptions,
}

impl LayoutOptionsBuilder {
    pub fn new(cell_size: CellSize) -> LayoutOptionsBuilder {
        LayoutOptionsBuilder {
            options: LayoutOptions {
                cell_size,
                wall_thickness: 1.0,
                border_thickness: 2.0,
                include_border: true,
            },
        }
    }

    pub fn wall_thickness(mut self, thickness: f64) -> LayoutOptionsBuilder {
        self.options.wall_thickness = thickness;
        self
    }

    pub fn border_thickness(mut self, thickness: f64) -> LayoutOptionsBuilder {
        self.options.border_thickness = thickness;
        self
    }

    pub fn include_border(mut self, include: bool) -> LayoutOptionsBuilder {
        self.options.include_border = include;
        self
    }

    pub fn build(self) -> LayoutOptions {
        self.options
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum LayoutError {
    NonPositiveCellSize(f64),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LayoutError::NonPositiveCellSize(size) => {
                write!(f, "cell size must be a positive number, got {}", size)
            }
        }
    }
}

impl error::Error for LayoutError {}

/// Translate a maze's wall state into engine-ready body descriptors.
///
/// Every CLOSED wall entry becomes one thin rectangle centred on the shared
/// boundary of its two cells; open entries emit nothing. The ball starts at
/// the centre of the top-left cell and the goal sits at the centre of the
/// bottom-right cell. Does not mutate the wall state.
pub fn build_layout(walls: &WallOpenings,
                    options: &LayoutOptions)
                    -> Result<MazeLayout, LayoutError> {
    let CellSize(cell) = options.cell_size;
    if !(cell > 0.0) {
        return Err(LayoutError::NonPositiveCellSize(cell));
    }

    let RowsCount(rows) = walls.rows();
    let ColumnsCount(columns) = walls.columns();
    let field_width = columns as f64 * cell;
    let field_height = rows as f64 * cell;

    let mut wall_bodies = Vec::new();
    if options.include_border {
        wall_bodies.extend(border_walls(field_width, field_height, options.border_thickness));
    }

    // Horizontal walls span a cell width and sit on the boundary below
    // their cell; vertical walls span a cell height and sit on the boundary
    // to the right of theirs.
    let closed_horizontals = (0..rows.saturating_sub(1))
        .cartesian_product(0..columns)
        .filter(|&(row, column)| !walls.is_horizontal_open(RowIndex(row), ColumnIndex(column)));
    for (row, column) in closed_horizontals {
        wall_bodies.push(RectBody {
            x: column as f64 * cell + cell / 2.0,
            y: row as f64 * cell + cell,
            width: cell,
            height: options.wall_thickness,
            kind: BodyKind::Wall,
        });
    }

    let closed_verticals = (0..rows)
        .cartesian_product(0..columns.saturating_sub(1))
        .filter(|&(row, column)| !walls.is_vertical_open(RowIndex(row), ColumnIndex(column)));
    for (row, column) in closed_verticals {
        wall_bodies.push(RectBody {
            x: column as f64 * cell + cell,
            y: row as f64 * cell + cell / 2.0,
            width: options.wall_thickness,
            height: cell,
            kind: BodyKind::Wall,
        });
    }

    Ok(MazeLayout {
        field_width,
        field_height,
        walls: wall_bodies,
        goal: PointBody {
            x: field_width - cell / 2.0,
            y: field_height - cell / 2.0,
            kind: BodyKind::Goal,
        },
        ball_start: PointBody {
            x: cell / 2.0,
            y: cell / 2.0,
            kind: BodyKind::BallStart,
        },
    })
}

/// The four static rectangles boxing in the playing field: top, right,
/// bottom, left.
fn border_walls(field_width: f64, field_height: f64, thickness: f64) -> Vec<RectBody> {
    let wall = |x, y, width, height| {
        RectBody {
            x,
            y,
            width,
            height,
            kind: BodyKind::Wall,
        }
    };
    vec![wall(field_width / 2.0, 0.0, field_width, thickness),
         wall(field_width, field_height / 2.0, thickness, field_height),
         wall(field_width / 2.0, field_height, field_width, thickness),
         wall(0.0, field_height / 2.0, thickness, field_height)]
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::Cartesian2DCoordinate;
    use crate::generators::recursive_backtracker;
    use crate::grid::RectGrid;
    use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};
    use quickcheck::{quickcheck, TestResult};
    use rand;

    /// The corridor maze (0,0)-(1,0)-(1,1)-(0,1): every wall open except the
    /// horizontal one under the top-left cell.
    fn corridor_walls_2x2() -> WallOpenings {
        let mut g = RectGrid::new(RowsCount(2), ColumnsCount(2)).expect("valid test dimensions");
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.link(gc(0, 0), gc(1, 0)).expect("link failed");
        g.link(gc(1, 0), gc(1, 1)).expect("link failed");
        g.link(gc(1, 1), gc(0, 1)).expect("link failed");
        WallOpenings::from_grid(&g)
    }

    fn layout_options(cell_size: f64, include_border: bool) -> LayoutOptions {
        LayoutOptionsBuilder::new(CellSize(cell_size))
            .include_border(include_border)
            .build()
    }

    #[test]
    fn one_rectangle_per_closed_wall() {
        let layout = build_layout(&corridor_walls_2x2(), &layout_options(10.0, false))
            .expect("layout failed");

        assert_eq!(layout.walls,
                   vec![RectBody {
                            x: 5.0,
                            y: 10.0,
                            width: 10.0,
                            height: 1.0,
                            kind: BodyKind::Wall,
                        }]);
        assert_eq!(layout.field_width, 20.0);
        assert_eq!(layout.field_height, 20.0);
    }

    #[test]
    fn border_rectangles_box_in_the_field() {
        let layout = build_layout(&corridor_walls_2x2(), &layout_options(10.0, true))
            .expect("layout failed");

        // Top, right, bottom, left borders then the single inner wall.
        assert_eq!(layout.walls.len(), 5);
        let border = &layout.walls[..4];
        assert_eq!(border[0], RectBody { x: 10.0, y: 0.0, width: 20.0, height: 2.0, kind: BodyKind::Wall });
        assert_eq!(border[1], RectBody { x: 20.0, y: 10.0, width: 2.0, height: 20.0, kind: BodyKind::Wall });
        assert_eq!(border[2], RectBody { x: 10.0, y: 20.0, width: 20.0, height: 2.0, kind: BodyKind::Wall });
        assert_eq!(border[3], RectBody { x: 0.0, y: 10.0, width: 2.0, height: 20.0, kind: BodyKind::Wall });
    }

    #[test]
    fn ball_and_goal_sit_in_opposite_corner_cells() {
        let layout = build_layout(&corridor_walls_2x2(), &layout_options(10.0, false))
            .expect("layout failed");

        assert_eq!(layout.ball_start,
                   PointBody { x: 5.0, y: 5.0, kind: BodyKind::BallStart });
        assert_eq!(layout.goal,
                   PointBody { x: 15.0, y: 15.0, kind: BodyKind::Goal });
    }

    #[test]
    fn non_positive_cell_size_rejected() {
        let walls = corridor_walls_2x2();
        assert_eq!(build_layout(&walls, &layout_options(0.0, false)).err(),
                   Some(LayoutError::NonPositiveCellSize(0.0)));
        assert_eq!(build_layout(&walls, &layout_options(-3.5, false)).err(),
                   Some(LayoutError::NonPositiveCellSize(-3.5)));
    }

    #[test]
    fn single_cell_layout_is_just_borders_ball_and_goal() {
        let g = RectGrid::new(RowsCount(1), ColumnsCount(1)).expect("valid test dimensions");
        let walls = WallOpenings::from_grid(&g);
        let layout = build_layout(&walls, &layout_options(8.0, true)).expect("layout failed");

        assert_eq!(layout.walls.len(), 4); // borders only, no inner walls
        assert_eq!(layout.ball_start.x, 4.0);
        assert_eq!(layout.goal.x, 4.0);
        assert_eq!(layout.ball_start.y, layout.goal.y);
    }

    #[test]
    fn every_emitted_wall_is_a_closed_entry() {
        fn prop(rows: u8, columns: u8) -> TestResult {
            // Fold the arbitrary bytes into workable grid dimensions.
            let rows = rows as usize % 8 + 1;
            let columns = columns as usize % 8 + 1;
            let mut g = RectGrid::new(RowsCount(rows), ColumnsCount(columns))
                .expect("valid dimensions");
            let mut rng = rand::weak_rng();
            recursive_backtracker(&mut g, &mut rng);
            let walls = WallOpenings::from_grid(&g);

            let cell = 10.0;
            let layout = build_layout(&walls, &layout_options(cell, false))
                .expect("layout failed");

            // One rectangle for each closed interior wall entry.
            let interior_walls = rows * (columns - 1) + (rows - 1) * columns;
            let expected_closed = interior_walls - walls.open_passages_count();
            if layout.walls.len() != expected_closed {
                return TestResult::failed();
            }

            // Each rectangle maps back onto a closed entry centred on the
            // boundary between its two cells.
            for body in &layout.walls {
                let ok = if body.height == cell {
                    let row = (body.y / cell - 0.5).round() as usize;
                    let column = (body.x / cell).round() as usize - 1;
                    (body.x / cell).fract() == 0.0 &&
                    !walls.is_vertical_open(RowIndex(row), ColumnIndex(column))
                } else {
                    let row = (body.y / cell).round() as usize - 1;
                    let column = (body.x / cell - 0.5).round() as usize;
                    (body.y / cell).fract() == 0.0 &&
                    !walls.is_horizontal_open(RowIndex(row), ColumnIndex(column))
                };
                if !ok {
                    return TestResult::failed();
                }
            }
            TestResult::passed()
        }
        quickcheck(prop as fn(u8, u8) -> TestResult);
    }

    #[test]
    fn descriptor_kinds_serialize_to_engine_tags() {
        let layout = build_layout(&corridor_walls_2x2(), &layout_options(10.0, true))
            .expect("layout failed");
        let doc = serde_json::to_value(&layout).expect("serializable layout");

        assert_eq!(doc["walls"][0]["kind"], "wall");
        assert_eq!(doc["goal"]["kind"], "goal");
        assert_eq!(doc["ball_start"]["kind"], "ball-start");
        assert_eq!(doc["field_width"], 20.0);
    }
}
