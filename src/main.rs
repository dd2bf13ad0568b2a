use docopt::Docopt;
use mazeball::{
    generators,
    grid::RectGrid,
    layout::{self, LayoutOptionsBuilder},
    units::{CellSize, ColumnsCount, RowsCount},
    walls::WallOpenings,
};
use rand::{SeedableRng, XorShiftRng};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Mazeball

Usage:
    mazeball_driver -h | --help
    mazeball_driver [--rows=<r> --columns=<c>] [--seed=<n>] [--text-out=<path>] [--layout-out=<path> --cell-size=<n> --no-border]

Options:
    -h --help            Show this screen.
    --rows=<r>           Maze grid rows count [default: 12].
    --columns=<c>        Maze grid columns count [default: 16].
    --seed=<n>           Seed the maze generator for a reproducible maze.
    --text-out=<path>    Write the textual maze rendering to a file instead of stdout.
    --layout-out=<path>  Write the physics layout (walls, goal, ball start) to a JSON file.
    --cell-size=<n>      Side length of one maze cell in layout units [default: 40].
    --no-border          Leave out the four boundary walls around the maze field.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_rows: usize,
    flag_columns: usize,
    flag_seed: Option<u32>,
    flag_text_out: String,
    flag_layout_out: String,
    flag_cell_size: f64,
    flag_no_border: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            LayoutEncoding(::serde_json::Error);
            GridCreation(::mazeball::grid::GridCreationError);
            Layout(::mazeball::layout::LayoutError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let mut maze_grid = RectGrid::new(RowsCount(args.flag_rows),
                                      ColumnsCount(args.flag_columns))?;
    let mut rng = seeded_rng(args.flag_seed);
    generators::recursive_backtracker(&mut maze_grid, &mut rng);

    if args.flag_text_out.is_empty() {
        println!("{}", maze_grid);
    } else {
        write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_layout_out.is_empty() {
        // The engine consuming this document owns the physics bodies, the
        // simulation loop, input and the ball/goal win transition; the
        // driver only hands over geometry.
        let wall_openings = WallOpenings::from_grid(&maze_grid);
        let options = LayoutOptionsBuilder::new(CellSize(args.flag_cell_size))
            .include_border(!args.flag_no_border)
            .build();
        let maze_layout = layout::build_layout(&wall_openings, &options)?;

        let document = serde_json::to_string_pretty(&maze_layout)?;
        write_text_to_file(&document, &args.flag_layout_out)
            .chain_err(|| format!("Failed to write maze layout to {}", args.flag_layout_out))?;
    }

    Ok(())
}

fn seeded_rng(seed_arg: Option<u32>) -> XorShiftRng {
    match seed_arg {
        // XorShiftRng rejects an all-zero seed; the low bit keeps the first
        // word non-zero whatever the argument.
        Some(seed) => {
            XorShiftRng::from_seed([seed | 1,
                                    seed ^ 0x9E37_79B9,
                                    seed.wrapping_add(0x243F_6A88),
                                    0xB7E1_5162])
        }
        None => rand::weak_rng(),
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
