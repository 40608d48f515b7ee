use crate::{
    config::{Difficulty, Mode},
    error::Error,
};
use anyhow::{Context, Result};
use structopt::StructOpt;

mod board;
mod config;
mod error;
mod events;
mod flags;
mod game;
mod geometry;
mod layout;
mod lifecycle;
mod minefield;
mod surface;
mod tile;
mod timer;
mod ui;

fn parse_nonzero_u16(src: &str) -> Result<u16, Error> {
    let value = src
        .parse::<u16>()
        .map_err(|e| Error::ParseNum(e, src.to_owned()))?;
    if value == 0 {
        return Err(Error::GetNonZeroValue);
    }
    Ok(value)
}

fn parse_nonzero_usize(src: &str) -> Result<usize, Error> {
    let value = src
        .parse::<usize>()
        .map_err(|e| Error::ParseNum(e, src.to_owned()))?;
    if value == 0 {
        return Err(Error::GetNonZeroValue);
    }
    Ok(value)
}

#[derive(Debug, structopt::StructOpt)]
struct Opt {
    /// Difficulty preset: `b`eginner (9x9, 10 mines), `i`ntermediate
    /// (16x16, 40 mines) or `e`xpert (16x30, 99 mines).
    #[structopt(default_value = "expert", parse(from_str = Mode::parse))]
    mode: Mode,

    /// Override the number of rows of the preset.
    #[structopt(short, long, parse(try_from_str = parse_nonzero_usize))]
    rows: Option<usize>,

    /// Override the number of columns of the preset.
    #[structopt(short, long, parse(try_from_str = parse_nonzero_usize))]
    columns: Option<usize>,

    /// Override the number of mines of the preset. There must be at least
    /// one cell without a mine.
    #[structopt(short = "-n", long, parse(try_from_str = parse_nonzero_usize))]
    mines: Option<usize>,

    /// The width of each cell.
    #[structopt(
        short = "-w",
        long,
        default_value = "5",
        parse(try_from_str = parse_nonzero_u16)
    )]
    cell_width: u16,

    /// The height of each cell.
    #[structopt(
        short = "-H",
        long,
        default_value = "3",
        parse(try_from_str = parse_nonzero_u16)
    )]
    cell_height: u16,

    /// Seed for the mine layouts, for replaying the same sequence of boards.
    #[structopt(long)]
    seed: Option<u64>,
}

impl Opt {
    fn difficulty(&self) -> Result<Difficulty, Error> {
        let preset = self.mode.difficulty();
        Difficulty::new(
            self.rows.unwrap_or(preset.rows()),
            self.columns.unwrap_or(preset.columns()),
            self.mines.unwrap_or(preset.mines()),
        )
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::from_args();
    let difficulty = opt.difficulty().context("invalid board")?;

    ui::Ui::builder()
        .mode(opt.mode)
        .difficulty(difficulty)
        .cell_width(opt.cell_width)
        .cell_height(opt.cell_height)
        .seed(opt.seed)
        .build()
        .run()
        .context("sweep failed")
}
