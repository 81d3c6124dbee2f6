use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use tessera::{
    app::ExerciseApp,
    puzzle::{BoardLayout, ShapePuzzle, BOARD_HEIGHT, BOARD_WIDTH},
};

/// Slide shapes across a checkerboard.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Board layout file
    #[arg(short, long, default_value = "boards/EASY_01")]
    board: PathBuf,

    /// Board columns
    #[arg(long, default_value_t = BOARD_WIDTH)]
    width: usize,

    /// Board rows
    #[arg(long, default_value_t = BOARD_HEIGHT)]
    height: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let layout = BoardLayout::load(&args.board, args.width, args.height)
        .with_context(|| format!("invalid board layout {}", args.board.display()))?;
    if !layout.warnings().is_empty() {
        log::warn!(
            "{} unknown shape token(s) in {} were left empty",
            layout.warnings().len(),
            args.board.display()
        );
    }

    ExerciseApp::new(ShapePuzzle::new(layout))?.run()
}
