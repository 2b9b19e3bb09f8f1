//! Inspect command - Show how a board is canonicalized and what a bot knows about it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    genome::{GenomeStore, persistence},
    tictactoe::{Board, Move, canonicalize},
};

#[derive(Parser, Debug)]
#[command(about = "Show the canonical form of a board and its stored genome")]
pub struct InspectArgs {
    /// Board as 9 cells, row-major: X, O and `.`/`_`/`-` for empty
    pub board: String,

    /// Genome file to look the board up in
    #[arg(long, short = 'f')]
    pub genomes: Option<PathBuf>,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let board = Board::from_string(&args.board).context("Invalid board")?;
    let canonical = canonicalize(&board.grid(), Move::new(0, 0));

    print_section("Board");
    println!("{board}");
    print_kv("Key", &board.grid().to_key());
    print_kv("Canonical key", &canonical.grid.to_key());
    print_kv("Rotation", &canonical.symmetry.rotation.to_string());
    print_kv("Flip", &canonical.symmetry.flip.to_string());
    print_kv("Playable cells", &board.grid().empty_count().to_string());

    let Some(path) = &args.genomes else {
        return Ok(());
    };
    let mut store = GenomeStore::new();
    let outcome = persistence::load(&mut store, path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    print_subsection(&format!("Genome in {}", path.display()));
    if !outcome.is_loaded() {
        println!("  file not found");
        return Ok(());
    }
    match store.get(&canonical.grid) {
        Some(genome) => {
            print_kv("Canonical", &persistence::format_line(&canonical.grid, genome));
            print_kv("Board orientation", &genome.to_raw(canonical.symmetry).to_string());
        }
        None => println!("  {}", crate::genome::NO_RECORDS),
    }
    Ok(())
}
