//! audiotree — builds, caches and reloads a filtered tree of a music library.
//!
//! Thin binary entry point. All logic lives in the `audiotree-core` crate.

use anyhow::Context;
use audiotree_core::display::render_tree;
use audiotree_core::persist::{free_and_write, reconstruct_tree_from_file};
use audiotree_core::{create_directory_tree, LibraryConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "audiotree")]
#[command(about = "Mirror a music directory as a tree of audio files and cache it on disk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a directory, prune empty folders and save the tree
    Scan {
        /// Directory to walk
        start: PathBuf,

        /// Destination file (defaults to the configured library file)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print the tree before saving it
        #[arg(long)]
        print: bool,
    },
    /// Reload a saved tree
    Load {
        /// Saved tree file
        file: PathBuf,

        /// Path the reloaded root stands for
        start: PathBuf,

        /// Print the reloaded tree
        #[arg(long)]
        print: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging.
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = match &cli.config {
        Some(path) => LibraryConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => LibraryConfig::default(),
    };

    match cli.command {
        Commands::Scan {
            start,
            output,
            print,
        } => {
            let output = output.unwrap_or_else(|| config.library_file.clone());
            scan(&start, &output, &config, print)
        }
        Commands::Load { file, start, print } => load(&file, &start, print),
    }
}

fn scan(start: &Path, output: &Path, config: &LibraryConfig, print: bool) -> anyhow::Result<()> {
    let scan = create_directory_tree(start, config.audio_filter()?)?;
    if print {
        print!("{}", render_tree(&scan.tree));
    }
    let written = free_and_write(scan.tree, output).map_err(|e| e.source)?;
    println!(
        "{} entries under {} ({} records saved to {})",
        scan.entries,
        start.display(),
        written,
        output.display()
    );
    Ok(())
}

fn load(file: &Path, start: &Path, print: bool) -> anyhow::Result<()> {
    let reconstruction = reconstruct_tree_from_file(file, start)?
        .with_context(|| format!("no tree could be reloaded from {}", file.display()))?;
    if print {
        print!("{}", render_tree(&reconstruction.tree));
    }
    println!(
        "{} entries, {} directories reloaded from {}",
        reconstruction.tree.len(),
        reconstruction.directories_attached,
        file.display()
    );
    Ok(())
}
