//! Artifact maintenance tool
//!
//! `hash` prints canonical fingerprints, `check` validates a directory and
//! `write-demo` emits the demonstration artifact set.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farmx_core::{demo, ModelStore};

#[derive(Parser)]
#[command(name = "farmx-models")]
#[command(about = "Inspect and generate FarmX model artifacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical blake3 hash of every artifact
    Hash {
        #[arg(default_value = "models")]
        dir: PathBuf,
    },
    /// Load and validate every artifact
    Check {
        #[arg(default_value = "models")]
        dir: PathBuf,
    },
    /// Write the demonstration artifacts
    WriteDemo {
        #[arg(default_value = "models")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Hash { dir } => {
            let store = load(&dir)?;
            for entry in store.artifact_hashes()? {
                println!("{}  {}", entry.hash, entry.file);
            }
        }
        Command::Check { dir } => {
            let store = load(&dir)?;
            println!(
                "{}: {} artifacts OK",
                dir.display(),
                store.artifact_count()
            );
        }
        Command::WriteDemo { dir } => {
            let store = demo::demo_store()?;
            store
                .write_dir(&dir)
                .with_context(|| format!("Unable to write demo artifacts to {}", dir.display()))?;
            println!("Demo artifacts written to {}", dir.display());
        }
    }

    Ok(())
}

fn load(dir: &Path) -> Result<ModelStore> {
    ModelStore::load_dir(dir)
        .with_context(|| format!("Failed to load model artifacts from {}", dir.display()))
}
