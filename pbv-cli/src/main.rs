//! PBV CLI - Command-line tool for Power BI template containers
//!
//! This binary provides command-line interfaces for:
//! - extract: container → version-control-friendly tree
//! - compress: tree → container
//! - textconv: container → human-readable text on stdout (for git diff)

use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pbv")]
#[command(about = "Converts Power BI template containers to and from a diffable tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a container to a version-control-friendly tree
    Extract {
        /// Input container (.pbit / .pbix)
        input: PathBuf,
        /// Output directory
        output: PathBuf,
        /// Allow overwriting OUTPUT; without this, fail if OUTPUT exists
        #[arg(long)]
        overwrite: bool,
        /// Reformat members in various ways to improve diff-ability
        #[arg(long)]
        diffable: bool,
    },
    /// Compress a version-control-friendly tree back into a container
    Compress {
        /// Input directory (a previously extracted tree)
        input: PathBuf,
        /// Output container (.pbit / .pbix)
        output: PathBuf,
        /// Allow overwriting OUTPUT; without this, fail if OUTPUT exists
        #[arg(long)]
        overwrite: bool,
        /// Treat the tree as extracted with --diffable
        #[arg(long)]
        diffable: bool,
    },
    /// Render a container as human-readable text on stdout
    ///
    /// Intended as a git textconv driver:
    ///   [diff "pbit"]
    ///       textconv = pbv textconv
    Textconv {
        /// Input container (.pbit / .pbix)
        input: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Extract {
            input,
            output,
            overwrite,
            diffable,
        } => {
            pbv_io::extract(&input, &output, overwrite, diffable)?;
        }
        Commands::Compress {
            input,
            output,
            overwrite,
            diffable,
        } => {
            pbv_io::compress(&input, &output, overwrite, diffable)?;
        }
        Commands::Textconv { input } => {
            let stdout = std::io::stdout().lock();
            let mut writer = BufWriter::new(stdout);
            pbv_io::textconv(&input, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}
