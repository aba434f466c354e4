//! Costwheel CLI
//!
//! Replays change feed scripts through the chart engine.
//!
//! # Commands
//!
//! - `replay` - Animate a script and write SVG frames
//! - `layout` - Print the final segment table of a script

mod commands;
mod script;
mod svg;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Costwheel donut chart tools.
#[derive(Parser)]
#[command(name = "costwheel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a feed script and write SVG frames
    Replay {
        /// Path to the JSON script
        script: PathBuf,

        /// Directory for frame_NNNN.svg files
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,

        /// Frames per second of the sampling clock
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Only write the settled final frame
        #[arg(long)]
        final_only: bool,

        /// Summary format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the segment table after applying every batch
    Layout {
        /// Path to the JSON script
        script: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay {
            script,
            out,
            fps,
            final_only,
            format,
        } => {
            commands::replay::run(&script, &out, fps, final_only, &format)?;
        }
        Commands::Layout { script, format } => {
            commands::layout::run(&script, &format)?;
        }
        Commands::Version => {
            println!("Costwheel CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Costwheel Core v{}", costwheel_core::VERSION);
        }
    }

    Ok(())
}
