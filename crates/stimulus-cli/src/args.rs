//! Command-line argument definitions for the stimulus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, stimulus file lookup, selection display and logging verbosity.

use clap::Parser;

/// Command-line arguments for the stimulus scene renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the scene document (JSON)
    #[arg(help = "Path to the input scene document")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory image files are resolved against
    #[arg(short, long)]
    pub stimulus_dir: Option<String>,

    /// Name of an element to draw with a selection frame
    #[arg(long)]
    pub select: Option<String>,

    /// Do not print element names
    #[arg(long)]
    pub no_labels: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
