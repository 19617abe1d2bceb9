//! Stimulus CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use stimulus_cli::Args;

/// Unknown levels fall back to warn.
fn log_level(requested: &str) -> LevelFilter {
    LevelFilter::from_str(requested).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{requested}', logging warnings and errors");
        LevelFilter::Warn
    })
}

fn main() {
    let args = Args::parse();

    let level = log_level(&args.log_level);
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    info!(level:?; "Rendering stimulus scene");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = stimulus_cli::run(&args) {
        error!(input = args.input; "{err}");
        process::exit(1);
    }

    info!(output = args.output; "Done");
}
