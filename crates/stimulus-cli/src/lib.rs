//! CLI logic for the stimulus scene renderer.
//!
//! Loads a persisted scene document, draws it onto an SVG surface and
//! writes the result, so recorded gaze data can be overlaid on an exact
//! reproduction of what the participant saw.

mod args;
mod config;

pub use args::Args;

use std::path::Path;

use log::{info, warn};

use stimulus::{DrawOptions, SceneRenderer, StimulusError};

/// Run the stimulus CLI application
///
/// # Errors
///
/// Returns `StimulusError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scene documents
/// - SVG export errors
pub fn run(args: &Args) -> Result<(), StimulusError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(dir) = &args.stimulus_dir {
        app_config.set_stimulus_dir(dir);
    }

    let renderer = SceneRenderer::new(app_config);
    let mut scene = renderer.load(Path::new(&args.input))?;

    let selected = args.select.as_deref().and_then(|name| {
        let index = scene.position(name);
        if index.is_none() {
            warn!(name; "No element with this name to select");
        }
        index
    });

    let options = DrawOptions {
        selected,
        show_labels: !args.no_labels,
        ..DrawOptions::default()
    };
    renderer.write_svg(&mut scene, options, Path::new(&args.output))?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
