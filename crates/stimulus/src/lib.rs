//! Stimulus - scene composition and reproduction for eye-tracking stimuli.
//!
//! Builds presentation scenes from image, shape, line and text elements,
//! saves and loads them as JSON documents, and reproduces them as SVG for
//! overlaying gaze data.

pub mod config;

mod document;
mod error;
mod scene;

pub use stimulus_core::{color, draw, element, geometry, input, resource};

pub use document::SceneDocument;
pub use error::StimulusError;
pub use scene::{DrawOptions, DrawReport, Scene};

use std::path::{Path, PathBuf};

use log::{debug, info};

use stimulus_core::resource::{FsImageProvider, ImageResourceProvider};

use config::AppConfig;

/// Loads and renders stimulus scenes.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use stimulus::{DrawOptions, SceneRenderer, config::AppConfig};
///
/// let renderer = SceneRenderer::new(AppConfig::default());
///
/// let mut scene = renderer
///     .load(Path::new("trial.json"))
///     .expect("Failed to load scene");
///
/// let svg = renderer
///     .render_svg(&mut scene, DrawOptions::default())
///     .expect("Failed to render scene");
///
/// println!("{}", svg);
/// ```
pub struct SceneRenderer {
    config: AppConfig,
    resources: Box<dyn ImageResourceProvider>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SceneRenderer {
    /// Creates a renderer that reads image files from the filesystem.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            resources: Box::new(FsImageProvider),
        }
    }

    /// Replaces the image provider, e.g. with an in-memory one.
    pub fn with_resources(mut self, resources: Box<dyn ImageResourceProvider>) -> Self {
        self.resources = resources;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn resources(&self) -> &dyn ImageResourceProvider {
        &*self.resources
    }

    /// Creates an empty scene with the configured canvas, default style and
    /// stimulus directory.
    ///
    /// # Errors
    ///
    /// Returns [`StimulusError::Config`] if the configured style is invalid.
    pub fn new_scene(&self) -> Result<Scene, StimulusError> {
        let style = self
            .config
            .style()
            .to_descriptor()
            .map_err(StimulusError::Config)?;
        Ok(Scene::new(self.config.canvas().size())
            .with_stimulus_dir(self.stimulus_dir(None))
            .with_default_style(style))
    }

    /// Loads a scene document.
    ///
    /// Image files are resolved against the configured stimulus directory,
    /// or the document's own directory if none is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StimulusError::Io`] if the file cannot be read and
    /// [`StimulusError::Serialization`] if it is not a valid document.
    pub fn load(&self, path: &Path) -> Result<Scene, StimulusError> {
        let mut document = SceneDocument::load(path)?;
        if document.canvas.is_empty() {
            document.canvas = self.config.canvas().size();
            info!(canvas:% = document.canvas; "Document has no canvas, using configured size");
        }

        let stimulus_dir = self.stimulus_dir(path.parent());
        debug!(stimulus_dir:? = stimulus_dir; "Resolving stimulus files");
        Ok(Scene::from_document(document, &stimulus_dir))
    }

    /// Saves `scene` as a JSON document.
    pub fn save(&self, scene: &Scene, path: &Path) -> Result<(), StimulusError> {
        scene.to_document().save(path)
    }

    /// Renders `scene` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`StimulusError::Config`] if the configured background color
    /// is invalid.
    pub fn render_svg(
        &self,
        scene: &mut Scene,
        options: DrawOptions,
    ) -> Result<String, StimulusError> {
        let background = self
            .config
            .canvas()
            .background_color()
            .map_err(StimulusError::Config)?;

        info!(elements = scene.len(), canvas:% = scene.canvas(); "Rendering scene");
        let svg = scene.render_svg(&*self.resources, options, background);
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Renders `scene` and writes the SVG to `path`.
    pub fn write_svg(
        &self,
        scene: &mut Scene,
        options: DrawOptions,
        path: &Path,
    ) -> Result<(), StimulusError> {
        let svg = self.render_svg(scene, options)?;
        std::fs::write(path, svg)
            .map_err(|err| StimulusError::Export(format!("{}: {err}", path.display())))?;
        info!(path:? = path; "SVG written");
        Ok(())
    }

    fn stimulus_dir(&self, fallback: Option<&Path>) -> PathBuf {
        self.config
            .resources()
            .stimulus_dir()
            .or(fallback)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}
