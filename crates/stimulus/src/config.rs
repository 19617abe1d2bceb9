//! Configuration types for stimulus scene rendering.
//!
//! This module provides configuration structures that control the canvas,
//! the default style of new elements and where stimulus files live. All types
//! implement [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`CanvasConfig`] - Presentation canvas size and background.
//! - [`StyleConfig`] - Default pen, brush and label font.
//! - [`ResourcesConfig`] - Directory image files are resolved against.
//!
//! # Example
//!
//! ```
//! # use stimulus::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.canvas().size().width(), 1024);
//! assert!(config.style().to_descriptor().is_ok());
//! ```

use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use serde::Deserialize;

use stimulus_core::{
    color::Color,
    draw::{DrawAction, FillDefinition, FontDefinition, StrokeDefinition, StyleDescriptor},
    geometry::PixelSize,
};

const DEFAULT_CANVAS_WIDTH: u32 = 1024;
const DEFAULT_CANVAS_HEIGHT: u32 = 768;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    canvas: CanvasConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    resources: ResourcesConfig,
}

impl AppConfig {
    pub fn new(canvas: CanvasConfig, style: StyleConfig, resources: ResourcesConfig) -> Self {
        Self {
            canvas,
            style,
            resources,
        }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn resources(&self) -> &ResourcesConfig {
        &self.resources
    }

    /// Overrides the stimulus directory, e.g. from a command line flag.
    pub fn set_stimulus_dir(&mut self, dir: impl Into<PathBuf>) {
        self.resources.stimulus_dir = Some(dir.into());
    }
}

/// Presentation canvas settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    width: u32,

    #[serde(default = "default_canvas_height")]
    height: u32,

    /// Background [`Color`] as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

fn default_canvas_width() -> u32 {
    DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> u32 {
    DEFAULT_CANVAS_HEIGHT
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background_color: None,
        }
    }
}

impl CanvasConfig {
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

/// Default style for elements created through the scene API.
///
/// Unset fields keep the defaults of the respective definitions.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    draw_action: DrawAction,

    #[serde(default)]
    pen_color: Option<String>,

    #[serde(default)]
    pen_width: Option<f32>,

    #[serde(default)]
    brush_color: Option<String>,

    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<f32>,

    #[serde(default)]
    label_color: Option<String>,
}

fn parse_color(field: &str, value: Option<&String>) -> Result<Option<Color>, String> {
    value
        .map(|color| Color::new(color))
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

impl StyleConfig {
    /// Builds the [`StyleDescriptor`] described by this section.
    ///
    /// # Errors
    ///
    /// Returns an error if a color string cannot be parsed.
    pub fn to_descriptor(&self) -> Result<StyleDescriptor, String> {
        let mut pen = StrokeDefinition::default();
        if let Some(color) = parse_color("pen_color", self.pen_color.as_ref())? {
            pen.set_color(color);
        }
        if let Some(width) = self.pen_width {
            pen.set_width(width);
        }

        let mut brush = FillDefinition::default();
        if let Some(color) = parse_color("brush_color", self.brush_color.as_ref())? {
            brush.set_color(color);
        }

        let default_font = FontDefinition::default();
        let font = FontDefinition::new(
            self.font_family
                .clone()
                .unwrap_or_else(|| default_font.family().to_string()),
            self.font_size.unwrap_or(default_font.size()),
        );

        let label_color =
            parse_color("label_color", self.label_color.as_ref())?.unwrap_or_default();

        Ok(StyleDescriptor::new(
            self.draw_action,
            Rc::new(pen),
            Rc::new(brush),
            Rc::new(font),
            label_color,
        ))
    }
}

/// Locations of stimulus files.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    stimulus_dir: Option<PathBuf>,
}

impl ResourcesConfig {
    /// Directory image files are resolved against, if configured.
    pub fn stimulus_dir(&self) -> Option<&Path> {
        self.stimulus_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_canvas() {
        let config = AppConfig::default();
        assert_eq!(config.canvas().size(), PixelSize::new(1024, 768));
        assert_eq!(config.canvas().background_color(), Ok(None));
        assert_eq!(config.resources().stimulus_dir(), None);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "canvas": { "width": 800 }, "style": { "pen_width": 3.0, "draw_action": "edge" } }"#,
        )
        .unwrap();

        assert_eq!(config.canvas().size(), PixelSize::new(800, 768));

        let style = config.style().to_descriptor().unwrap();
        assert_eq!(style.draw_action(), DrawAction::Edge);
        assert_approx_eq!(f32, style.pen().width(), 3.0);
        assert_eq!(style.label_font().family(), "sans-serif");
    }

    #[test]
    fn test_invalid_colors_are_reported() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "style": { "brush_color": "not-a-color" } }"#).unwrap();
        let err = config.style().to_descriptor().unwrap_err();
        assert!(err.contains("brush_color"));

        let config: AppConfig =
            serde_json::from_str(r#"{ "canvas": { "background_color": "nope" } }"#).unwrap();
        assert!(config.canvas().background_color().is_err());
    }

    #[test]
    fn test_stimulus_dir_override() {
        let mut config = AppConfig::default();
        config.set_stimulus_dir("/data/stimuli");
        assert_eq!(
            config.resources().stimulus_dir(),
            Some(Path::new("/data/stimuli"))
        );
    }
}
