//! Label font definitions.

use serde::{Deserialize, Serialize};

/// Font used to print element names.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `12` |
/// | Bold | `false` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDefinition {
    family: String,
    size: f32,
    #[serde(default)]
    bold: bool,
}

impl FontDefinition {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size in canvas units.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn bold(&self) -> bool {
        self.bold
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    /// Returns the SVG `font-weight` value for this font.
    pub fn weight_svg_value(&self) -> &'static str {
        if self.bold { "bold" } else { "normal" }
    }
}

impl Default for FontDefinition {
    fn default() -> Self {
        Self::new("sans-serif", 12.0)
    }
}
