//! Fill brush definitions.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A solid fill brush.
///
/// Image elements flood their drawn rectangle with the brush after the
/// bitmap, so a brush with alpha below 1.0 tints the picture rather than
/// hiding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillDefinition {
    color: Color,
}

impl FillDefinition {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Default for FillDefinition {
    fn default() -> Self {
        Self {
            color: Color::new("white").expect("'white' is a valid CSS color"),
        }
    }
}

/// Apply the brush as `fill` and `fill-opacity` attributes of an SVG element.
#[macro_export]
macro_rules! apply_fill {
    ($element:expr, $fill:expr) => {{
        $element
            .set("fill", $fill.color().to_string())
            .set("fill-opacity", $fill.color().alpha())
    }};
}
