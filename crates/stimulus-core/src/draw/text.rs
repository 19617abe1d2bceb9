//! Text extent estimation.
//!
//! Surfaces lay text out themselves, so elements only need an estimate of
//! the box a line of text occupies to keep their bounds meaningful for
//! hit-testing.

use crate::{draw::FontDefinition, geometry::Size};

/// Average glyph advance is three fifths of the font size.
const ADVANCE_FIFTHS: f32 = 3.0;
/// Line height is six fifths of the font size.
const LINE_HEIGHT_FIFTHS: f32 = 6.0;

/// Estimates the size of `text` rendered as a single line in `font`.
///
/// # Examples
///
/// ```
/// # use stimulus_core::draw::{measure_text, FontDefinition};
/// let font = FontDefinition::new("sans-serif", 10.0);
/// let size = measure_text("abcd", &font);
/// assert_eq!(size.width(), 24.0);
/// assert_eq!(size.height(), 12.0);
/// ```
pub fn measure_text(text: &str, font: &FontDefinition) -> Size {
    if text.is_empty() {
        return Size::default();
    }

    let mut width = text.chars().count() as f32 * font.size() * ADVANCE_FIFTHS / 5.0;
    if font.bold() {
        width *= 1.1;
    }
    Size::new(width, font.size() * LINE_HEIGHT_FIFTHS / 5.0)
}
