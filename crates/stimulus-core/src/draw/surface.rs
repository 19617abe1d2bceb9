//! Render targets for scene elements.
//!
//! [`Surface`] is the set of primitives an element may emit. Elements draw
//! into whatever surface the host provides; the bundled [`SvgSurface`]
//! produces a standalone SVG document with bitmaps embedded as PNG data
//! URLs.

use log::{trace, warn};
use svg::{Document, node::element as svg_element};

use crate::{
    apply_fill, apply_stroke,
    color::Color,
    draw::{FillDefinition, FontDefinition, LayeredOutput, RenderLayer, StrokeDefinition, SvgNode},
    geometry::{Bounds, PixelSize, Point},
    resource::Bitmap,
};

const SELECTION_COLOR: &str = "#1e6fd9";
const HANDLE_SIZE: f32 = 6.0;
const CAPTION_FONT_SIZE: f32 = 14.0;

/// Primitive drawing operations available to elements.
///
/// Coordinates are canvas units with the origin at the top-left corner.
/// Strokes are centered on the geometry they outline.
pub trait Surface {
    /// Draws `bitmap` scaled to fill `rect`.
    fn draw_image(&mut self, bitmap: &Bitmap, rect: Bounds);

    /// Fills `rect` with copies of `bitmap` at natural size, anchored at the
    /// top-left corner of `rect`.
    fn fill_tiled(&mut self, bitmap: &Bitmap, rect: Bounds);

    fn fill_rect(&mut self, brush: &FillDefinition, rect: Bounds);

    fn fill_ellipse(&mut self, brush: &FillDefinition, rect: Bounds);

    fn stroke_rect(&mut self, pen: &StrokeDefinition, rect: Bounds);

    fn stroke_ellipse(&mut self, pen: &StrokeDefinition, rect: Bounds);

    fn stroke_line(&mut self, pen: &StrokeDefinition, from: Point, to: Point);

    /// Draws element content text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, font: &FontDefinition, color: Color, origin: Point);

    /// Draws an element's name label with its top-left corner at `origin`.
    fn draw_label(&mut self, text: &str, font: &FontDefinition, color: Color, origin: Point);

    /// Draws the editor selection frame around `rect`.
    fn draw_selection_frame(&mut self, rect: Bounds);

    /// Called by the scene before an element draws.
    fn begin_element(&mut self, _name: &str) {}

    /// Called by the scene after an element draws, even if drawing failed.
    fn end_element(&mut self) {}
}

/// A [`Surface`] that builds an SVG document.
///
/// Primitives of one element are collected between
/// [`Surface::begin_element`] and [`Surface::end_element`] and rendered as a
/// `<g data-element="...">` group with one sub-group per [`RenderLayer`].
/// Primitives emitted outside an element bracket form their own group.
///
/// # Examples
///
/// ```
/// # use stimulus_core::draw::{FillDefinition, Surface, SvgSurface};
/// # use stimulus_core::geometry::{Bounds, PixelSize};
/// let mut surface = SvgSurface::new(PixelSize::new(100, 50));
/// surface.begin_element("box");
/// surface.fill_rect(&FillDefinition::default(), Bounds::from_xywh(10.0, 10.0, 20.0, 20.0));
/// surface.end_element();
///
/// let svg = surface.to_svg_string();
/// assert!(svg.contains("data-element=\"box\""));
/// ```
#[derive(Debug)]
pub struct SvgSurface {
    size: PixelSize,
    background: Option<Color>,
    definitions: Vec<SvgNode>,
    elements: Vec<SvgNode>,
    current: LayeredOutput,
    current_name: Option<String>,
    next_pattern_id: usize,
}

impl SvgSurface {
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            background: None,
            definitions: Vec::new(),
            elements: Vec::new(),
            current: LayeredOutput::new(),
            current_name: None,
            next_pattern_id: 0,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Finishes rendering and returns the SVG document.
    pub fn into_document(mut self) -> Document {
        self.flush();

        let (width, height) = (self.size.width(), self.size.height());
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if !self.definitions.is_empty() {
            let defs = self
                .definitions
                .into_iter()
                .fold(svg_element::Definitions::new(), |defs, node| defs.add(node));
            doc = doc.add(defs);
        }

        if let Some(color) = self.background {
            let background = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
            doc = doc.add(background);
        }

        for node in self.elements {
            doc = doc.add(node);
        }

        doc
    }

    pub fn to_svg_string(self) -> String {
        self.into_document().to_string()
    }

    fn add(&mut self, layer: RenderLayer, node: SvgNode) {
        self.current.add_to_layer(layer, node);
    }

    fn flush(&mut self) {
        let output = std::mem::take(&mut self.current);
        let name = self.current_name.take();
        if output.is_empty() {
            return;
        }

        let mut group = svg_element::Group::new();
        if let Some(name) = name {
            group = group.set("data-element", name);
        }
        for node in output.render() {
            group = group.add(node);
        }
        self.elements.push(Box::new(group));
    }

    fn image_node(bitmap: &Bitmap, rect: Bounds) -> Option<svg_element::Image> {
        if bitmap.size().is_empty() {
            trace!(size:% = bitmap.size(); "Skipping empty bitmap");
            return None;
        }

        match bitmap.to_png_data_url() {
            Ok(url) => Some(
                svg_element::Image::new()
                    .set("x", rect.min_x())
                    .set("y", rect.min_y())
                    .set("width", rect.width())
                    .set("height", rect.height())
                    .set("preserveAspectRatio", "none")
                    .set("href", url),
            ),
            Err(err) => {
                warn!(err:% = err; "Failed to embed bitmap");
                None
            }
        }
    }

    fn add_caption(&mut self, bitmap: &Bitmap, rect: Bounds) {
        let Some(caption) = bitmap.caption() else {
            return;
        };

        let center = rect.center();
        let text = svg_element::Text::new(caption)
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", "sans-serif")
            .set("font-size", CAPTION_FONT_SIZE)
            .set("fill", "#8b0000");
        self.add(RenderLayer::Content, Box::new(text));
    }

    fn text_node(text: &str, font: &FontDefinition, color: Color, origin: Point) -> svg_element::Text {
        svg_element::Text::new(text)
            .set("x", origin.x())
            .set("y", origin.y())
            .set("dominant-baseline", "hanging")
            .set("font-family", font.family())
            .set("font-size", font.size())
            .set("font-weight", font.weight_svg_value())
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha())
    }

    fn ellipse_node(rect: Bounds) -> svg_element::Ellipse {
        let center = rect.center();
        svg_element::Ellipse::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("rx", rect.width() / 2.0)
            .set("ry", rect.height() / 2.0)
    }

    fn rect_node(rect: Bounds) -> svg_element::Rectangle {
        svg_element::Rectangle::new()
            .set("x", rect.min_x())
            .set("y", rect.min_y())
            .set("width", rect.width())
            .set("height", rect.height())
    }
}

impl Surface for SvgSurface {
    fn draw_image(&mut self, bitmap: &Bitmap, rect: Bounds) {
        if let Some(node) = Self::image_node(bitmap, rect) {
            self.add(RenderLayer::Content, Box::new(node));
        }
        self.add_caption(bitmap, rect);
    }

    fn fill_tiled(&mut self, bitmap: &Bitmap, rect: Bounds) {
        let tile = Bounds::from_pixel_size(bitmap.size());
        let Some(image) = Self::image_node(bitmap, tile) else {
            return;
        };

        let id = format!("tile-{}", self.next_pattern_id);
        self.next_pattern_id += 1;

        let pattern = svg_element::Pattern::new()
            .set("id", id.as_str())
            .set("patternUnits", "userSpaceOnUse")
            .set("x", rect.min_x())
            .set("y", rect.min_y())
            .set("width", tile.width())
            .set("height", tile.height())
            .add(image);
        self.definitions.push(Box::new(pattern));

        let fill = Self::rect_node(rect).set("fill", format!("url(#{id})"));
        self.add(RenderLayer::Content, Box::new(fill));
    }

    fn fill_rect(&mut self, brush: &FillDefinition, rect: Bounds) {
        let node = apply_fill!(Self::rect_node(rect), brush);
        self.add(RenderLayer::Overlay, Box::new(node));
    }

    fn fill_ellipse(&mut self, brush: &FillDefinition, rect: Bounds) {
        let node = apply_fill!(Self::ellipse_node(rect), brush);
        self.add(RenderLayer::Overlay, Box::new(node));
    }

    fn stroke_rect(&mut self, pen: &StrokeDefinition, rect: Bounds) {
        let node = apply_stroke!(Self::rect_node(rect).set("fill", "none"), pen);
        self.add(RenderLayer::Outline, Box::new(node));
    }

    fn stroke_ellipse(&mut self, pen: &StrokeDefinition, rect: Bounds) {
        let node = apply_stroke!(Self::ellipse_node(rect).set("fill", "none"), pen);
        self.add(RenderLayer::Outline, Box::new(node));
    }

    fn stroke_line(&mut self, pen: &StrokeDefinition, from: Point, to: Point) {
        let line = svg_element::Line::new()
            .set("x1", from.x())
            .set("y1", from.y())
            .set("x2", to.x())
            .set("y2", to.y());
        self.add(RenderLayer::Content, Box::new(apply_stroke!(line, pen)));
    }

    fn draw_text(&mut self, text: &str, font: &FontDefinition, color: Color, origin: Point) {
        let node = Self::text_node(text, font, color, origin);
        self.add(RenderLayer::Content, Box::new(node));
    }

    fn draw_label(&mut self, text: &str, font: &FontDefinition, color: Color, origin: Point) {
        let node = Self::text_node(text, font, color, origin);
        self.add(RenderLayer::Label, Box::new(node));
    }

    fn draw_selection_frame(&mut self, rect: Bounds) {
        let frame = Self::rect_node(rect)
            .set("fill", "none")
            .set("stroke", SELECTION_COLOR)
            .set("stroke-width", 1)
            .set("stroke-dasharray", "4,2");
        self.add(RenderLayer::Selection, Box::new(frame));

        let half = HANDLE_SIZE / 2.0;
        let corners = [
            Point::new(rect.min_x(), rect.min_y()),
            Point::new(rect.max_x(), rect.min_y()),
            Point::new(rect.min_x(), rect.max_y()),
            Point::new(rect.max_x(), rect.max_y()),
        ];
        for corner in corners {
            let handle = svg_element::Rectangle::new()
                .set("x", corner.x() - half)
                .set("y", corner.y() - half)
                .set("width", HANDLE_SIZE)
                .set("height", HANDLE_SIZE)
                .set("fill", "white")
                .set("stroke", SELECTION_COLOR);
            self.add(RenderLayer::Selection, Box::new(handle));
        }
    }

    fn begin_element(&mut self, name: &str) {
        self.flush();
        self.current_name = Some(name.to_string());
    }

    fn end_element(&mut self) {
        self.flush();
    }
}
