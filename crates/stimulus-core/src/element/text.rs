//! Single-line text elements.

use std::{any::Any, fmt};

use crate::{
    draw::{StyleDescriptor, measure_text},
    element::{
        CoreRecord, DrawContext, ElementCore, ElementError, ElementKind, ElementRecord,
        SceneElement, TextRecord, abbreviate,
    },
    geometry::{Bounds, Point, Transform},
};

/// Text drawn with the style's font and label color, top-left anchored at
/// `origin`. Fill paints a box behind the text, edge outlines it.
#[derive(Debug, Clone)]
pub struct TextElement {
    core: ElementCore,
    text: String,
    origin: Point,
}

impl TextElement {
    pub fn new(text: impl Into<String>, origin: Point) -> Self {
        Self {
            core: ElementCore::new(
                StyleDescriptor::default(),
                Bounds::new_from_top_left(origin, Default::default()),
                "",
            ),
            text: text.into(),
            origin,
        }
    }

    pub fn with_style(mut self, style: StyleDescriptor) -> Self {
        self.core.set_style(style);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.core.set_name(name);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn origin(&self) -> Point {
        self.origin
    }
}

impl From<TextRecord> for TextElement {
    fn from(record: TextRecord) -> Self {
        Self {
            core: record.core.into_core(),
            text: record.text,
            origin: record.origin,
        }
    }
}

impl fmt::Display for TextElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text, Content: {} ; Bounds: {}", self.text, self.core.bounds())
    }
}

impl SceneElement for TextElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), ElementError> {
        let style = self.core.style();
        let action = style.draw_action();
        let font = style.label_font();
        let rect = Bounds::new_from_top_left(self.origin, measure_text(&self.text, font));
        let surface = ctx.surface()?;

        if action.has_fill() {
            surface.fill_rect(style.brush(), rect);
        }
        surface.draw_text(&self.text, font, style.label_color(), self.origin);

        let bounds = if action.has_edge() {
            let pen = style.pen();
            surface.stroke_rect(pen, rect);
            rect.inflate(pen.width(), pen.width())
        } else {
            rect
        };

        self.core.set_bounds(bounds);
        self.core.draw_chrome(ctx)
    }

    fn clone_box(&self) -> Box<dyn SceneElement> {
        Box::new(self.clone())
    }

    fn reset(&mut self) {
        self.core.reset();
        self.text.clear();
        self.origin = Point::default();
    }

    fn apply_transform(&mut self, transform: Transform) {
        self.origin = transform.apply(self.origin);
        self.core.transform_bounds(transform);
    }

    fn short_description(&self) -> String {
        format!("Text: {} ...", abbreviate(&self.text))
    }

    fn to_record(&self) -> ElementRecord {
        ElementRecord::Text(TextRecord {
            core: CoreRecord::from_core(&self.core),
            text: self.text.clone(),
            origin: self.origin,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
