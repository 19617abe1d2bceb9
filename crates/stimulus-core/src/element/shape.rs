//! Rectangle and ellipse elements.

use std::{any::Any, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    draw::StyleDescriptor,
    element::{
        CoreRecord, DrawContext, ElementCore, ElementError, ElementKind, ElementRecord,
        SceneElement, ShapeRecord, abbreviate,
    },
    geometry::{Bounds, Transform},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle => f.write_str("Rectangle"),
            Self::Ellipse => f.write_str("Ellipse"),
        }
    }
}

/// A rectangle or ellipse inscribed in `rect`.
///
/// Unlike images, shapes keep their geometry apart from their bounds: the
/// bounds grow by the pen width when an edge is drawn, the shape does not.
#[derive(Debug, Clone)]
pub struct ShapeElement {
    core: ElementCore,
    shape: ShapeKind,
    rect: Bounds,
}

impl ShapeElement {
    pub fn new(shape: ShapeKind, rect: Bounds) -> Self {
        Self {
            core: ElementCore::new(StyleDescriptor::default(), rect, ""),
            shape,
            rect,
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

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn rect(&self) -> Bounds {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Bounds) {
        self.rect = rect;
    }
}

impl From<ShapeRecord> for ShapeElement {
    fn from(record: ShapeRecord) -> Self {
        Self {
            core: record.core.into_core(),
            shape: record.shape,
            rect: record.rect,
        }
    }
}

impl fmt::Display for ShapeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Name: {} ; Bounds: {}",
            self.shape,
            self.core.name(),
            self.core.bounds()
        )
    }
}

impl SceneElement for ShapeElement {
    fn kind(&self) -> ElementKind {
        match self.shape {
            ShapeKind::Rectangle => ElementKind::Rectangle,
            ShapeKind::Ellipse => ElementKind::Ellipse,
        }
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
        let surface = ctx.surface()?;

        if action.has_fill() {
            match self.shape {
                ShapeKind::Rectangle => surface.fill_rect(style.brush(), self.rect),
                ShapeKind::Ellipse => surface.fill_ellipse(style.brush(), self.rect),
            }
        }

        let bounds = if action.has_edge() {
            let pen = style.pen();
            match self.shape {
                ShapeKind::Rectangle => surface.stroke_rect(pen, self.rect),
                ShapeKind::Ellipse => surface.stroke_ellipse(pen, self.rect),
            }
            self.rect.inflate(pen.width(), pen.width())
        } else {
            self.rect
        };

        self.core.set_bounds(bounds);
        self.core.draw_chrome(ctx)
    }

    fn clone_box(&self) -> Box<dyn SceneElement> {
        Box::new(self.clone())
    }

    fn reset(&mut self) {
        self.core.reset();
        self.rect = Bounds::default();
    }

    fn apply_transform(&mut self, transform: Transform) {
        self.rect = transform.apply_bounds(self.rect);
        self.core.transform_bounds(transform);
    }

    fn short_description(&self) -> String {
        format!("{}: {} ...", self.shape, abbreviate(self.core.name()))
    }

    fn to_record(&self) -> ElementRecord {
        ElementRecord::Shape(ShapeRecord {
            core: CoreRecord::from_core(&self.core),
            shape: self.shape,
            rect: self.rect,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
