//! Straight line elements.

use std::{any::Any, fmt};

use crate::{
    draw::StyleDescriptor,
    element::{
        CoreRecord, DrawContext, ElementCore, ElementError, ElementKind, ElementRecord,
        LineRecord, SceneElement, abbreviate,
    },
    geometry::{Bounds, Point, Transform},
};

/// A segment from `start` to `end`, always stroked with the style's pen.
#[derive(Debug, Clone)]
pub struct LineElement {
    core: ElementCore,
    start: Point,
    end: Point,
}

fn span(start: Point, end: Point) -> Bounds {
    let min = Point::new(start.x().min(end.x()), start.y().min(end.y()));
    let max = Point::new(start.x().max(end.x()), start.y().max(end.y()));
    Bounds::from_xywh(min.x(), min.y(), max.x() - min.x(), max.y() - min.y())
}

impl LineElement {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            core: ElementCore::new(StyleDescriptor::default(), span(start, end), ""),
            start,
            end,
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

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn set_points(&mut self, start: Point, end: Point) {
        self.start = start;
        self.end = end;
    }
}

impl From<LineRecord> for LineElement {
    fn from(record: LineRecord) -> Self {
        Self {
            core: record.core.into_core(),
            start: record.start,
            end: record.end,
        }
    }
}

impl fmt::Display for LineElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line, From: ({}, {}) ; To: ({}, {})",
            self.start.x(),
            self.start.y(),
            self.end.x(),
            self.end.y()
        )
    }
}

impl SceneElement for LineElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Line
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), ElementError> {
        let pen = self.core.style().pen();
        let surface = ctx.surface()?;
        surface.stroke_line(pen, self.start, self.end);

        let bounds = span(self.start, self.end).inflate(pen.width(), pen.width());
        self.core.set_bounds(bounds);
        self.core.draw_chrome(ctx)
    }

    fn clone_box(&self) -> Box<dyn SceneElement> {
        Box::new(self.clone())
    }

    fn reset(&mut self) {
        self.core.reset();
        self.start = Point::default();
        self.end = Point::default();
    }

    fn apply_transform(&mut self, transform: Transform) {
        self.start = transform.apply(self.start);
        self.end = transform.apply(self.end);
        self.core.transform_bounds(transform);
    }

    fn short_description(&self) -> String {
        format!("Line: {} ...", abbreviate(self.core.name()))
    }

    fn to_record(&self) -> ElementRecord {
        ElementRecord::Line(LineRecord {
            core: CoreRecord::from_core(&self.core),
            start: self.start,
            end: self.end,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::testing::{FakeProvider, Op, RecordingSurface};

    #[test]
    fn test_line_bounds_include_pen() {
        let mut line = LineElement::new(Point::new(50.0, 10.0), Point::new(10.0, 30.0));
        let provider = FakeProvider::default();
        let mut surface = RecordingSurface::default();

        line.draw(&mut DrawContext::new(&mut surface, &provider))
            .unwrap();

        assert_eq!(
            surface.ops,
            vec![Op::Line {
                from: Point::new(50.0, 10.0),
                to: Point::new(10.0, 30.0),
            }]
        );
        assert_eq!(line.bounds(), Bounds::from_xywh(9.0, 9.0, 42.0, 22.0));
    }

    #[test]
    fn test_transform_moves_endpoints() {
        let mut line = LineElement::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        line.apply_transform(Transform::translation(5.0, 5.0));
        assert_eq!(line.start(), Point::new(5.0, 5.0));
        assert_eq!(line.end(), Point::new(15.0, 5.0));
        assert_eq!(line.to_string(), "Line, From: (5, 5) ; To: (15, 5)");
    }
}
