//! Geometric primitives for stimulus layout and hit-testing.
//!
//! This module provides the geometric types every scene element works with:
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Floating point width and height
//! - [`PixelSize`] - Integer dimensions of canvases and bitmaps
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Transform`] - A 2D affine transform applied to element bounds
//!
//! # Coordinate System
//!
//! Canvas coordinates follow the screen convention used by the SVG output:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! All floating point geometry is `f32` so that element bounds computed on
//! one run reproduce exactly on the next.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use stimulus_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Floating point dimensions of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if both width and height are zero.
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Rounds both dimensions to the nearest integer, ties to even.
    pub fn round(self) -> Self {
        Self {
            width: self.width.round_ties_even(),
            height: self.height.round_ties_even(),
        }
    }

    /// Converts to whole pixels, rounding and clamping negative values to zero.
    pub fn to_pixel_size(self) -> PixelSize {
        let rounded = self.round();
        PixelSize::new(
            rounded.width.max(0.0) as u32,
            rounded.height.max(0.0) as u32,
        )
    }
}

/// Integer dimensions of a canvas or a decoded bitmap.
///
/// # Examples
///
/// ```
/// # use stimulus_core::geometry::PixelSize;
/// let canvas = PixelSize::new(800, 600);
/// assert!(!canvas.is_empty());
/// assert_eq!(canvas.to_size().width(), 800.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    width: u32,
    height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// Returns true when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle in canvas space, stored as minimum and maximum coordinates.
///
/// Width and height are allowed to become negative when a rectangle is
/// shrunk beyond its extent; such a rectangle reports [`Bounds::is_empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Creates a new bounds from a top-left corner and dimensions.
    ///
    /// ```
    /// # use stimulus_core::geometry::Bounds;
    /// let bounds = Bounds::from_xywh(10.0, 20.0, 30.0, 40.0);
    /// assert_eq!(bounds.max_x(), 40.0);
    /// assert_eq!(bounds.max_y(), 60.0);
    /// ```
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new_from_top_left(Point::new(x, y), Size::new(width, height))
    }

    /// Creates the rectangle `(0, 0, width, height)` of a pixel size.
    pub fn from_pixel_size(size: PixelSize) -> Self {
        Self::new_from_top_left(Point::default(), size.to_size())
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns true if the rectangle covers no area.
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Moves the rectangle so its top-left corner is `location`, keeping its size.
    pub fn with_location(self, location: Point) -> Self {
        Self::new_from_top_left(location, self.to_size())
    }

    /// Keeps the top-left corner and replaces the size.
    pub fn with_size(self, size: Size) -> Self {
        Self::new_from_top_left(self.min_point(), size)
    }

    /// Replaces the x-coordinate of the top-left corner, keeping the width.
    pub fn with_x(self, x: f32) -> Self {
        Self::from_xywh(x, self.min_y, self.width(), self.height())
    }

    /// Replaces the y-coordinate of the top-left corner, keeping the height.
    pub fn with_y(self, y: f32) -> Self {
        Self::from_xywh(self.min_x, y, self.width(), self.height())
    }

    /// Replaces the width, keeping the top-left corner.
    pub fn with_width(self, width: f32) -> Self {
        Self::from_xywh(self.min_x, self.min_y, width, self.height())
    }

    /// Replaces the height, keeping the top-left corner.
    pub fn with_height(self, height: f32) -> Self {
        Self::from_xywh(self.min_x, self.min_y, self.width(), height)
    }

    /// Grows the rectangle by `dx` on the left and right and by `dy` on the
    /// top and bottom. Negative amounts shrink it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stimulus_core::geometry::Bounds;
    /// let bounds = Bounds::from_xywh(0.0, 0.0, 100.0, 50.0).inflate(-2.0, -2.0);
    /// assert_eq!(bounds.min_x(), 2.0);
    /// assert_eq!(bounds.width(), 96.0);
    /// assert_eq!(bounds.height(), 46.0);
    /// ```
    pub fn inflate(self, dx: f32, dy: f32) -> Self {
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Returns true if the point lies inside or on the edge of the bounds.
    pub fn contains_point(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Returns true if `other` lies entirely inside these bounds.
    pub fn contains_bounds(self, other: Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Merges two bounds into the smallest bounds containing both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{X={},Y={},Width={},Height={}}}",
            self.min_x,
            self.min_y,
            self.width(),
            self.height()
        )
    }
}

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, the same column layout
/// as an SVG `matrix(a b c d e f)`.
///
/// # Examples
///
/// ```
/// # use stimulus_core::geometry::{Bounds, Transform};
/// let moved = Transform::translation(5.0, -5.0)
///     .apply_bounds(Bounds::from_xywh(10.0, 10.0, 20.0, 20.0));
/// assert_eq!(moved, Bounds::from_xywh(15.0, 5.0, 20.0, 20.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Returns the transform that applies `self` first and `next` afterwards.
    pub fn then(self, next: Transform) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn apply(self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// Transforms the four corners of `bounds` and returns their axis-aligned
    /// bounding box.
    pub fn apply_bounds(self, bounds: Bounds) -> Bounds {
        let corners = [
            Point::new(bounds.min_x, bounds.min_y),
            Point::new(bounds.max_x, bounds.min_y),
            Point::new(bounds.min_x, bounds.max_y),
            Point::new(bounds.max_x, bounds.max_y),
        ]
        .map(|corner| self.apply(corner));

        corners[1..].iter().fold(
            Bounds {
                min_x: corners[0].x,
                min_y: corners[0].y,
                max_x: corners[0].x,
                max_y: corners[0].y,
            },
            |acc, p| Bounds {
                min_x: acc.min_x.min(p.x),
                min_y: acc.min_y.min(p.y),
                max_x: acc.max_x.max(p.x),
                max_y: acc.max_y.max(p.y),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_bounds_from_xywh() {
        let bounds = Bounds::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
        assert_eq!(bounds.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_bounds_inflate_grows_and_shrinks() {
        let bounds = Bounds::from_xywh(10.0, 10.0, 20.0, 20.0);

        let grown = bounds.inflate(1.5, 1.5);
        assert_eq!(grown, Bounds::from_xywh(8.5, 8.5, 23.0, 23.0));

        let shrunk = bounds.inflate(-2.0, -3.0);
        assert_eq!(shrunk, Bounds::from_xywh(12.0, 13.0, 16.0, 14.0));
    }

    #[test]
    fn test_bounds_over_shrunk_is_empty() {
        let bounds = Bounds::from_xywh(0.0, 0.0, 4.0, 4.0).inflate(-3.0, -3.0);
        assert!(bounds.is_empty());
        assert!(Bounds::default().is_empty());
    }

    #[test]
    fn test_bounds_with_setters() {
        let bounds = Bounds::from_xywh(1.0, 2.0, 3.0, 4.0);
        assert_eq!(bounds.with_x(10.0), Bounds::from_xywh(10.0, 2.0, 3.0, 4.0));
        assert_eq!(bounds.with_y(10.0), Bounds::from_xywh(1.0, 10.0, 3.0, 4.0));
        assert_eq!(bounds.with_width(10.0), Bounds::from_xywh(1.0, 2.0, 10.0, 4.0));
        assert_eq!(
            bounds.with_height(10.0),
            Bounds::from_xywh(1.0, 2.0, 3.0, 10.0)
        );
        assert_eq!(
            bounds.with_location(Point::new(7.0, 8.0)),
            Bounds::from_xywh(7.0, 8.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_bounds_contains() {
        let outer = Bounds::from_xywh(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_point(Point::new(0.0, 100.0)));
        assert!(!outer.contains_point(Point::new(-0.1, 50.0)));
        assert!(outer.contains_bounds(Bounds::from_xywh(10.0, 10.0, 90.0, 90.0)));
        assert!(!outer.contains_bounds(Bounds::from_xywh(10.0, 10.0, 91.0, 10.0)));
    }

    #[test]
    fn test_bounds_display() {
        let bounds = Bounds::from_xywh(1.0, 2.5, 3.0, 4.0);
        assert_eq!(bounds.to_string(), "{X=1,Y=2.5,Width=3,Height=4}");
    }

    #[test]
    fn test_size_round_ties_to_even() {
        assert_eq!(Size::new(2.5, 3.5).round(), Size::new(2.0, 4.0));
        assert_eq!(Size::new(-1.2, 7.6).to_pixel_size(), PixelSize::new(0, 8));
    }

    #[test]
    fn test_transform_translation_and_scaling() {
        let bounds = Bounds::from_xywh(10.0, 10.0, 20.0, 10.0);

        let scaled = Transform::scaling(2.0, 3.0).apply_bounds(bounds);
        assert_eq!(scaled, Bounds::from_xywh(20.0, 30.0, 40.0, 30.0));

        let combined = Transform::scaling(2.0, 2.0).then(Transform::translation(1.0, 1.0));
        let point = combined.apply(Point::new(3.0, 4.0));
        assert_approx_eq!(f32, point.x(), 7.0);
        assert_approx_eq!(f32, point.y(), 9.0);
    }

    #[test]
    fn test_transform_rotation_takes_bounding_box() {
        // Quarter turn around the origin
        let rotate = Transform::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        let rotated = rotate.apply_bounds(Bounds::from_xywh(0.0, 0.0, 20.0, 10.0));

        assert_approx_eq!(f32, rotated.min_x(), -10.0);
        assert_approx_eq!(f32, rotated.min_y(), 0.0);
        assert_approx_eq!(f32, rotated.width(), 10.0);
        assert_approx_eq!(f32, rotated.height(), 20.0);
    }
}
