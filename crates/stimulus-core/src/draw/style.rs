//! The style descriptor shared by every element variant.
//!
//! A [`StyleDescriptor`] bundles the paint attributes of one element: which
//! decorations to draw ([`DrawAction`]), the outline pen, the fill brush, the
//! label font and color, and the grouping tags used by analysis tooling.

use std::{fmt, ops::BitOr, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    draw::{FillDefinition, FontDefinition, StrokeDefinition},
};

/// Which decorations are drawn in addition to the element's own content.
///
/// `Edge` and `Fill` are independent flags; [`DrawAction::EdgeFill`] is their
/// union.
///
/// # Examples
///
/// ```
/// # use stimulus_core::draw::DrawAction;
/// let both = DrawAction::Edge | DrawAction::Fill;
/// assert_eq!(both, DrawAction::EdgeFill);
/// assert!(both.has_edge());
/// assert!(both.has_fill());
/// assert!(!DrawAction::None.has_edge());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawAction {
    #[default]
    None,
    Edge,
    Fill,
    EdgeFill,
}

impl DrawAction {
    fn from_flags(edge: bool, fill: bool) -> Self {
        match (edge, fill) {
            (false, false) => Self::None,
            (true, false) => Self::Edge,
            (false, true) => Self::Fill,
            (true, true) => Self::EdgeFill,
        }
    }

    /// Returns true if an outline is drawn.
    pub fn has_edge(self) -> bool {
        matches!(self, Self::Edge | Self::EdgeFill)
    }

    /// Returns true if a fill is drawn.
    pub fn has_fill(self) -> bool {
        matches!(self, Self::Fill | Self::EdgeFill)
    }

    /// Returns true if every flag of `other` is set in `self`.
    pub fn contains(self, other: DrawAction) -> bool {
        (!other.has_edge() || self.has_edge()) && (!other.has_fill() || self.has_fill())
    }
}

impl BitOr for DrawAction {
    type Output = DrawAction;

    fn bitor(self, rhs: Self) -> Self::Output {
        DrawAction::from_flags(
            self.has_edge() || rhs.has_edge(),
            self.has_fill() || rhs.has_fill(),
        )
    }
}

/// Analysis category an element's style belongs to.
///
/// Editors restyle all elements of a group at once, e.g. every area of
/// interest or every fixation marker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleGroup {
    #[default]
    None,
    /// Stimulus content presented to the participant
    Stimulus,
    /// Area of interest
    Aoi,
    /// Area of interest marked as search target
    AoiTarget,
    /// Gaze fixation marker
    Fixation,
    /// Mouse fixation marker
    MouseFixation,
    /// User-defined overlay
    User,
}

impl fmt::Display for StyleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Stimulus => "stimulus",
            Self::Aoi => "aoi",
            Self::AoiTarget => "aoi_target",
            Self::Fixation => "fixation",
            Self::MouseFixation => "mouse_fixation",
            Self::User => "user",
        };
        f.write_str(name)
    }
}

/// Paint attributes of one element.
///
/// The element owns its descriptor and copies it on clone. Pen, brush and
/// font are `Rc`-shared with other elements and never mutated here; use the
/// `with_*` methods to derive a descriptor that points at a different one.
///
/// # Examples
///
/// ```
/// # use std::rc::Rc;
/// # use stimulus_core::color::Color;
/// # use stimulus_core::draw::{DrawAction, StrokeDefinition, StyleDescriptor};
/// let pen = Rc::new(StrokeDefinition::solid(Color::new("red").unwrap(), 2.0));
/// let style = StyleDescriptor::default()
///     .with_draw_action(DrawAction::Edge)
///     .with_pen(Rc::clone(&pen));
///
/// assert!(style.draw_action().has_edge());
/// assert!(Rc::ptr_eq(style.pen(), &pen));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleDescriptor {
    #[serde(default)]
    draw_action: DrawAction,
    #[serde(default)]
    pen: Rc<StrokeDefinition>,
    #[serde(default)]
    brush: Rc<FillDefinition>,
    #[serde(default)]
    label_font: Rc<FontDefinition>,
    #[serde(default)]
    label_color: Color,
    #[serde(default)]
    style_group: StyleGroup,
    #[serde(default)]
    element_group: String,
}

impl StyleDescriptor {
    pub fn new(
        draw_action: DrawAction,
        pen: Rc<StrokeDefinition>,
        brush: Rc<FillDefinition>,
        label_font: Rc<FontDefinition>,
        label_color: Color,
    ) -> Self {
        Self {
            draw_action,
            pen,
            brush,
            label_font,
            label_color,
            style_group: StyleGroup::default(),
            element_group: String::new(),
        }
    }

    pub fn draw_action(&self) -> DrawAction {
        self.draw_action
    }

    pub fn pen(&self) -> &Rc<StrokeDefinition> {
        &self.pen
    }

    pub fn brush(&self) -> &Rc<FillDefinition> {
        &self.brush
    }

    pub fn label_font(&self) -> &Rc<FontDefinition> {
        &self.label_font
    }

    pub fn label_color(&self) -> Color {
        self.label_color
    }

    pub fn style_group(&self) -> StyleGroup {
        self.style_group
    }

    pub fn element_group(&self) -> &str {
        &self.element_group
    }

    /// Width of the outline pen, or zero when no edge is drawn.
    pub fn edge_width(&self) -> f32 {
        if self.draw_action.has_edge() {
            self.pen.width()
        } else {
            0.0
        }
    }

    pub fn with_draw_action(mut self, draw_action: DrawAction) -> Self {
        self.draw_action = draw_action;
        self
    }

    pub fn with_pen(mut self, pen: Rc<StrokeDefinition>) -> Self {
        self.pen = pen;
        self
    }

    pub fn with_brush(mut self, brush: Rc<FillDefinition>) -> Self {
        self.brush = brush;
        self
    }

    pub fn with_label_font(mut self, font: Rc<FontDefinition>) -> Self {
        self.label_font = font;
        self
    }

    pub fn with_label_color(mut self, color: Color) -> Self {
        self.label_color = color;
        self
    }

    pub fn with_style_group(mut self, style_group: StyleGroup) -> Self {
        self.style_group = style_group;
        self
    }

    pub fn with_element_group(mut self, element_group: impl Into<String>) -> Self {
        self.element_group = element_group.into();
        self
    }

    pub fn set_draw_action(&mut self, draw_action: DrawAction) {
        self.draw_action = draw_action;
    }

    pub fn set_element_group(&mut self, element_group: impl Into<String>) {
        self.element_group = element_group.into();
    }
}
