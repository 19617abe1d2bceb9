//! Scene elements: the polymorphic drawables of a stimulus canvas.
//!
//! Every drawable implements [`SceneElement`]. Common state (bounds, name,
//! style and sound cue) lives in an [`ElementCore`] that each variant embeds,
//! and the variants differ only in how they turn that state plus their own
//! fields into primitives on a [`Surface`].
//!
//! # Bounds
//!
//! Before the first draw an element's bounds are whatever the caller set.
//! Every successful draw replaces them with the rectangle actually occupied,
//! stroke included, so hit-testing and selection always agree with what is
//! on screen.
//!
//! # Variants
//!
//! - [`ImageElement`] - a bitmap fitted to the canvas by an [`ImageLayout`]
//! - [`ShapeElement`] - rectangle or ellipse
//! - [`LineElement`] - straight line segment
//! - [`TextElement`] - a single line of text

use std::{any::Any, fmt, path::PathBuf};

use thiserror::Error;

use crate::{
    draw::{StyleDescriptor, Surface},
    geometry::{Bounds, Transform},
    input::Modifiers,
    resource::{ImageResourceProvider, ResourceError},
};

mod image;
mod line;
mod record;
mod shape;
mod text;

pub use self::image::{ImageElement, ImageLayout, layout_rect};
pub use line::LineElement;
pub use record::{CoreRecord, ElementRecord, ImageRecord, LineRecord, ShapeRecord, TextRecord};
pub use shape::{ShapeElement, ShapeKind};
pub use text::TextElement;

/// Errors raised by element operations.
#[derive(Debug, Error)]
pub enum ElementError {
    /// A required input was missing, e.g. no drawing surface.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An image element has no file name but a full path was required.
    #[error("image file name is empty, so it could not be loaded")]
    EmptyIdentifier,

    /// The image file exists but could not be turned into a bitmap.
    #[error("failed to load image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ResourceError,
    },

    /// The element was disposed and may not be drawn again.
    #[error("element `{0}` has been disposed")]
    Disposed(String),
}

/// The concrete variant behind a [`SceneElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Image,
    Rectangle,
    Ellipse,
    Line,
    Text,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Everything an element needs from its host for one draw call.
///
/// The surface is optional so a host can detect a frame without a render
/// target; drawing through such a context fails with
/// [`ElementError::InvalidArgument`].
pub struct DrawContext<'a> {
    surface: Option<&'a mut dyn Surface>,
    resources: &'a dyn ImageResourceProvider,
    modifiers: Modifiers,
    selected: bool,
    show_labels: bool,
}

impl<'a> DrawContext<'a> {
    pub fn new(surface: &'a mut dyn Surface, resources: &'a dyn ImageResourceProvider) -> Self {
        Self {
            surface: Some(surface),
            resources,
            modifiers: Modifiers::NONE,
            selected: false,
            show_labels: true,
        }
    }

    /// Creates a context without a render target.
    pub fn detached(resources: &'a dyn ImageResourceProvider) -> Self {
        Self {
            surface: None,
            resources,
            modifiers: Modifiers::NONE,
            selected: false,
            show_labels: true,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Returns the render target.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidArgument`] for a detached context.
    pub fn surface(&mut self) -> Result<&mut (dyn Surface + 'a), ElementError> {
        self.surface
            .as_deref_mut()
            .ok_or(ElementError::InvalidArgument("drawing surface is required"))
    }

    pub fn resources(&self) -> &'a dyn ImageResourceProvider {
        self.resources
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn shows_labels(&self) -> bool {
        self.show_labels
    }
}

/// State shared by all element variants.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementCore {
    bounds: Bounds,
    name: String,
    style: StyleDescriptor,
    sound: Option<PathBuf>,
}

impl ElementCore {
    pub fn new(style: StyleDescriptor, bounds: Bounds, name: impl Into<String>) -> Self {
        Self {
            bounds,
            name: name.into(),
            style,
            sound: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn style(&self) -> &StyleDescriptor {
        &self.style
    }

    pub fn set_style(&mut self, style: StyleDescriptor) {
        self.style = style;
    }

    pub fn element_group(&self) -> &str {
        self.style.element_group()
    }

    /// Path of the audio cue played when the element is presented. The
    /// element only references the file; playback belongs to the host.
    pub fn sound(&self) -> Option<&PathBuf> {
        self.sound.as_ref()
    }

    pub fn set_sound(&mut self, sound: Option<PathBuf>) {
        self.sound = sound;
    }

    /// Clears geometry and the sound cue. Name and element group survive.
    pub fn reset(&mut self) {
        self.bounds = Bounds::default();
        self.sound = None;
    }

    pub fn transform_bounds(&mut self, transform: Transform) {
        self.bounds = transform.apply_bounds(self.bounds);
    }

    /// Draws the name label and, for selected elements, the selection frame
    /// around the current bounds. Called last by every variant.
    pub fn draw_chrome(&self, ctx: &mut DrawContext<'_>) -> Result<(), ElementError> {
        let show_label = ctx.shows_labels() && !self.name.is_empty();
        let selected = ctx.is_selected();
        let surface = ctx.surface()?;

        if show_label {
            surface.draw_label(
                &self.name,
                self.style.label_font(),
                self.style.label_color(),
                self.bounds.min_point(),
            );
        }

        if selected {
            surface.draw_selection_frame(self.bounds);
        }

        Ok(())
    }
}

/// The contract every drawable scene element fulfils.
///
/// `Display` gives the long human readable description; see
/// [`SceneElement::short_description`] for the list-view form.
pub trait SceneElement: fmt::Debug + fmt::Display {
    fn kind(&self) -> ElementKind;

    fn core(&self) -> &ElementCore;

    fn core_mut(&mut self) -> &mut ElementCore;

    /// Renders the element and updates its bounds to the geometry actually
    /// drawn.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidArgument`] if the context has no
    /// surface. Variant specific failures are documented on each variant.
    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), ElementError>;

    /// Creates an independent copy. Native resources such as decoded
    /// bitmaps are not shared; the copy rebuilds them on demand.
    fn clone_box(&self) -> Box<dyn SceneElement>;

    /// Restores a default, re-usable state for editor tooling.
    fn reset(&mut self) {
        self.core_mut().reset();
    }

    /// Applies an affine transform to the element's geometry.
    fn apply_transform(&mut self, transform: Transform) {
        self.core_mut().transform_bounds(transform);
    }

    /// Releases resources owned by the element. Safe to call repeatedly.
    fn dispose(&mut self) {}

    /// One-line summary for list views.
    fn short_description(&self) -> String;

    /// Persistent form of the element.
    fn to_record(&self) -> ElementRecord;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn bounds(&self) -> Bounds {
        self.core().bounds()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn style(&self) -> &StyleDescriptor {
        self.core().style()
    }
}

impl Clone for Box<dyn SceneElement> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Truncation used by short descriptions: names longer than twelve
/// characters lose their last character.
pub(crate) fn abbreviate(text: &str) -> String {
    let count = text.chars().count();
    if count > 12 {
        text.chars().take(count - 1).collect()
    } else {
        text.to_string()
    }
}
