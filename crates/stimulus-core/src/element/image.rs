//! Bitmap stimulus element.
//!
//! An [`ImageElement`] references an image file by directory and file name
//! and decodes it lazily, on the first draw or the first request for the
//! bitmap. A missing file is replaced by a captioned placeholder so the
//! scene still shows where the stimulus belongs. Each frame the bitmap is
//! fitted to the presentation canvas by the element's [`ImageLayout`].

use std::{
    any::Any,
    fmt,
    path::{Path, PathBuf},
    rc::Rc,
};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::{
    draw::StyleDescriptor,
    element::{
        CoreRecord, DrawContext, ElementCore, ElementError, ElementKind, ElementRecord,
        ImageRecord, SceneElement, abbreviate,
    },
    geometry::{Bounds, PixelSize, Point, Size, Transform},
    input::Modifiers,
    resource::{Bitmap, ImageResourceProvider, MAX_PLACEHOLDER_SIDE, ResourceError},
};

/// Canvas size restored by [`SceneElement::reset`].
const DEFAULT_CANVAS: PixelSize = PixelSize::new(100, 100);

/// How a bitmap is fitted to the presentation canvas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageLayout {
    /// Free placement: the element keeps its own bounds.
    #[default]
    None,
    /// Natural size, centered on the canvas.
    Center,
    /// Scaled to fill the canvas, ignoring aspect ratio.
    Stretch,
    /// Repeated at natural size across the canvas.
    Tile,
    /// Scaled to fit the canvas with aspect ratio kept, centered.
    Zoom,
}

impl fmt::Display for ImageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Center => "Center",
            Self::Stretch => "Stretch",
            Self::Tile => "Tile",
            Self::Zoom => "Zoom",
        };
        f.write_str(name)
    }
}

/// Computes the rectangle a bitmap of size `image` occupies for one frame.
///
/// `inset` is half the edge pen width when an edge is drawn and zero
/// otherwise. The canvas is shrunk by it before fitting, and the free and
/// zoomed layouts shrink their result by it once more. `current` is the
/// element's current bounds, used by the free layout. `modifiers` only
/// matter for the free layout: Control alone snaps to the natural image
/// size, Alt alone keeps the current width and restores the image's aspect
/// ratio.
///
/// # Examples
///
/// ```
/// # use stimulus_core::element::{layout_rect, ImageLayout};
/// # use stimulus_core::geometry::{Bounds, PixelSize};
/// # use stimulus_core::input::Modifiers;
/// let rect = layout_rect(
///     ImageLayout::Zoom,
///     PixelSize::new(800, 600),
///     PixelSize::new(400, 400),
///     Bounds::default(),
///     0.0,
///     Modifiers::NONE,
/// );
/// assert_eq!(rect, Bounds::from_xywh(100.0, 0.0, 600.0, 600.0));
/// ```
pub fn layout_rect(
    layout: ImageLayout,
    canvas: PixelSize,
    image: PixelSize,
    current: Bounds,
    inset: f32,
    modifiers: Modifiers,
) -> Bounds {
    let working = Bounds::from_pixel_size(canvas).inflate(-inset, -inset);

    match layout {
        ImageLayout::Tile | ImageLayout::Stretch => working,
        ImageLayout::Center => {
            // Whole-pixel offsets, each half truncated on its own
            let x = i64::from(canvas.width() / 2) - i64::from(image.width() / 2);
            let y = i64::from(canvas.height() / 2) - i64::from(image.height() / 2);
            Bounds::new_from_top_left(Point::new(x as f32, y as f32), image.to_size())
        }
        ImageLayout::None => {
            let size = if modifiers.is_only(Modifiers::CONTROL) {
                image.to_size()
            } else if modifiers.is_only(Modifiers::ALT) && image.width() > 0 {
                let width = current.width();
                let ratio = image.height() as f32 / image.width() as f32;
                Size::new(width, ratio * width).round()
            } else {
                current.to_size()
            };
            Bounds::new_from_top_left(current.min_point(), size).inflate(-inset, -inset)
        }
        ImageLayout::Zoom => {
            if image.is_empty() {
                return working.inflate(-inset, -inset);
            }

            let (image_w, image_h) = (image.width() as f32, image.height() as f32);
            let canvas_size = canvas.to_size();
            let image_ratio = image_w / image_h;
            let rect_ratio = working.width() / working.height();

            let rect = if image_ratio < rect_ratio {
                let width = image_w * (working.height() / image_h);
                working
                    .with_width(width)
                    .with_x((canvas_size.width() - width) / 2.0)
            } else {
                let height = image_h * (working.width() / image_w);
                working
                    .with_height(height)
                    .with_y((canvas_size.height() - height) / 2.0)
            };
            rect.inflate(-inset, -inset)
        }
    }
}

/// A bitmap drawn onto the presentation canvas.
///
/// The element owns its decoded bitmap exclusively. Clones start without
/// one and decode their own copy when first drawn.
///
/// # Examples
///
/// ```
/// # use stimulus_core::element::{ImageElement, ImageLayout, SceneElement};
/// # use stimulus_core::geometry::PixelSize;
/// let element = ImageElement::new("face.png", "stimuli", ImageLayout::Center, PixelSize::new(800, 600))
///     .with_name("face");
///
/// assert_eq!(element.name(), "face");
/// assert_eq!(element.short_description(), "Image: face.png ...");
/// assert!(!element.has_image());
/// ```
pub struct ImageElement {
    core: ElementCore,
    file_name: String,
    directory: PathBuf,
    image: Option<Bitmap>,
    layout: ImageLayout,
    canvas: PixelSize,
    /// Take the bitmap's natural rectangle as bounds on the next
    /// materialization.
    adopt_image_bounds: bool,
    disposed: bool,
}

impl ImageElement {
    /// Creates an element for the file `file_name` inside `directory`.
    ///
    /// Nothing is read yet. The first materialization sets the bounds to the
    /// bitmap's natural rectangle at the origin.
    pub fn new(
        file_name: impl Into<String>,
        directory: impl Into<PathBuf>,
        layout: ImageLayout,
        canvas: PixelSize,
    ) -> Self {
        Self {
            core: ElementCore::default(),
            file_name: file_name.into(),
            directory: directory.into(),
            image: None,
            layout,
            canvas,
            adopt_image_bounds: true,
            disposed: false,
        }
    }

    /// Creates an element around a private copy of `bitmap`.
    ///
    /// The element has no backing file, so once its bitmap is released by
    /// [`SceneElement::dispose`] or [`SceneElement::reset`] it cannot be
    /// rebuilt.
    pub fn from_bitmap(
        bitmap: &Bitmap,
        layout: ImageLayout,
        canvas: PixelSize,
        resources: &dyn ImageResourceProvider,
    ) -> Self {
        let image = resources.clone_in_memory(bitmap);
        let bounds = Bounds::from_pixel_size(image.size());
        Self {
            core: ElementCore::new(StyleDescriptor::default(), bounds, ""),
            file_name: String::new(),
            directory: PathBuf::new(),
            image: Some(image),
            layout,
            canvas,
            adopt_image_bounds: false,
            disposed: false,
        }
    }

    /// Rebuilds an element from its persistent form.
    ///
    /// The bitmap is decoded on first use from `directory`. Records without
    /// geometry take the bitmap's natural rectangle, like a new element.
    pub fn from_record(record: ImageRecord, directory: impl Into<PathBuf>) -> Self {
        let core = record.core.into_core();
        let adopt_image_bounds = core.bounds().to_size().is_zero();
        Self {
            core,
            file_name: record.file_name,
            directory: directory.into(),
            image: None,
            layout: record.layout,
            canvas: record.canvas,
            adopt_image_bounds,
            disposed: false,
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

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
    }

    pub fn layout(&self) -> ImageLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: ImageLayout) {
        self.layout = layout;
    }

    pub fn canvas(&self) -> PixelSize {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: PixelSize) {
        self.canvas = canvas;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Returns the absolute location of the image file.
    ///
    /// If no directory is set but the file name carries one, the name is
    /// split: its directory part becomes the element's directory and only
    /// the bare name is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::EmptyIdentifier`] if the file name is empty.
    pub fn full_path(&mut self) -> Result<PathBuf, ElementError> {
        if self.file_name.is_empty() {
            return Err(ElementError::EmptyIdentifier);
        }

        if self.directory.as_os_str().is_empty() {
            let path = Path::new(&self.file_name);
            let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
            if let (Some(parent), Some(bare)) = (parent, path.file_name()) {
                let bare = bare.to_string_lossy().into_owned();
                self.directory = parent.to_path_buf();
                self.file_name = bare;
            }
        }

        Ok(self.directory.join(&self.file_name))
    }

    /// Decodes the image file into the element's private bitmap.
    ///
    /// A missing file yields a placeholder of the element's current size, or
    /// of the canvas size if the element has no size yet.
    ///
    /// # Errors
    ///
    /// - [`ElementError::EmptyIdentifier`] if the element has no file name
    /// - [`ElementError::Decode`] if the file exists but is not a readable image
    /// - [`ElementError::Disposed`] if the element was disposed
    pub fn materialize(
        &mut self,
        resources: &dyn ImageResourceProvider,
    ) -> Result<&Bitmap, ElementError> {
        if self.disposed {
            return Err(ElementError::Disposed(self.file_name.clone()));
        }

        let path = self.full_path()?;
        let bitmap = match resources.load_from_path(&path) {
            Ok(bitmap) => bitmap,
            Err(ResourceError::NotFound(_)) => {
                if self.core.bounds().to_size().is_zero() {
                    self.core
                        .set_bounds(self.core.bounds().with_size(self.canvas.to_size()));
                }
                let wanted = self.core.bounds().to_size().to_pixel_size();
                let size = PixelSize::new(
                    wanted.width().min(MAX_PLACEHOLDER_SIDE),
                    wanted.height().min(MAX_PLACEHOLDER_SIDE),
                );
                if size != wanted {
                    warn!(wanted:% = wanted, size:% = size; "Placeholder size clamped");
                }
                warn!(path:? = path, size:% = size; "Image file not found, using placeholder");
                resources.create_placeholder(size, &format!("{} not found", self.file_name))
            }
            Err(source) => return Err(ElementError::Decode { path, source }),
        };

        if self.adopt_image_bounds {
            self.core.set_bounds(Bounds::from_pixel_size(bitmap.size()));
            self.adopt_image_bounds = false;
        }

        debug!(path:? = path, size:% = bitmap.size(); "Materialized image element");
        Ok(self.image.insert(bitmap))
    }

    /// Returns the decoded bitmap, materializing it first if needed.
    ///
    /// # Errors
    ///
    /// Same as [`ImageElement::materialize`].
    pub fn stimulus_image(
        &mut self,
        resources: &dyn ImageResourceProvider,
    ) -> Result<&Bitmap, ElementError> {
        if self.image.is_none() {
            return self.materialize(resources);
        }
        self.image
            .as_ref()
            .ok_or(ElementError::InvalidArgument("image is not materialized"))
    }

    /// Replaces the bitmap. `None` releases it; the next draw decodes the
    /// file again.
    pub fn set_stimulus_image(&mut self, image: Option<Bitmap>) {
        self.image = image;
    }

    fn record_file_name(&self) -> String {
        Path::new(&self.file_name)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Clone for ImageElement {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            file_name: self.file_name.clone(),
            directory: self.directory.clone(),
            image: None,
            layout: self.layout,
            canvas: self.canvas,
            adopt_image_bounds: self.adopt_image_bounds,
            disposed: false,
        }
    }
}

impl fmt::Debug for ImageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageElement")
            .field("core", &self.core)
            .field("file_name", &self.file_name)
            .field("directory", &self.directory)
            .field("image", &self.image)
            .field("layout", &self.layout)
            .field("canvas", &self.canvas)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ImageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image, File: {} ; ImageLayout: {} ; Bounds: {}",
            self.file_name,
            self.layout,
            self.core.bounds()
        )
    }
}

impl SceneElement for ImageElement {
    fn kind(&self) -> ElementKind {
        ElementKind::Image
    }

    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    /// Fits the bitmap to the canvas and paints it, then the fill overlay,
    /// the edge and the element chrome.
    ///
    /// A file that fails to decode skips the frame with a warning.
    ///
    /// # Errors
    ///
    /// Besides a missing surface, fails with [`ElementError::Disposed`] and
    /// [`ElementError::EmptyIdentifier`].
    fn draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), ElementError> {
        if !ctx.has_surface() {
            return Err(ElementError::InvalidArgument("drawing surface is required"));
        }
        if self.disposed {
            return Err(ElementError::Disposed(self.file_name.clone()));
        }

        if self.image.is_none() {
            match self.materialize(ctx.resources()) {
                Ok(_) => {}
                Err(ElementError::Decode { path, source }) => {
                    warn!(path:? = path, err:% = source; "Skipping image that failed to load");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
        let Some(image) = self.image.as_ref() else {
            return Ok(());
        };

        let style = self.core.style();
        let action = style.draw_action();
        let pen = Rc::clone(style.pen());
        let brush = Rc::clone(style.brush());
        let inset = if action.has_edge() {
            pen.half_width()
        } else {
            0.0
        };

        let rect = layout_rect(
            self.layout,
            self.canvas,
            image.size(),
            self.core.bounds(),
            inset,
            ctx.modifiers(),
        );
        trace!(layout:% = self.layout, rect:% = rect; "Drawing image element");

        let surface = ctx.surface()?;
        match self.layout {
            ImageLayout::Tile => surface.fill_tiled(image, rect),
            _ => surface.draw_image(image, rect),
        }

        if action.has_fill() {
            surface.fill_rect(&brush, rect);
        }

        let bounds = if action.has_edge() {
            surface.stroke_rect(&pen, rect.inflate(pen.half_width(), pen.half_width()));
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
        self.canvas = DEFAULT_CANVAS;
        self.image = None;
        self.layout = ImageLayout::Center;
        self.file_name.clear();
        self.adopt_image_bounds = true;
        self.disposed = false;
    }

    /// Moving or resizing an image by hand switches it to free placement.
    fn apply_transform(&mut self, transform: Transform) {
        self.layout = ImageLayout::None;
        self.core.transform_bounds(transform);
    }

    fn dispose(&mut self) {
        if self.image.take().is_some() {
            trace!(file_name = self.file_name.as_str(); "Released image bitmap");
        }
        self.disposed = true;
    }

    fn short_description(&self) -> String {
        format!("Image: {} ...", abbreviate(&self.file_name))
    }

    fn to_record(&self) -> ElementRecord {
        ElementRecord::Image(ImageRecord {
            core: CoreRecord::from_core(&self.core),
            file_name: self.record_file_name(),
            layout: self.layout,
            canvas: self.canvas,
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
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        color::Color,
        draw::{DrawAction, StrokeDefinition},
        element::testing::{FakeProvider, Op, RecordingSurface},
    };

    const CANVAS: PixelSize = PixelSize::new(800, 600);

    fn edge_style(width: f32) -> StyleDescriptor {
        StyleDescriptor::default()
            .with_draw_action(DrawAction::Edge)
            .with_pen(Rc::new(StrokeDefinition::solid(Color::default(), width)))
    }

    fn draw_once(
        element: &mut ImageElement,
        provider: &FakeProvider,
        modifiers: Modifiers,
    ) -> Vec<Op> {
        let mut surface = RecordingSurface::default();
        let mut ctx = DrawContext::new(&mut surface, provider)
            .with_modifiers(modifiers)
            .with_labels(false);
        element.draw(&mut ctx).unwrap();
        surface.ops
    }

    #[test]
    fn test_zoom_fits_square_into_landscape_canvas() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(400, 400));
        let mut element = ImageElement::new("a.png", "stim", ImageLayout::Zoom, CANVAS);

        let ops = draw_once(&mut element, &provider, Modifiers::NONE);

        let expected = Bounds::from_xywh(100.0, 0.0, 600.0, 600.0);
        assert_eq!(
            ops,
            vec![Op::Image {
                rect: expected,
                size: PixelSize::new(400, 400),
            }]
        );
        assert_eq!(element.bounds(), expected);
    }

    #[test]
    fn test_zoom_fits_wide_image_vertically_centered() {
        let provider = FakeProvider::default().with_image("stim/w.png", PixelSize::new(1600, 600));
        let mut element = ImageElement::new("w.png", "stim", ImageLayout::Zoom, CANVAS);

        draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(element.bounds(), Bounds::from_xywh(0.0, 150.0, 800.0, 300.0));
    }

    #[test]
    fn test_zoom_fills_canvas_of_same_aspect() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(400, 300));
        let mut element = ImageElement::new("a.png", "stim", ImageLayout::Zoom, CANVAS);

        draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(element.bounds(), Bounds::from_xywh(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_zoom_letterboxes_wide_image() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(400, 200));
        let mut element = ImageElement::new("a.png", "stim", ImageLayout::Zoom, CANVAS);

        draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(element.bounds(), Bounds::from_xywh(0.0, 100.0, 800.0, 400.0));
    }

    #[test]
    fn test_zoom_with_edge_keeps_outer_bounds_on_canvas() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(400, 400));
        let mut element =
            ImageElement::new("a.png", "stim", ImageLayout::Zoom, CANVAS).with_style(edge_style(4.0));

        let ops = draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(
            ops,
            vec![
                Op::Image {
                    rect: Bounds::from_xywh(104.0, 4.0, 592.0, 592.0),
                    size: PixelSize::new(400, 400),
                },
                Op::StrokeRect {
                    rect: Bounds::from_xywh(102.0, 2.0, 596.0, 596.0),
                    width: 4.0,
                },
            ]
        );
        assert_eq!(element.bounds(), Bounds::from_xywh(100.0, 0.0, 600.0, 600.0));
    }

    #[test]
    fn test_center_uses_whole_pixel_offsets() {
        let rect = layout_rect(
            ImageLayout::Center,
            CANVAS,
            PixelSize::new(301, 201),
            Bounds::default(),
            0.0,
            Modifiers::NONE,
        );
        assert_eq!(rect, Bounds::from_xywh(250.0, 200.0, 301.0, 201.0));
    }

    #[test]
    fn test_center_ignores_edge_inset() {
        let rect = layout_rect(
            ImageLayout::Center,
            CANVAS,
            PixelSize::new(100, 100),
            Bounds::default(),
            3.0,
            Modifiers::NONE,
        );
        assert_eq!(rect, Bounds::from_xywh(350.0, 250.0, 100.0, 100.0));
    }

    #[test]
    fn test_tile_and_stretch_cover_working_canvas() {
        for layout in [ImageLayout::Tile, ImageLayout::Stretch] {
            let rect = layout_rect(
                layout,
                CANVAS,
                PixelSize::new(10, 10),
                Bounds::default(),
                2.0,
                Modifiers::NONE,
            );
            assert_eq!(rect, Bounds::from_xywh(2.0, 2.0, 796.0, 596.0));
        }
    }

    #[test]
    fn test_tile_draws_tiled_fill() {
        let provider = FakeProvider::default().with_image("stim/t.png", PixelSize::new(16, 16));
        let mut element = ImageElement::new("t.png", "stim", ImageLayout::Tile, CANVAS);

        let ops = draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(
            ops,
            vec![Op::Tiled {
                rect: Bounds::from_xywh(0.0, 0.0, 800.0, 600.0),
            }]
        );
    }

    #[test]
    fn test_free_layout_keeps_bounds() {
        let current = Bounds::from_xywh(40.0, 30.0, 200.0, 120.0);
        let rect = layout_rect(
            ImageLayout::None,
            CANVAS,
            PixelSize::new(400, 300),
            current,
            0.0,
            Modifiers::NONE,
        );
        assert_eq!(rect, current);
    }

    #[test]
    fn test_free_layout_control_snaps_to_natural_size() {
        let rect = layout_rect(
            ImageLayout::None,
            CANVAS,
            PixelSize::new(400, 300),
            Bounds::from_xywh(40.0, 30.0, 200.0, 120.0),
            1.0,
            Modifiers::CONTROL,
        );
        assert_eq!(rect, Bounds::from_xywh(41.0, 31.0, 398.0, 298.0));
    }

    #[test]
    fn test_free_layout_alt_restores_aspect_ratio() {
        let rect = layout_rect(
            ImageLayout::None,
            CANVAS,
            PixelSize::new(400, 300),
            Bounds::from_xywh(40.0, 30.0, 200.0, 120.0),
            0.0,
            Modifiers::ALT,
        );
        assert_eq!(rect, Bounds::from_xywh(40.0, 30.0, 200.0, 150.0));
    }

    #[test]
    fn test_free_layout_alt_rounds_ties_to_even() {
        // 3/4 * 10 = 7.5 rounds to 8, 3/4 * 2 = 1.5 rounds to 2, 3/4 * 14 = 10.5 rounds to 10
        let heights: Vec<f32> = [10.0, 2.0, 14.0]
            .into_iter()
            .map(|width| {
                layout_rect(
                    ImageLayout::None,
                    CANVAS,
                    PixelSize::new(4, 3),
                    Bounds::from_xywh(0.0, 0.0, width, 1.0),
                    0.0,
                    Modifiers::ALT,
                )
                .height()
            })
            .collect();
        assert_eq!(heights, vec![8.0, 2.0, 10.0]);
    }

    #[test]
    fn test_free_layout_ignores_modifier_combinations() {
        let current = Bounds::from_xywh(40.0, 30.0, 200.0, 120.0);
        let rect = layout_rect(
            ImageLayout::None,
            CANVAS,
            PixelSize::new(400, 300),
            current,
            0.0,
            Modifiers::CONTROL | Modifiers::ALT,
        );
        assert_eq!(rect, current);
    }

    #[test]
    fn test_first_materialization_adopts_natural_bounds() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(64, 48));
        let mut element = ImageElement::new("a.png", "stim", ImageLayout::None, CANVAS);
        element
            .core_mut()
            .set_bounds(Bounds::from_xywh(5.0, 5.0, 1.0, 1.0));

        let bitmap = element.stimulus_image(&provider).unwrap();
        assert_eq!(bitmap.size(), PixelSize::new(64, 48));
        assert_eq!(element.bounds(), Bounds::from_xywh(0.0, 0.0, 64.0, 48.0));

        // Later materializations keep the bounds
        element
            .core_mut()
            .set_bounds(Bounds::from_xywh(5.0, 5.0, 10.0, 10.0));
        element.set_stimulus_image(None);
        element.materialize(&provider).unwrap();
        assert_eq!(element.bounds(), Bounds::from_xywh(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_decoded_once_across_frames() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(10, 10));
        let mut element = ImageElement::new("a.png", "stim", ImageLayout::Stretch, CANVAS);

        draw_once(&mut element, &provider, Modifiers::NONE);
        draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(provider.loads.get(), 1);
    }

    #[test]
    fn test_missing_file_placeholder_takes_canvas_size() {
        let provider = FakeProvider::default();
        let mut element = ImageElement::new("gone.png", "stim", ImageLayout::Stretch, CANVAS);

        let ops = draw_once(&mut element, &provider, Modifiers::NONE);

        assert_eq!(
            *provider.placeholders.borrow(),
            vec![(CANVAS, "gone.png not found".to_string())]
        );
        assert_eq!(
            ops,
            vec![Op::Image {
                rect: Bounds::from_xywh(0.0, 0.0, 800.0, 600.0),
                size: CANVAS,
            }]
        );
    }

    #[test]
    fn test_missing_file_placeholder_keeps_element_size() {
        let provider = FakeProvider::default();
        let record = ImageRecord {
            core: CoreRecord {
                bounds: Bounds::from_xywh(10.0, 20.0, 120.0, 90.0),
                ..CoreRecord::default()
            },
            file_name: "gone.png".to_string(),
            layout: ImageLayout::None,
            canvas: CANVAS,
        };
        let mut element = ImageElement::from_record(record, "stim");

        element.materialize(&provider).unwrap();

        assert_eq!(
            provider.placeholders.borrow()[0].0,
            PixelSize::new(120, 90)
        );
        assert_eq!(element.bounds(), Bounds::from_xywh(10.0, 20.0, 120.0, 90.0));
    }

    #[test]
    fn test_missing_file_placeholder_clamps_huge_bounds() {
        let provider = FakeProvider::default();
        let record = ImageRecord {
            core: CoreRecord {
                bounds: Bounds::from_xywh(0.0, 0.0, 1e12, 12.0),
                ..CoreRecord::default()
            },
            file_name: "gone.png".to_string(),
            layout: ImageLayout::None,
            canvas: CANVAS,
        };
        let mut element = ImageElement::from_record(record, "stim");

        let bitmap = element.materialize(&provider).unwrap();

        let clamped = PixelSize::new(MAX_PLACEHOLDER_SIDE, 12);
        assert_eq!(bitmap.size(), clamped);
        assert_eq!(provider.placeholders.borrow()[0].0, clamped);
    }

    #[test]
    fn test_corrupt_file_skips_frame() {
        let provider = FakeProvider::default().with_corrupt("stim/bad.png");
        let mut element = ImageElement::new("bad.png", "stim", ImageLayout::Zoom, CANVAS);

        let ops = draw_once(&mut element, &provider, Modifiers::NONE);

        assert!(ops.is_empty());
        assert!(!element.has_image());
        assert!(matches!(
            element.materialize(&provider),
            Err(ElementError::Decode { .. })
        ));
    }

    #[test]
    fn test_draw_without_surface_is_rejected() {
        let provider = FakeProvider::default().with_image("stim/a.png", PixelSize::new(10, 10));
        let mut element = ImageElement::new("a.png", "stim", ImageLayout::Zoom, CANVAS);

        let result = element.draw(&mut DrawContext::detached(&provider));

        assert!(matches!(result, Err(ElementError::InvalidArgument(_))));
        assert_eq!(provider.loads.get(), 0);
    }

    #[test]
    fn test_empty_file_name_is_fatal() {
        let provider = FakeProvider::default();
        let mut element = ImageElement::new("", "", ImageLayout::Zoom, CANVAS);
        let mut surface = RecordingSurface::default();

        let result = element.draw(&mut DrawContext::new(&mut surface, &provider));

        assert!(matches!(result, Err(ElementError::EmptyIdentifier)));
    }

    #[test]
    fn test_full_path_splits_file_name_without_directory() {
        let mut element = ImageElement::new("pictures/cat.png", "", ImageLayout::Zoom, CANVAS);

        let path = element.full_path().unwrap();

        assert_eq!(path, Path::new("pictures").join("cat.png"));
        assert_eq!(element.file_name(), "cat.png");
        assert_eq!(element.directory(), Path::new("pictures"));
    }

    #[test]
    fn test_full_path_keeps_explicit_directory() {
        let mut element = ImageElement::new("cat.png", "stimuli", ImageLayout::Zoom, CANVAS);
        assert_eq!(element.full_path().unwrap(), Path::new("stimuli").join("cat.png"));

        let mut bare = ImageElement::new("cat.png", "", ImageLayout::Zoom, CANVAS);
        assert_eq!(bare.full_path().unwrap(), PathBuf::from("cat.png"));
        assert_eq!(bare.directory(), Path::new(""));
    }

    #[test]
    fn test_fill_overlays_image_and_edge_surrounds_it() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(100, 100));
        let style = edge_style(2.0).with_draw_action(DrawAction::EdgeFill);
        let mut element =
            ImageElement::new("a.png", "s", ImageLayout::Stretch, PixelSize::new(100, 100))
                .with_style(style)
                .with_name("pic");

        let mut surface = RecordingSurface::default();
        let mut ctx = DrawContext::new(&mut surface, &provider).with_selected(true);
        element.draw(&mut ctx).unwrap();

        let inner = Bounds::from_xywh(1.0, 1.0, 98.0, 98.0);
        let outer = Bounds::from_xywh(-1.0, -1.0, 102.0, 102.0);
        assert_eq!(
            surface.ops,
            vec![
                Op::Image {
                    rect: inner,
                    size: PixelSize::new(100, 100),
                },
                Op::FillRect { rect: inner },
                Op::StrokeRect {
                    rect: Bounds::from_xywh(0.0, 0.0, 100.0, 100.0),
                    width: 2.0,
                },
                Op::Label {
                    text: "pic".to_string(),
                    origin: Point::new(-1.0, -1.0),
                },
                Op::Selection { rect: outer },
            ]
        );
        assert_eq!(element.bounds(), outer);
    }

    #[test]
    fn test_clone_does_not_share_bitmap() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(30, 20));
        let mut element = ImageElement::new("a.png", "s", ImageLayout::Center, CANVAS).with_name("a");
        draw_once(&mut element, &provider, Modifiers::NONE);

        let mut copy = element.clone();
        assert!(element.has_image());
        assert!(!copy.has_image());
        assert_eq!(copy.bounds(), element.bounds());
        assert_eq!(copy.to_string(), element.to_string());

        draw_once(&mut copy, &provider, Modifiers::NONE);
        assert_eq!(copy.bounds(), element.bounds());
        assert_eq!(provider.loads.get(), 2);

        element.dispose();
        assert!(copy.has_image());
    }

    #[test]
    fn test_clone_before_first_draw_adopts_image_size() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(64, 48));
        let mut element = ImageElement::new("a.png", "s", ImageLayout::None, CANVAS);
        let mut copy = element.clone();

        draw_once(&mut element, &provider, Modifiers::NONE);
        draw_once(&mut copy, &provider, Modifiers::NONE);

        let natural = Bounds::from_xywh(0.0, 0.0, 64.0, 48.0);
        assert_eq!(element.bounds(), natural);
        assert_eq!(copy.bounds(), natural);
    }

    #[test]
    fn test_clone_box_is_independent() {
        let element: Box<dyn SceneElement> =
            Box::new(ImageElement::new("a.png", "s", ImageLayout::Zoom, CANVAS).with_name("first"));
        let mut copy = element.clone();
        copy.core_mut().set_name("second");

        assert_eq!(element.name(), "first");
        assert_eq!(copy.kind(), ElementKind::Image);
    }

    #[test]
    fn test_dispose_is_idempotent_and_blocks_drawing() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(30, 20));
        let mut element = ImageElement::new("a.png", "s", ImageLayout::Center, CANVAS);
        draw_once(&mut element, &provider, Modifiers::NONE);

        element.dispose();
        element.dispose();

        assert!(!element.has_image());
        assert!(element.is_disposed());
        let mut surface = RecordingSurface::default();
        let result = element.draw(&mut DrawContext::new(&mut surface, &provider));
        assert!(matches!(result, Err(ElementError::Disposed(_))));
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(30, 20));
        let mut element = ImageElement::new("a.png", "s", ImageLayout::Zoom, CANVAS).with_name("keep");
        draw_once(&mut element, &provider, Modifiers::NONE);

        element.reset();

        assert_eq!(element.canvas(), PixelSize::new(100, 100));
        assert_eq!(element.layout(), ImageLayout::Center);
        assert_eq!(element.file_name(), "");
        assert!(!element.has_image());
        assert_eq!(element.bounds(), Bounds::default());
        assert_eq!(element.name(), "keep");
    }

    #[test]
    fn test_transform_switches_to_free_layout() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(400, 400));
        let mut element = ImageElement::new("a.png", "s", ImageLayout::Zoom, CANVAS);
        draw_once(&mut element, &provider, Modifiers::NONE);

        element.apply_transform(Transform::translation(-50.0, 10.0));
        assert_eq!(element.layout(), ImageLayout::None);

        draw_once(&mut element, &provider, Modifiers::NONE);
        assert_eq!(element.bounds(), Bounds::from_xywh(50.0, 10.0, 600.0, 600.0));
    }

    #[test]
    fn test_descriptions() {
        let element = ImageElement::new("a_longer_name.png", "s", ImageLayout::Tile, CANVAS);
        assert_eq!(element.short_description(), "Image: a_longer_name.pn ...");
        assert_eq!(
            element.to_string(),
            "Image, File: a_longer_name.png ; ImageLayout: Tile ; Bounds: {X=0,Y=0,Width=0,Height=0}"
        );
    }

    #[test]
    fn test_record_round_trip_redraws_identically() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(400, 400));
        let mut element = ImageElement::new("a.png", "s", ImageLayout::Zoom, CANVAS)
            .with_style(edge_style(4.0))
            .with_name("a");
        draw_once(&mut element, &provider, Modifiers::NONE);

        let json = serde_json::to_string(&element.to_record()).unwrap();
        let record: ElementRecord = serde_json::from_str(&json).unwrap();
        let ElementRecord::Image(record) = record else {
            panic!("expected an image record");
        };
        assert_eq!(record.file_name, "a.png");

        let mut restored = ImageElement::from_record(record, "s");
        draw_once(&mut restored, &provider, Modifiers::NONE);

        assert_eq!(restored.bounds(), element.bounds());
        assert_eq!(restored.core().style(), element.core().style());
    }

    #[test]
    fn test_record_of_undrawn_element_adopts_bounds_on_load() {
        let provider = FakeProvider::default().with_image("s/a.png", PixelSize::new(64, 48));
        let element = ImageElement::new("a.png", "s", ImageLayout::None, CANVAS);

        let ElementRecord::Image(record) = element.to_record() else {
            panic!("expected an image record");
        };
        let mut restored = ImageElement::from_record(record, "s");
        draw_once(&mut restored, &provider, Modifiers::NONE);

        assert_eq!(restored.bounds(), Bounds::from_xywh(0.0, 0.0, 64.0, 48.0));
    }

    #[test]
    fn test_record_drops_directory() {
        let element = ImageElement::new("deep/dir/a.png", "", ImageLayout::Zoom, CANVAS);
        let ElementRecord::Image(record) = element.to_record() else {
            panic!("expected an image record");
        };
        assert_eq!(record.file_name, "a.png");
    }

    #[test]
    fn test_from_bitmap_owns_a_copy() {
        let provider = FakeProvider::default();
        let source = Bitmap::solid(PixelSize::new(12, 8), [1, 2, 3, 255]);

        let mut element = ImageElement::from_bitmap(&source, ImageLayout::None, CANVAS, &provider);

        assert_eq!(element.bounds(), Bounds::from_xywh(0.0, 0.0, 12.0, 8.0));
        let bitmap = element.stimulus_image(&provider).unwrap();
        assert_ne!(bitmap.pixels().as_ptr(), source.pixels().as_ptr());
        assert_eq!(provider.loads.get(), 0);
    }

    #[test]
    fn test_zoom_keeps_aspect_ratio() {
        let rect = layout_rect(
            ImageLayout::Zoom,
            CANVAS,
            PixelSize::new(300, 500),
            Bounds::default(),
            0.0,
            Modifiers::NONE,
        );
        assert_approx_eq!(f32, rect.width() / rect.height(), 0.6, epsilon = 0.0001);
        assert_approx_eq!(f32, rect.height(), 600.0);
    }
}
