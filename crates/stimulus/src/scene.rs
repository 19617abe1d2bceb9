//! Ordered collections of scene elements.
//!
//! A [`Scene`] owns its elements and draws them in insertion order, so later
//! elements cover earlier ones. One element failing to draw never stops the
//! rest of the frame.

use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use stimulus_core::{
    color::Color,
    draw::{StyleDescriptor, Surface, SvgSurface},
    element::{DrawContext, ElementRecord, ImageElement, ImageLayout, SceneElement},
    geometry::{PixelSize, Point, Transform},
    input::{ModifierObserver, Modifiers},
    resource::ImageResourceProvider,
};

use crate::{StimulusError, document::SceneDocument};

/// Per-frame drawing options.
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub modifiers: Modifiers,
    /// Index of the element drawn with a selection frame.
    pub selected: Option<usize>,
    pub show_labels: bool,
}

impl DrawOptions {
    /// Default options with the modifier state sampled from `observer`.
    pub fn sampled(observer: &dyn ModifierObserver) -> Self {
        Self {
            modifiers: observer.current_modifiers(),
            ..Self::default()
        }
    }
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            selected: None,
            show_labels: true,
        }
    }
}

/// Outcome of a scene draw pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawReport {
    pub drawn: usize,
    pub failed: usize,
}

/// An ordered set of elements on one presentation canvas.
#[derive(Debug, Clone)]
pub struct Scene {
    canvas: PixelSize,
    stimulus_dir: PathBuf,
    default_style: StyleDescriptor,
    elements: Vec<Box<dyn SceneElement>>,
}

impl Scene {
    pub fn new(canvas: PixelSize) -> Self {
        Self {
            canvas,
            stimulus_dir: PathBuf::new(),
            default_style: StyleDescriptor::default(),
            elements: Vec::new(),
        }
    }

    pub fn with_stimulus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stimulus_dir = dir.into();
        self
    }

    pub fn with_default_style(mut self, style: StyleDescriptor) -> Self {
        self.default_style = style;
        self
    }

    /// Rebuilds a scene from its document, resolving image files in
    /// `stimulus_dir`.
    /// Image records without a canvas of their own use the document canvas.
    pub fn from_document(document: SceneDocument, stimulus_dir: &Path) -> Self {
        let canvas = document.canvas;
        let elements = document
            .elements
            .into_iter()
            .map(|mut record| {
                if let ElementRecord::Image(image) = &mut record {
                    if image.canvas.is_empty() {
                        image.canvas = canvas;
                    }
                }
                record.into_element(stimulus_dir)
            })
            .collect();
        Self {
            canvas: document.canvas,
            stimulus_dir: stimulus_dir.to_path_buf(),
            default_style: StyleDescriptor::default(),
            elements,
        }
    }

    pub fn to_document(&self) -> SceneDocument {
        SceneDocument::new(
            self.canvas,
            self.elements.iter().map(|element| element.to_record()).collect(),
        )
    }

    pub fn canvas(&self) -> PixelSize {
        self.canvas
    }

    pub fn stimulus_dir(&self) -> &Path {
        &self.stimulus_dir
    }

    pub fn default_style(&self) -> &StyleDescriptor {
        &self.default_style
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Box<dyn SceneElement>] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&dyn SceneElement> {
        self.elements.get(index).map(|element| &**element)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn SceneElement>> {
        self.elements.get_mut(index)
    }

    /// Index of the first element called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.name() == name)
    }

    /// Adds an element on top of the scene and returns its index.
    pub fn push(&mut self, element: Box<dyn SceneElement>) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Adds an image from the stimulus directory using the scene's canvas
    /// and default style.
    pub fn add_image(&mut self, file_name: &str, layout: ImageLayout) -> usize {
        let element = ImageElement::new(file_name, &self.stimulus_dir, layout, self.canvas)
            .with_style(self.default_style.clone())
            .with_name(file_name);
        self.push(Box::new(element))
    }

    /// Removes and disposes the element at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn SceneElement>> {
        if index >= self.elements.len() {
            return None;
        }
        let mut element = self.elements.remove(index);
        element.dispose();
        Some(element)
    }

    /// Index of the top-most element whose bounds contain `point`.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|element| element.bounds().contains_point(point))
    }

    /// Moves the element at `index` by `(dx, dy)`. Returns false for an
    /// unknown index.
    pub fn translate_element(&mut self, index: usize, dx: f32, dy: f32) -> bool {
        match self.elements.get_mut(index) {
            Some(element) => {
                element.apply_transform(Transform::translation(dx, dy));
                true
            }
            None => false,
        }
    }

    /// Draws all elements bottom to top.
    ///
    /// Failing elements are logged and skipped; the report counts them.
    pub fn draw(
        &mut self,
        surface: &mut dyn Surface,
        resources: &dyn ImageResourceProvider,
        options: DrawOptions,
    ) -> DrawReport {
        let mut report = DrawReport::default();

        for (index, element) in self.elements.iter_mut().enumerate() {
            let label = element_label(&**element, index);
            surface.begin_element(&label);

            let mut ctx = DrawContext::new(&mut *surface, resources)
                .with_modifiers(options.modifiers)
                .with_selected(options.selected == Some(index))
                .with_labels(options.show_labels);

            match element.draw(&mut ctx) {
                Ok(()) => {
                    report.drawn += 1;
                    trace!(element = label.as_str(), bounds:% = element.bounds(); "Element drawn");
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(element = label.as_str(), err:% = err; "Skipping element that failed to draw");
                }
            }

            surface.end_element();
        }

        debug!(drawn = report.drawn, failed = report.failed; "Scene drawn");
        report
    }

    /// Draws a single element, propagating its error.
    pub fn draw_element(
        &mut self,
        index: usize,
        surface: &mut dyn Surface,
        resources: &dyn ImageResourceProvider,
        options: DrawOptions,
    ) -> Result<(), StimulusError> {
        let Some(element) = self.elements.get_mut(index) else {
            return Err(StimulusError::Export(format!("no element at index {index}")));
        };
        let label = element_label(&**element, index);
        surface.begin_element(&label);

        let mut ctx = DrawContext::new(&mut *surface, resources)
            .with_modifiers(options.modifiers)
            .with_selected(options.selected == Some(index))
            .with_labels(options.show_labels);
        let result = element.draw(&mut ctx);

        surface.end_element();
        Ok(result?)
    }

    /// Renders the whole scene into an SVG document string.
    pub fn render_svg(
        &mut self,
        resources: &dyn ImageResourceProvider,
        options: DrawOptions,
        background: Option<Color>,
    ) -> String {
        let mut surface = SvgSurface::new(self.canvas);
        if let Some(color) = background {
            surface = surface.with_background(color);
        }
        self.draw(&mut surface, resources, options);
        surface.to_svg_string()
    }

    /// Releases the resources of every element.
    pub fn dispose(&mut self) {
        for element in &mut self.elements {
            element.dispose();
        }
    }
}

fn element_label(element: &dyn SceneElement, index: usize) -> String {
    if element.name().is_empty() {
        format!("{}-{index}", element.kind())
    } else {
        element.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use stimulus_core::{
        element::{ElementKind, ShapeElement, ShapeKind},
        geometry::Bounds,
        resource::FsImageProvider,
    };

    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Box<dyn SceneElement> {
        Box::new(ShapeElement::new(
            ShapeKind::Rectangle,
            Bounds::from_xywh(x, y, w, h),
        ))
    }

    #[derive(Default)]
    struct NameLog(RefCell<Vec<String>>);

    impl Surface for NameLog {
        fn draw_image(&mut self, _: &stimulus_core::resource::Bitmap, _: Bounds) {}
        fn fill_tiled(&mut self, _: &stimulus_core::resource::Bitmap, _: Bounds) {}
        fn fill_rect(&mut self, _: &stimulus_core::draw::FillDefinition, _: Bounds) {}
        fn fill_ellipse(&mut self, _: &stimulus_core::draw::FillDefinition, _: Bounds) {}
        fn stroke_rect(&mut self, _: &stimulus_core::draw::StrokeDefinition, _: Bounds) {}
        fn stroke_ellipse(&mut self, _: &stimulus_core::draw::StrokeDefinition, _: Bounds) {}
        fn stroke_line(&mut self, _: &stimulus_core::draw::StrokeDefinition, _: Point, _: Point) {}
        fn draw_text(&mut self, _: &str, _: &stimulus_core::draw::FontDefinition, _: Color, _: Point) {}
        fn draw_label(&mut self, _: &str, _: &stimulus_core::draw::FontDefinition, _: Color, _: Point) {}
        fn draw_selection_frame(&mut self, _: Bounds) {}

        fn begin_element(&mut self, name: &str) {
            self.0.borrow_mut().push(name.to_string());
        }
    }

    #[test]
    fn test_hit_test_prefers_top_most() {
        let mut scene = Scene::new(PixelSize::new(100, 100));
        scene.push(rect(0.0, 0.0, 50.0, 50.0));
        scene.push(rect(25.0, 25.0, 50.0, 50.0));

        assert_eq!(scene.hit_test(Point::new(30.0, 30.0)), Some(1));
        assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), Some(0));
        assert_eq!(scene.hit_test(Point::new(90.0, 5.0)), None);
    }

    #[test]
    fn test_draw_isolates_failing_elements() {
        let mut scene = Scene::new(PixelSize::new(100, 100));
        scene.push(rect(0.0, 0.0, 10.0, 10.0));
        scene.push(Box::new(ImageElement::new(
            "",
            "",
            ImageLayout::Zoom,
            PixelSize::new(100, 100),
        )));
        scene.push(rect(20.0, 20.0, 10.0, 10.0));

        let mut surface = NameLog::default();
        let report = scene.draw(&mut surface, &FsImageProvider, DrawOptions::default());

        assert_eq!(report, DrawReport { drawn: 2, failed: 1 });
        assert_eq!(
            *surface.0.borrow(),
            vec!["rectangle-0", "image-1", "rectangle-2"]
        );
    }

    #[test]
    fn test_draw_element_propagates_errors() {
        let mut scene = Scene::new(PixelSize::new(100, 100));
        scene.push(Box::new(ImageElement::new(
            "",
            "",
            ImageLayout::Zoom,
            PixelSize::new(100, 100),
        )));

        let mut surface = NameLog::default();
        let result = scene.draw_element(0, &mut surface, &FsImageProvider, DrawOptions::default());
        assert!(matches!(result, Err(StimulusError::Element(_))));

        let result = scene.draw_element(5, &mut surface, &FsImageProvider, DrawOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_translate_and_remove() {
        let mut scene = Scene::new(PixelSize::new(100, 100));
        scene.push(rect(0.0, 0.0, 10.0, 10.0));

        assert!(scene.translate_element(0, 5.0, 5.0));
        assert!(!scene.translate_element(3, 5.0, 5.0));
        assert_eq!(
            scene.elements()[0].bounds(),
            Bounds::from_xywh(5.0, 5.0, 10.0, 10.0)
        );

        let removed = scene.remove(0).unwrap();
        assert_eq!(removed.kind(), ElementKind::Rectangle);
        assert!(scene.is_empty());
        assert!(scene.remove(0).is_none());
    }

    #[test]
    fn test_add_image_uses_scene_settings() {
        let style = StyleDescriptor::default().with_element_group("faces");
        let mut scene = Scene::new(PixelSize::new(640, 480))
            .with_stimulus_dir("stimuli")
            .with_default_style(style);

        let index = scene.add_image("face.png", ImageLayout::Center);

        let element = scene.get_mut(index).unwrap();
        assert_eq!(element.name(), "face.png");
        assert_eq!(element.core().element_group(), "faces");
        let image = element
            .as_any_mut()
            .downcast_mut::<ImageElement>()
            .unwrap();
        assert_eq!(image.canvas(), PixelSize::new(640, 480));
        assert_eq!(
            image.full_path().unwrap(),
            Path::new("stimuli").join("face.png")
        );
    }

    #[test]
    fn test_document_round_trip() {
        let mut scene = Scene::new(PixelSize::new(320, 240));
        scene.push(rect(1.0, 2.0, 3.0, 4.0));
        scene.add_image("a.png", ImageLayout::Tile);

        let restored = Scene::from_document(scene.to_document(), Path::new("elsewhere"));

        assert_eq!(restored.canvas(), PixelSize::new(320, 240));
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.get(1).unwrap().kind(), ElementKind::Image);
        assert_eq!(restored.stimulus_dir(), Path::new("elsewhere"));
    }

    #[test]
    fn test_image_records_inherit_document_canvas() {
        let document = SceneDocument::from_json(
            r#"{ "canvas": { "width": 320, "height": 240 },
                 "elements": [ { "kind": "image", "core": {}, "file_name": "a.png" } ] }"#,
        )
        .unwrap();

        let mut scene = Scene::from_document(document, Path::new("stim"));

        let image = scene
            .get_mut(0)
            .unwrap()
            .as_any_mut()
            .downcast_mut::<ImageElement>()
            .unwrap();
        assert_eq!(image.canvas(), PixelSize::new(320, 240));
    }

    #[test]
    fn test_sampled_options_take_observer_state() {
        let held = Modifiers::CONTROL;
        let options = DrawOptions::sampled(&held);
        assert_eq!(options.modifiers, Modifiers::CONTROL);
        assert!(options.show_labels);

        let options = DrawOptions::sampled(&stimulus_core::input::NoModifiers);
        assert_eq!(options.modifiers, Modifiers::NONE);
    }
}
