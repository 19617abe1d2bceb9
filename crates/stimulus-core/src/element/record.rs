//! Persistent form of scene elements.
//!
//! Records hold exactly the state that survives a save: geometry, style,
//! name and the variant's own parameters. Decoded bitmaps and image
//! directories are never stored; image records keep only the bare file name
//! and are resolved against a stimulus directory when loaded.
//!
//! # Examples
//!
//! ```
//! # use std::path::Path;
//! # use stimulus_core::element::{ElementRecord, SceneElement, ShapeElement, ShapeKind};
//! # use stimulus_core::geometry::Bounds;
//! let shape = ShapeElement::new(ShapeKind::Ellipse, Bounds::from_xywh(0.0, 0.0, 10.0, 5.0))
//!     .with_name("dot");
//! let json = serde_json::to_string(&shape.to_record()).unwrap();
//! assert!(json.contains("\"kind\":\"shape\""));
//!
//! let record: ElementRecord = serde_json::from_str(&json).unwrap();
//! let element = record.into_element(Path::new("."));
//! assert_eq!(element.name(), "dot");
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    draw::StyleDescriptor,
    element::{
        ElementCore, ImageElement, ImageLayout, LineElement, SceneElement, ShapeElement,
        ShapeKind, TextElement,
    },
    geometry::{Bounds, PixelSize, Point},
};

/// State shared by every element record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoreRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub style: StyleDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<PathBuf>,
}

impl CoreRecord {
    pub fn from_core(core: &ElementCore) -> Self {
        Self {
            name: core.name().to_string(),
            bounds: core.bounds(),
            style: core.style().clone(),
            sound: core.sound().cloned(),
        }
    }

    pub fn into_core(self) -> ElementCore {
        let mut core = ElementCore::new(self.style, self.bounds, self.name);
        core.set_sound(self.sound);
        core
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub core: CoreRecord,
    /// Bare file name, without directory.
    pub file_name: String,
    #[serde(default)]
    pub layout: ImageLayout,
    #[serde(default)]
    pub canvas: PixelSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub core: CoreRecord,
    pub shape: ShapeKind,
    pub rect: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub core: CoreRecord,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub core: CoreRecord,
    pub text: String,
    pub origin: Point,
}

/// A saved element of any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementRecord {
    Image(ImageRecord),
    Shape(ShapeRecord),
    Line(LineRecord),
    Text(TextRecord),
}

impl ElementRecord {
    pub fn core(&self) -> &CoreRecord {
        match self {
            Self::Image(record) => &record.core,
            Self::Shape(record) => &record.core,
            Self::Line(record) => &record.core,
            Self::Text(record) => &record.core,
        }
    }

    /// Rebuilds the element. Image files are looked up in `stimulus_dir`.
    pub fn into_element(self, stimulus_dir: &Path) -> Box<dyn SceneElement> {
        match self {
            Self::Image(record) => Box::new(ImageElement::from_record(record, stimulus_dir)),
            Self::Shape(record) => Box::new(ShapeElement::from(record)),
            Self::Line(record) => Box::new(LineElement::from(record)),
            Self::Text(record) => Box::new(TextElement::from(record)),
        }
    }
}
