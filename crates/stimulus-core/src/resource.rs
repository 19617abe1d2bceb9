//! Bitmap resources and the providers that materialize them.
//!
//! Elements never decode files themselves. They ask an
//! [`ImageResourceProvider`] to load a path, to synthesize a placeholder for
//! a missing file, or to copy an in-memory bitmap. [`FsImageProvider`] is the
//! filesystem implementation used by the scene and the CLI.
//!
//! Every [`Bitmap`] owns its pixel buffer. Decoding reads the whole file into
//! memory first, so no file handle outlives the call.

use std::{
    fmt, fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, trace};
use thiserror::Error;

use crate::geometry::PixelSize;

const PLACEHOLDER_BACKGROUND: Rgba<u8> = Rgba([224, 224, 224, 255]);
const PLACEHOLDER_FRAME: Rgba<u8> = Rgba([96, 96, 96, 255]);
const PLACEHOLDER_CROSS: Rgba<u8> = Rgba([200, 40, 40, 255]);

/// Largest placeholder side in pixels; larger requests are clamped.
pub const MAX_PLACEHOLDER_SIDE: u32 = 8192;

/// Failures of the image resource layer.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read image file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode bitmap: {0}")]
    Encode(#[source] image::ImageError),
}

/// A decoded RGBA bitmap owned by exactly one element.
///
/// `Bitmap` is not `Clone`; copies go through
/// [`ImageResourceProvider::clone_in_memory`].
pub struct Bitmap {
    pixels: RgbaImage,
    caption: Option<String>,
}

impl Bitmap {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            caption: None,
        }
    }

    /// Creates a bitmap of uniform color.
    pub fn solid(size: PixelSize, color: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(size.width(), size.height(), Rgba(color)))
    }

    /// Creates the stand-in for an image file that could not be found.
    ///
    /// The bitmap is a grey field with a dark frame and a red cross. The
    /// caption travels with the bitmap so the surface can print it.
    ///
    /// ```
    /// # use stimulus_core::geometry::PixelSize;
    /// # use stimulus_core::resource::Bitmap;
    /// let bitmap = Bitmap::placeholder(PixelSize::new(40, 30), "face.png not found");
    /// assert_eq!(bitmap.size(), PixelSize::new(40, 30));
    /// assert_eq!(bitmap.caption(), Some("face.png not found"));
    /// ```
    pub fn placeholder(size: PixelSize, caption: &str) -> Self {
        let width = size.width().min(MAX_PLACEHOLDER_SIDE);
        let height = size.height().min(MAX_PLACEHOLDER_SIDE);
        let mut pixels = RgbaImage::from_pixel(width, height, PLACEHOLDER_BACKGROUND);

        if width > 0 && height > 0 {
            for x in 0..width {
                pixels.put_pixel(x, 0, PLACEHOLDER_FRAME);
                pixels.put_pixel(x, height - 1, PLACEHOLDER_FRAME);
            }
            for y in 0..height {
                pixels.put_pixel(0, y, PLACEHOLDER_FRAME);
                pixels.put_pixel(width - 1, y, PLACEHOLDER_FRAME);
            }

            let steps = width.max(height);
            for step in 0..steps {
                let x = (u64::from(step) * u64::from(width) / u64::from(steps)) as u32;
                let y = (u64::from(step) * u64::from(height) / u64::from(steps)) as u32;
                pixels.put_pixel(x, y, PLACEHOLDER_CROSS);
                pixels.put_pixel(width - 1 - x, y, PLACEHOLDER_CROSS);
            }
        }

        Self {
            pixels,
            caption: Some(caption.to_string()),
        }
    }

    /// Natural pixel size of the bitmap.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.pixels.width(), self.pixels.height())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Text printed over the bitmap, set for placeholders.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Returns a deep copy with its own pixel buffer.
    pub fn duplicate(&self) -> Self {
        Self {
            pixels: self.pixels.clone(),
            caption: self.caption.clone(),
        }
    }

    /// Encodes the bitmap as a `data:image/png;base64,...` URL.
    pub fn to_png_data_url(&self) -> Result<String, ResourceError> {
        let mut bytes: Vec<u8> = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(ResourceError::Encode)?;
        let encoded = general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:image/png;base64,{encoded}"))
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("size", &self.size())
            .field("caption", &self.caption)
            .finish_non_exhaustive()
    }
}

/// Source of decoded bitmaps for image elements.
pub trait ImageResourceProvider {
    /// Decodes the file at `path` into a private in-memory bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if `path` is not an existing file,
    /// and [`ResourceError::Io`] or [`ResourceError::Decode`] if the file
    /// exists but cannot be read as an image.
    fn load_from_path(&self, path: &Path) -> Result<Bitmap, ResourceError>;

    /// Produces a placeholder bitmap of `size` carrying `caption`. Never fails.
    fn create_placeholder(&self, size: PixelSize, caption: &str) -> Bitmap {
        Bitmap::placeholder(size, caption)
    }

    /// Copies a bitmap into a new, independently owned buffer.
    fn clone_in_memory(&self, bitmap: &Bitmap) -> Bitmap {
        bitmap.duplicate()
    }
}

/// Loads bitmaps from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageProvider;

impl FsImageProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ImageResourceProvider for FsImageProvider {
    fn load_from_path(&self, path: &Path) -> Result<Bitmap, ResourceError> {
        if !path.is_file() {
            return Err(ResourceError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        trace!(path:? = path, bytes = bytes.len(); "Read image file");

        let decoded = image::load_from_memory(&bytes).map_err(|source| ResourceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let bitmap = Bitmap::new(decoded.to_rgba8());

        debug!(path:? = path, size:% = bitmap.size(); "Decoded image file");
        Ok(bitmap)
    }
}
