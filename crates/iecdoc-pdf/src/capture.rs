//! Page capture: turn a page surface into a fixed-resolution raster image.
//!
//! [`CaptureBackend`] is the seam between the export driver and whatever
//! draws the pages. [`SvgRasterizer`] is the shipped backend: it parses the
//! surface with `usvg`, renders it with `resvg` onto a white `tiny-skia`
//! pixmap and PNG-encodes the result.

use std::path::Path;
use std::sync::Arc;

use iecdoc_render::PageSurface;

use crate::error::CaptureFailure;

/// Default capture scale (device pixels per CSS pixel)
pub const DEFAULT_SCALE: f32 = 2.0;

/// Options for a single capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Device pixels per CSS pixel
    pub scale: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl CaptureOptions {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// A captured page: PNG bytes plus their pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// PNG-encoded pixels
    pub fn png(&self) -> &[u8] {
        &self.png
    }
}

/// Something that can capture page surfaces
///
/// Implementations must be deterministic for a given surface and options;
/// the export driver calls `capture` once per page, in order, and never
/// concurrently.
pub trait CaptureBackend {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Capture one surface
    fn capture(
        &self,
        surface: &PageSurface,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureFailure>;
}

impl<T: CaptureBackend + ?Sized> CaptureBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn capture(
        &self,
        surface: &PageSurface,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureFailure> {
        (**self).capture(surface, options)
    }
}

/// SVG page rasterizer backed by resvg
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRasterizer {
    /// Create a rasterizer with system fonts loaded
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();

        if fontdb.is_empty() {
            log::warn!("No system fonts found, page text will not be drawn");
        }

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a rasterizer with no fonts; add them with the `with_font_*` methods
    pub fn without_system_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Add a font file (TTF, OTF or collection)
    pub fn with_font_file(mut self, path: impl AsRef<Path>) -> std::io::Result<Self> {
        Arc::make_mut(&mut self.fontdb).load_font_file(path)?;
        Ok(self)
    }

    /// Add every font found under a directory
    pub fn with_font_dir(mut self, dir: impl AsRef<Path>) -> Self {
        Arc::make_mut(&mut self.fontdb).load_fonts_dir(dir);
        self
    }

    /// Add a font from memory
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        Arc::make_mut(&mut self.fontdb).load_font_data(data);
        self
    }

    /// Number of font faces available for text
    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }
}

impl CaptureBackend for SvgRasterizer {
    fn name(&self) -> &'static str {
        "resvg"
    }

    fn capture(
        &self,
        surface: &PageSurface,
        options: &CaptureOptions,
    ) -> Result<RasterImage, CaptureFailure> {
        if !(options.scale.is_finite() && options.scale > 0.0) {
            return Err(CaptureFailure::Raster(format!(
                "invalid capture scale {}",
                options.scale
            )));
        }

        let tree = {
            let mut opts = usvg::Options::default();
            opts.fontdb = Arc::clone(&self.fontdb);
            usvg::Tree::from_str(surface.markup(), &opts)
                .map_err(|e| CaptureFailure::InvalidSurface(e.to_string()))?
        };

        let size = tree.size();
        let width = (size.width() * options.scale).round() as u32;
        let height = (size.height() * options.scale).round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            CaptureFailure::Raster(format!("cannot allocate a {}x{} pixmap", width, height))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = tiny_skia::Transform::from_scale(options.scale, options.scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|e| CaptureFailure::Encode(e.to_string()))?;

        log::trace!("Captured {} at {}x{}", surface, width, height);
        Ok(RasterImage::new(width, height, png))
    }
}
