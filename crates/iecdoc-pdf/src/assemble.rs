//! Multi-page PDF assembly from captured page images.
//!
//! Each page is a single full-bleed image XObject (DeviceRGB, FlateDecode)
//! scaled to a fixed page width; the page height follows the image aspect
//! ratio. Objects are allocated in order as:
//!
//! ```text
//! 1 0 obj  Catalog
//! 2 0 obj  Pages
//! 3 0 obj  Info
//! 4 0 obj  Page 1      5 0 obj  Contents 1      6 0 obj  Image 1
//! 7 0 obj  Page 2      ...
//! ```

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::capture::RasterImage;
use crate::error::{ExportError, Result};

/// A4 width in PostScript points
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 595.28;

/// Value written to the document's `/Producer` entry
pub const PRODUCER: &str = "iecdoc";

const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// Size of one output page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Source image width in pixels
    pub pixel_width: u32,
    /// Source image height in pixels
    pub pixel_height: u32,
    /// Page width in points
    pub width_pt: f32,
    /// Page height in points
    pub height_pt: f32,
}

impl PageGeometry {
    /// Geometry of a page `page_width_pt` wide holding a `width` × `height` image
    pub fn fit_width(width: u32, height: u32, page_width_pt: f32) -> Self {
        Self {
            pixel_width: width,
            pixel_height: height,
            width_pt: page_width_pt,
            height_pt: height as f32 * page_width_pt / width as f32,
        }
    }
}

struct PdfPage {
    geometry: PageGeometry,
    data: Vec<u8>,
}

/// A PDF document being built page by page
pub struct PdfDocument {
    page_width_pt: f32,
    title: String,
    pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn new(page_width_pt: f32, title: impl Into<String>) -> Self {
        Self {
            page_width_pt,
            title: title.into(),
            pages: Vec::new(),
        }
    }

    /// Decode, flatten and compress one captured image as the next page
    pub fn add_page(&mut self, image: &RasterImage) -> Result<PageGeometry> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ExportError::Assembly(format!(
                "page {} has an empty image",
                self.pages.len() + 1
            )));
        }

        let pixmap = tiny_skia::Pixmap::decode_png(image.png()).map_err(|e| {
            ExportError::Assembly(format!(
                "page {} image could not be decoded: {}",
                self.pages.len() + 1,
                e
            ))
        })?;
        if (pixmap.width(), pixmap.height()) != (image.width(), image.height()) {
            return Err(ExportError::Assembly(format!(
                "page {} image is {}x{} but was captured as {}x{}",
                self.pages.len() + 1,
                pixmap.width(),
                pixmap.height(),
                image.width(),
                image.height()
            )));
        }

        let len = (pixmap.width() as usize)
            .checked_mul(pixmap.height() as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| ExportError::Assembly("page image is too large".to_string()))?;

        // Composite premultiplied RGBA over white
        let mut rgb = Vec::with_capacity(len);
        for pixel in pixmap.pixels() {
            let backdrop = 255 - pixel.alpha();
            rgb.extend_from_slice(&[
                pixel.red() + backdrop,
                pixel.green() + backdrop,
                pixel.blue() + backdrop,
            ]);
        }

        let data = flate_compress(&rgb)?;
        let geometry = PageGeometry::fit_width(image.width(), image.height(), self.page_width_pt);
        log::trace!(
            "Page {}: {}x{} px -> {:.2}x{:.2} pt, {} bytes compressed",
            self.pages.len() + 1,
            geometry.pixel_width,
            geometry.pixel_height,
            geometry.width_pt,
            geometry.height_pt,
            data.len()
        );

        self.pages.push(PdfPage { geometry, data });
        Ok(geometry)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Geometry of every page added so far
    pub fn geometry(&self) -> Vec<PageGeometry> {
        self.pages.iter().map(|p| p.geometry).collect()
    }

    /// Serialize the document
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(ExportError::Assembly("document has no pages".to_string()));
        }

        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let info_id = alloc.bump();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.document_info(info_id)
            .title(TextStr(&self.title))
            .producer(TextStr(PRODUCER));

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let page_id = alloc.bump();
            let contents_id = alloc.bump();
            let image_id = alloc.bump();
            page_ids.push(page_id);

            let PageGeometry {
                pixel_width,
                pixel_height,
                width_pt,
                height_pt,
            } = page.geometry;
            let (width_px, height_px) = (pdf_int(pixel_width)?, pdf_int(pixel_height)?);

            let mut page_obj = pdf.page(page_id);
            page_obj.media_box(Rect::new(0.0, 0.0, width_pt, height_pt));
            page_obj.parent(page_tree_id);
            page_obj.contents(contents_id);
            page_obj.resources().x_objects().pair(IMAGE_NAME, image_id);
            page_obj.finish();

            let mut content = Content::new();
            content.save_state();
            content.transform([width_pt, 0.0, 0.0, height_pt, 0.0, 0.0]);
            content.x_object(IMAGE_NAME);
            content.restore_state();
            pdf.stream(contents_id, &content.finish());

            let mut image = pdf.image_xobject(image_id, &page.data);
            image.filter(Filter::FlateDecode);
            image.width(width_px);
            image.height(height_px);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();
        }

        let count = pdf_int(page_ids.len())?;
        pdf.pages(page_tree_id).kids(page_ids).count(count);

        Ok(pdf.finish())
    }
}

fn pdf_int<T>(value: T) -> Result<i32>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| ExportError::Assembly(format!("{} exceeds the PDF integer range", value)))
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| ExportError::Assembly(format!("compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ExportError::Assembly(format!("compression failed: {}", e)))
}
