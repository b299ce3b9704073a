//! # iecdoc-pdf
//!
//! Turns laid-out transcript pages into one multi-page PDF.
//!
//! The [`ExportDriver`] captures each [`PageSurface`](iecdoc_render::PageSurface)
//! through a [`CaptureBackend`], strictly in order, and assembles the
//! captured images into a single document whose pages share a fixed width.
//!
//! ## Example
//!
//! ```no_run
//! use iecdoc_data::RecordGrouper;
//! use iecdoc_pdf::ExportDriver;
//! use iecdoc_render::TranscriptLayout;
//!
//! let dataset = RecordGrouper::default().parse_file("roster.csv")?;
//! let pages = TranscriptLayout::default().pages(&dataset);
//!
//! let artifact = ExportDriver::default().export_all(&pages)?;
//! artifact.write_to(".")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod assemble;
pub mod capture;
pub mod control;
pub mod driver;
pub mod error;
pub mod session;

pub use artifact::{ExportArtifact, DEFAULT_FILE_NAME};
pub use assemble::{PageGeometry, PdfDocument, DEFAULT_PAGE_WIDTH_PT};
pub use capture::{CaptureBackend, CaptureOptions, RasterImage, SvgRasterizer, DEFAULT_SCALE};
pub use control::{CancelToken, ExportControl};
pub use driver::{ExportDriver, ExportOptions, ExportState};
pub use error::{CaptureFailure, ExportError, Result};
pub use session::{export_session, export_session_with};
