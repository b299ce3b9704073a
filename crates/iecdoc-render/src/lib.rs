//! # iecdoc-render
//!
//! Lays out grouped student records as transcript pages. Each page is a
//! self-contained SVG surface of fixed CSS-pixel size; capture and PDF
//! assembly live in `iecdoc-pdf`.
//!
//! ## Example
//!
//! ```rust
//! use iecdoc_data::RecordGrouper;
//! use iecdoc_render::{PageKind, TranscriptLayout};
//!
//! let csv = "NAME,COURSE NAME\nAna,Reading\nLi,Writing\n";
//! let dataset = RecordGrouper::default().parse(csv)?;
//!
//! let pages = TranscriptLayout::default().pages(&dataset);
//! assert_eq!(pages.len(), 4);
//! assert_eq!(pages[1].kind(), PageKind::Levels);
//! assert_eq!(pages[2].student(), "Li");
//! # Ok::<(), iecdoc_data::DataError>(())
//! ```

pub mod assets;
pub mod layout;
pub mod surface;
pub mod svg;
pub mod template;

pub use assets::LoadedAssets;
pub use layout::{format_attendance, TranscriptLayout, PAGES_PER_STUDENT};
pub use surface::{PageKind, PageSurface, PAGE_HEIGHT, PAGE_WIDTH};
pub use template::{AssetPaths, GradeBand, LevelDescriptor, TranscriptTemplate};

use iecdoc_data::GroupedDataset;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lay out every student with the given template
pub fn render_pages(dataset: &GroupedDataset, template: TranscriptTemplate) -> Vec<PageSurface> {
    TranscriptLayout::new(template).pages(dataset)
}
