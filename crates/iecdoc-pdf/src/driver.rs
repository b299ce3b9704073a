//! Batch export driver: capture every page in order, then assemble one PDF.
//!
//! ```text
//! Idle ─► Capturing(0) ─► Capturing(1) ─► … ─► Assembling ─► Done
//!              │               │                   │
//!              └───────────────┴───────────────────┴──► Failed
//! ```
//!
//! Captures run strictly one after another on the calling thread. The first
//! captured image starts the document and every later image appends a page,
//! so page order is always input order. Any failure drops everything built
//! so far.

use std::fmt;
use std::time::Instant;

use iecdoc_render::PageSurface;

use crate::artifact::{ExportArtifact, DEFAULT_FILE_NAME};
use crate::assemble::{PdfDocument, DEFAULT_PAGE_WIDTH_PT};
use crate::capture::{CaptureBackend, CaptureOptions, SvgRasterizer};
use crate::control::ExportControl;
use crate::error::{CaptureFailure, ExportError, Result};

/// Progress of one export invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    /// Capturing the page at this index
    Capturing(usize),
    Assembling,
    Done,
    Failed,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportState::Idle => write!(f, "idle"),
            ExportState::Capturing(i) => write!(f, "capturing page {}", i + 1),
            ExportState::Assembling => write!(f, "assembling"),
            ExportState::Done => write!(f, "done"),
            ExportState::Failed => write!(f, "failed"),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Output page width in points; heights follow each image's aspect ratio
    pub page_width_pt: f32,
    /// Name of the produced file
    pub file_name: String,
    /// Document title stored in the PDF info dictionary
    pub title: String,
    /// Capture settings passed to the backend
    pub capture: CaptureOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_width_pt: DEFAULT_PAGE_WIDTH_PT,
            file_name: DEFAULT_FILE_NAME.to_string(),
            title: "Transcripts".to_string(),
            capture: CaptureOptions::default(),
        }
    }
}

/// Captures page surfaces with a backend and assembles the PDF
pub struct ExportDriver {
    backend: Box<dyn CaptureBackend>,
    options: ExportOptions,
}

impl Default for ExportDriver {
    fn default() -> Self {
        Self::new(SvgRasterizer::new())
    }
}

impl ExportDriver {
    /// Create a driver with default options
    pub fn new(backend: impl CaptureBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Export every surface into one PDF
    pub fn export_all(&self, surfaces: &[PageSurface]) -> Result<ExportArtifact> {
        self.export_all_with(surfaces, &ExportControl::default(), &mut |_: &ExportState| {})
    }

    /// Export with cancellation, a capture time limit and progress reporting
    ///
    /// `observer` sees every state transition, ending in either
    /// [`ExportState::Done`] or [`ExportState::Failed`].
    pub fn export_all_with(
        &self,
        surfaces: &[PageSurface],
        control: &ExportControl,
        observer: &mut dyn FnMut(&ExportState),
    ) -> Result<ExportArtifact> {
        let mut report = |state: ExportState| {
            log::debug!("Export {}", state);
            observer(&state);
        };

        report(ExportState::Idle);
        match self.run(surfaces, control, &mut report) {
            Ok(artifact) => {
                report(ExportState::Done);
                Ok(artifact)
            }
            Err(e) => {
                report(ExportState::Failed);
                log::debug!("Export failed: {}", e);
                Err(e)
            }
        }
    }

    fn run(
        &self,
        surfaces: &[PageSurface],
        control: &ExportControl,
        report: &mut dyn FnMut(ExportState),
    ) -> Result<ExportArtifact> {
        if surfaces.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let mut document: Option<PdfDocument> = None;

        for (index, surface) in surfaces.iter().enumerate() {
            if control.is_cancelled() {
                return Err(ExportError::Capture {
                    index,
                    source: CaptureFailure::Cancelled,
                });
            }

            report(ExportState::Capturing(index));
            // No clock is read unless a limit is set
            let started = control.capture_timeout().map(|limit| (limit, Instant::now()));
            let image = self
                .backend
                .capture(surface, &self.options.capture)
                .map_err(|source| ExportError::Capture { index, source })?;

            if let Some((limit, started)) = started {
                let elapsed = started.elapsed();
                if elapsed > limit {
                    return Err(ExportError::Capture {
                        index,
                        source: CaptureFailure::Timeout {
                            limit_ms: limit.as_millis(),
                            elapsed_ms: elapsed.as_millis(),
                        },
                    });
                }
            }

            document
                .get_or_insert_with(|| {
                    PdfDocument::new(self.options.page_width_pt, self.options.title.clone())
                })
                .add_page(&image)?;
        }

        report(ExportState::Assembling);
        let document = document.ok_or(ExportError::NothingToExport)?;
        let pages = document.geometry();
        let bytes = document.finish()?;

        log::info!(
            "Exported {} pages with {} ({} bytes)",
            pages.len(),
            self.backend.name(),
            bytes.len()
        );
        Ok(ExportArtifact::new(self.options.file_name.clone(), bytes, pages))
    }
}
