//! Error types for page capture and PDF export

use thiserror::Error;

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Why a single page capture failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureFailure {
    /// The page markup could not be parsed
    #[error("invalid page markup: {0}")]
    InvalidSurface(String),

    /// Rasterization failed
    #[error("rasterization failed: {0}")]
    Raster(String),

    /// The raster could not be encoded
    #[error("image encoding failed: {0}")]
    Encode(String),

    /// The capture took longer than the configured limit
    #[error("capture exceeded {limit_ms} ms (took {elapsed_ms} ms)")]
    Timeout { limit_ms: u128, elapsed_ms: u128 },

    /// The export was cancelled before this capture started
    #[error("export cancelled")]
    Cancelled,
}

/// Errors that abort an export
///
/// No partial artifact is ever produced alongside an error.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Capturing the page at `index` failed
    #[error("failed to capture page {}: {source}", index + 1)]
    Capture {
        index: usize,
        #[source]
        source: CaptureFailure,
    },

    /// Building the document from the captured images failed
    #[error("PDF assembly failed: {0}")]
    Assembly(String),

    /// There were no pages to export
    #[error("nothing to export: no pages were produced")]
    NothingToExport,

    /// The session holds no dataset
    #[error("no dataset loaded")]
    NoDataset,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Index of the failed page, for capture errors
    pub fn page_index(&self) -> Option<usize> {
        match self {
            ExportError::Capture { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// True when the export stopped because it was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ExportError::Capture {
                source: CaptureFailure::Cancelled,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_display() {
        let err = ExportError::Capture {
            index: 2,
            source: CaptureFailure::Raster("out of memory".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to capture page 3: rasterization failed: out of memory"
        );
        assert_eq!(err.page_index(), Some(2));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled() {
        let err = ExportError::Capture {
            index: 0,
            source: CaptureFailure::Cancelled,
        };
        assert!(err.is_cancelled());
        assert_eq!(ExportError::NothingToExport.page_index(), None);
    }
}
