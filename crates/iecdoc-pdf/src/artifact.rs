//! The finished export document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::assemble::PageGeometry;

/// Default output file name
pub const DEFAULT_FILE_NAME: &str = "transcript.pdf";

/// One complete PDF produced by an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    file_name: String,
    bytes: Vec<u8>,
    pages: Vec<PageGeometry>,
}

impl ExportArtifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, pages: Vec<PageGeometry>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            pages,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The PDF document
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Size of every page, in output order
    pub fn pages(&self) -> &[PageGeometry] {
        &self.pages
    }

    /// Write the document into `dir`, returning the written path
    ///
    /// The file is written under a temporary name and renamed into place,
    /// so a failed write never leaves a truncated document behind.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let target = dir.join(&self.file_name);
        let partial = dir.join(format!(".{}.partial", self.file_name));

        let written = fs::write(&partial, &self.bytes).and_then(|_| fs::rename(&partial, &target));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        log::info!(
            "Wrote {} ({} pages, {} bytes)",
            target.display(),
            self.page_count(),
            self.bytes.len()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact() -> ExportArtifact {
        let page = PageGeometry::fit_width(10, 10, 595.28);
        ExportArtifact::new(DEFAULT_FILE_NAME, b"%PDF-1.7 test".to_vec(), vec![page])
    }

    #[test]
    fn test_write_to_creates_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");

        let path = artifact().write_to(&out).unwrap();

        assert_eq!(path, out.join("transcript.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7 test");
        assert!(!out.join(".transcript.pdf.partial").exists());
    }

    #[test]
    fn test_write_to_failure_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, b"x").unwrap();

        assert!(artifact().write_to(&blocker).is_err());
        assert!(!blocker.join("transcript.pdf").exists());
    }
}
