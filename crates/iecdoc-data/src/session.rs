//! Caller-owned holder of the current upload.

use std::path::Path;

use crate::error::Result;
use crate::grouping::GroupedDataset;
use crate::reader::{CsvOptions, RecordGrouper};

/// The dataset of the most recent successful upload
///
/// Every load starts from scratch: a new upload never merges with the
/// previous one, and a failed upload leaves the session unset.
#[derive(Debug, Default)]
pub struct Session {
    grouper: RecordGrouper,
    dataset: Option<GroupedDataset>,
}

impl Session {
    /// Create an empty session with custom parsing options
    pub fn new(options: CsvOptions) -> Self {
        Self {
            grouper: RecordGrouper::new(options),
            dataset: None,
        }
    }

    /// Replace the current dataset with the grouped contents of `text`
    pub fn load_csv(&mut self, text: &str) -> Result<&GroupedDataset> {
        self.dataset = None;
        let dataset = self.grouper.parse(text)?;
        Ok(&*self.dataset.insert(dataset))
    }

    /// Replace the current dataset with the grouped contents of a file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&GroupedDataset> {
        self.dataset = None;
        let dataset = self.grouper.parse_file(path)?;
        Ok(&*self.dataset.insert(dataset))
    }

    /// Current dataset, if an upload succeeded
    pub fn dataset(&self) -> Option<&GroupedDataset> {
        self.dataset.as_ref()
    }

    /// Whether a dataset is loaded
    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Discard the current dataset
    pub fn clear(&mut self) {
        self.dataset = None;
    }
}
