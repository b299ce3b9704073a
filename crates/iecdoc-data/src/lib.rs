//! # iecdoc-data
//!
//! CSV ingestion for iecdoc - read a course-record export and group its rows
//! into one ordered set of records per student.
//!
//! ## Features
//!
//! - **Order preserving**: students appear in first-seen order, courses in
//!   source order
//! - **Open schema**: unknown columns pass through untouched
//! - **Typed access**: canonical transcript fields resolved once per parse
//!
//! ## Example
//!
//! ```rust
//! use iecdoc_data::{Field, RecordGrouper};
//!
//! let csv = "NAME,COURSE NAME,COLUMN1\nAna,Reading,90%\nAna,Writing,80%\n";
//! let dataset = RecordGrouper::default().parse(csv)?;
//!
//! let ana = dataset.get("Ana").unwrap();
//! assert_eq!(ana.len(), 2);
//! assert_eq!(ana.first().unwrap().get(Field::CourseName), Some("Reading"));
//! assert_eq!(ana.attendance_average(), Some(85.0));
//! # Ok::<(), iecdoc_data::DataError>(())
//! ```

pub mod error;
pub mod grouping;
pub mod reader;
pub mod record;
pub mod schema;
pub mod session;

// Re-exports
pub use error::{DataError, Result};
pub use grouping::{GroupedDataset, StudentGroup};
pub use reader::{CsvOptions, RecordGrouper, DEFAULT_GROUP_BY};
pub use record::RawRecord;
pub use schema::{attendance_average, CourseRecord, Field, Schema};
pub use session::Session;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all exports are accessible
        let _: CsvOptions = CsvOptions::default();
        let _: Session = Session::default();
        let _ = RecordGrouper::parse;
    }
}
