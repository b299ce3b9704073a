//! Raw CSV records.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One parsed CSV data row, keyed by the header row.
///
/// The header is shared between all records of a parse, so cloning a
/// record only copies its values. Unknown columns are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    line: u64,
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RawRecord {
    /// Create a record from a shared header row and its values
    pub fn new(line: u64, headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self {
            line,
            headers,
            values,
        }
    }

    /// 1-based line in the source text where this row starts
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Value of the first column named exactly `column`
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.get_index(idx)
    }

    /// Value at a column index
    pub fn get_index(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }

    /// Column names, in header order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Values, in header order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(column, value)` pairs in header order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Number of fields in this record
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this record has no fields
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.fields() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_by_column() {
        let record = RawRecord::new(
            2,
            headers(&["name", "course", "grade"]),
            vec!["Ana".into(), "Math".into(), "A".into()],
        );

        assert_eq!(record.get("name"), Some("Ana"));
        assert_eq!(record.get("grade"), Some("A"));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.line(), 2);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_get_is_exact_match() {
        let record = RawRecord::new(2, headers(&["NAME"]), vec!["Ana".into()]);
        assert_eq!(record.get("name"), None);
        assert_eq!(record.get("NAME"), Some("Ana"));
    }

    #[test]
    fn test_serialize_as_ordered_map() {
        let record = RawRecord::new(
            2,
            headers(&["name", "course"]),
            vec!["Ana".into(), "Math".into()],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"Ana","course":"Math"}"#);
    }
}
