//! Grouped dataset: student key → ordered course records.

use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::record::RawRecord;
use crate::schema::{attendance_average, CourseRecord, Schema};

/// All course records of one student, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct StudentGroup {
    key: String,
    schema: Schema,
    records: Vec<RawRecord>,
}

impl StudentGroup {
    fn new(key: String, schema: Schema) -> Self {
        Self {
            key,
            schema,
            records: Vec::new(),
        }
    }

    /// Grouping key shared by every record of the group
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Records in source order
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Typed view over the records
    pub fn courses(&self) -> impl Iterator<Item = CourseRecord<'_>> {
        self.records
            .iter()
            .map(move |r| CourseRecord::new(r, &self.schema))
    }

    /// First record, which carries the student's term/program/level details
    pub fn first(&self) -> Option<CourseRecord<'_>> {
        self.courses().next()
    }

    /// Mean attendance rate, excluding non-numeric entries
    pub fn attendance_average(&self) -> Option<f64> {
        attendance_average(self.courses())
    }

    /// Number of records in the group
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the group has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Insertion-ordered mapping from grouping key to [`StudentGroup`]
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedDataset {
    headers: Arc<[String]>,
    schema: Schema,
    group_by: Option<usize>,
    groups: Vec<StudentGroup>,
    index: HashMap<String, usize>,
    record_count: usize,
}

impl GroupedDataset {
    /// Start an empty dataset for a header row
    ///
    /// `group_by` is the column holding the grouping key; when `None` every
    /// record is grouped under the empty string.
    pub fn new(headers: Arc<[String]>, group_by: Option<usize>) -> Self {
        let schema = Schema::resolve(&headers);
        Self {
            headers,
            schema,
            group_by,
            groups: Vec::new(),
            index: HashMap::new(),
            record_count: 0,
        }
    }

    /// Append a record to its student's group, creating the group on first sight
    pub fn push(&mut self, record: RawRecord) {
        let key = self
            .group_by
            .and_then(|idx| record.get_index(idx))
            .unwrap_or("")
            .to_string();

        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(StudentGroup::new(key.clone(), self.schema));
                self.index.insert(key, slot);
                slot
            }
        };

        self.groups[slot].records.push(record);
        self.record_count += 1;
    }

    /// Group for a key
    pub fn get(&self, key: &str) -> Option<&StudentGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    /// Groups in first-appearance order
    pub fn groups(&self) -> &[StudentGroup] {
        &self.groups
    }

    /// Iterate over groups in first-appearance order
    pub fn iter(&self) -> std::slice::Iter<'_, StudentGroup> {
        self.groups.iter()
    }

    /// Grouping keys in first-appearance order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key())
    }

    /// Header row of the source CSV
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Resolved column layout
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the source had a grouping column
    pub fn has_group_column(&self) -> bool {
        self.group_by.is_some()
    }

    /// Number of distinct students
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no data rows were read
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total records across all groups
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

impl<'a> IntoIterator for &'a GroupedDataset {
    type Item = &'a StudentGroup;
    type IntoIter = std::slice::Iter<'a, StudentGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl Serialize for StudentGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl Serialize for GroupedDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(group.key(), group)?;
        }
        map.end()
    }
}
