//! Typed view over course records.
//!
//! Column positions are resolved once per parse into a [`Schema`]. Every
//! canonical field is optional: a missing column and an empty cell both read
//! as `None`.

use serde::Serialize;

use crate::record::RawRecord;

/// Canonical transcript fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Term,
    Number,
    Country,
    Visa,
    Status,
    Level,
    Program,
    Course,
    CourseName,
    Name,
    MidTerm,
    FollowUp,
    CourseProject,
    FinalExam,
    CourseScore,
    CourseGrade,
    Result,
    Attendance,
    AttendanceRate,
}

impl Field {
    /// All canonical fields, in the order the course list displays them
    pub fn all() -> &'static [Field] {
        &[
            Field::Term,
            Field::Number,
            Field::Country,
            Field::Visa,
            Field::Status,
            Field::Level,
            Field::Program,
            Field::Course,
            Field::CourseName,
            Field::Name,
            Field::MidTerm,
            Field::FollowUp,
            Field::CourseProject,
            Field::FinalExam,
            Field::CourseScore,
            Field::CourseGrade,
            Field::Result,
            Field::Attendance,
            Field::AttendanceRate,
        ]
    }

    /// Header names accepted for this field (compared case-insensitively)
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Field::Term => &["TERM"],
            Field::Number => &["NUMBER", "IEC NUMBER"],
            Field::Country => &["COUNTRY"],
            Field::Visa => &["VISA"],
            Field::Status => &["STATUS"],
            Field::Level => &["LEVEL"],
            Field::Program => &["PROGRAM"],
            Field::Course => &["COURSE", "CODE"],
            Field::CourseName => &["COURSE NAME"],
            Field::Name => &["NAME"],
            Field::MidTerm => &["MID TERM", "MID-TERM"],
            Field::FollowUp => &["FOLLOW UP", "FOLLOW-UP"],
            Field::CourseProject => &["COURSE PROJECT", "PROJECT"],
            Field::FinalExam => &["FINAL"],
            Field::CourseScore => &["COURSE SCORE"],
            Field::CourseGrade => &["COURSE GRADE", "GRADE"],
            Field::Result => &["RESULT"],
            Field::Attendance => &["ATTENDANCE"],
            Field::AttendanceRate => &["COLUMN1", "ATTENDANCE RATE"],
        }
    }

    /// Display label used in course listings
    pub fn label(self) -> &'static str {
        self.headers()[0]
    }

    fn slot(self) -> usize {
        self as usize
    }
}

const FIELD_COUNT: usize = 19;

/// Column layout of one CSV header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    columns: [Option<usize>; FIELD_COUNT],
}

impl Schema {
    /// Resolve canonical fields against a header row
    pub fn resolve(headers: &[String]) -> Self {
        let mut columns = [None; FIELD_COUNT];
        for field in Field::all() {
            columns[field.slot()] = field
                .headers()
                .iter()
                .find_map(|alias| find_column(headers, alias));
        }
        Self { columns }
    }

    /// Column index for a field, if the header has one
    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns[field.slot()]
    }

    /// Fields the header row does not provide
    pub fn missing(&self) -> Vec<Field> {
        Field::all()
            .iter()
            .copied()
            .filter(|f| self.column(*f).is_none())
            .collect()
    }
}

/// Index of the first header equal to `name`, ignoring case and surrounding
/// whitespace in the header
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
}

/// Typed accessor for one course row
#[derive(Debug, Clone, Copy)]
pub struct CourseRecord<'a> {
    record: &'a RawRecord,
    schema: &'a Schema,
}

impl<'a> CourseRecord<'a> {
    pub fn new(record: &'a RawRecord, schema: &'a Schema) -> Self {
        Self { record, schema }
    }

    /// Field value; `None` when the column is absent or the cell is empty
    pub fn get(&self, field: Field) -> Option<&'a str> {
        let idx = self.schema.column(field)?;
        self.record.get_index(idx).filter(|v| !v.is_empty())
    }

    /// Field value or an empty string
    pub fn text(&self, field: Field) -> &'a str {
        self.get(field).unwrap_or("")
    }

    /// The underlying raw record
    pub fn raw(&self) -> &'a RawRecord {
        self.record
    }

    /// Attendance rate as a number, with any `%` sign removed
    ///
    /// Returns `None` for missing or non-numeric cells.
    pub fn attendance_rate(&self) -> Option<f64> {
        let value = self.get(Field::AttendanceRate)?;
        let value: f64 = value.trim().trim_end_matches('%').trim().parse().ok()?;
        value.is_finite().then_some(value)
    }
}

/// Mean attendance rate over a set of courses
///
/// Non-numeric and missing entries are excluded from both the sum and the
/// count; they are never treated as zero. Returns `None` when no entry is
/// numeric.
pub fn attendance_average<'a, I>(courses: I) -> Option<f64>
where
    I: IntoIterator<Item = CourseRecord<'a>>,
{
    let (sum, count) = courses
        .into_iter()
        .filter_map(|c| c.attendance_rate())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn header_row(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_field_count_matches() {
        assert_eq!(Field::all().len(), FIELD_COUNT);
        for (i, field) in Field::all().iter().enumerate() {
            assert_eq!(field.slot(), i);
        }
    }

    #[test]
    fn test_resolve_case_insensitive_headers() {
        let headers = header_row(&["name", " Course Name ", "COLUMN1"]);
        let schema = Schema::resolve(&headers);

        assert_eq!(schema.column(Field::Name), Some(0));
        assert_eq!(schema.column(Field::CourseName), Some(1));
        assert_eq!(schema.column(Field::AttendanceRate), Some(2));
        assert_eq!(schema.column(Field::Term), None);
    }

    #[test]
    fn test_resolve_aliases() {
        let headers = header_row(&["MID-TERM", "FOLLOW-UP", "CODE", "GRADE"]);
        let schema = Schema::resolve(&headers);

        assert_eq!(schema.column(Field::MidTerm), Some(0));
        assert_eq!(schema.column(Field::FollowUp), Some(1));
        assert_eq!(schema.column(Field::Course), Some(2));
        assert_eq!(schema.column(Field::CourseGrade), Some(3));
    }

    #[test]
    fn test_missing_fields_listed() {
        let headers = header_row(&["NAME"]);
        let schema = Schema::resolve(&headers);
        let missing = schema.missing();
        assert!(!missing.contains(&Field::Name));
        assert!(missing.contains(&Field::CourseGrade));
        assert_eq!(missing.len(), FIELD_COUNT - 1);
    }

    #[test]
    fn test_empty_cell_reads_as_none() {
        let headers = header_row(&["NAME", "RESULT"]);
        let schema = Schema::resolve(&headers);
        let record = RawRecord::new(2, headers, vec!["Ana".into(), "".into()]);
        let course = CourseRecord::new(&record, &schema);

        assert_eq!(course.get(Field::Name), Some("Ana"));
        assert_eq!(course.get(Field::Result), None);
        assert_eq!(course.get(Field::Term), None);
        assert_eq!(course.text(Field::Term), "");
    }

    #[test]
    fn test_attendance_average_excludes_non_numeric() {
        let headers = header_row(&["NAME", "COLUMN1"]);
        let schema = Schema::resolve(&headers);
        let records: Vec<RawRecord> = ["90%", "n/a", "", "80", " 70 % "]
            .iter()
            .enumerate()
            .map(|(i, v)| RawRecord::new(i as u64 + 2, headers.clone(), vec!["Ana".into(), v.to_string()]))
            .collect();

        let avg = attendance_average(records.iter().map(|r| CourseRecord::new(r, &schema)));
        assert_eq!(avg, Some(80.0));
    }

    #[test]
    fn test_attendance_average_none_when_nothing_numeric() {
        let headers = header_row(&["NAME", "COLUMN1"]);
        let schema = Schema::resolve(&headers);
        let record = RawRecord::new(2, headers, vec!["Ana".into(), "absent".into()]);

        let avg = attendance_average([CourseRecord::new(&record, &schema)]);
        assert_eq!(avg, None);
    }
}
