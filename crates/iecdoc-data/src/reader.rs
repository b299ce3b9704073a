//! CSV reading and grouping.

use std::path::Path;
use std::sync::Arc;

use crate::error::{DataError, Result};
use crate::grouping::GroupedDataset;
use crate::record::RawRecord;
use crate::schema::find_column;

/// Header of the grouping column used when none is configured
pub const DEFAULT_GROUP_BY: &str = "NAME";

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Header of the column whose value identifies a student
    pub group_by: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            group_by: DEFAULT_GROUP_BY.to_string(),
        }
    }
}

impl CsvOptions {
    /// Create options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Create options for semicolon-separated values (common in European locales)
    pub fn semicolon() -> Self {
        Self {
            delimiter: b';',
            ..Default::default()
        }
    }

    /// Group by a different column header
    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = column.into();
        self
    }
}

/// Parses CSV text into a [`GroupedDataset`]
#[derive(Debug, Clone, Default)]
pub struct RecordGrouper {
    options: CsvOptions,
}

impl RecordGrouper {
    /// Create a grouper with custom options
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Parsing options in use
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Parse CSV text and group its rows by student
    ///
    /// The first row is the header. Values are kept verbatim: no trimming
    /// and no numeric coercion. Rows whose grouping cell is empty, or all
    /// rows when the grouping column is absent, share the empty-string key.
    ///
    /// # Errors
    /// [`DataError::Parse`] for ragged rows, an unterminated quoted field or
    /// invalid UTF-8. No partial dataset is returned.
    pub fn parse(&self, text: &str) -> Result<GroupedDataset> {
        if let Some(line) = unterminated_quote(text, self.options.delimiter, self.options.quote) {
            return Err(DataError::Parse {
                line: Some(line),
                message: "quoted field is never closed".to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .has_headers(true)
            .trim(csv::Trim::None)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Arc<[String]> = reader.headers()?.iter().map(str::to_string).collect();
        let group_by = find_column(&headers, &self.options.group_by);
        if group_by.is_none() && !headers.is_empty() {
            log::warn!(
                "Grouping column '{}' not found; all rows will share one group",
                self.options.group_by
            );
        }

        let mut dataset = GroupedDataset::new(headers.clone(), group_by);

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let values = record.iter().map(str::to_string).collect();
            dataset.push(RawRecord::new(line, headers.clone(), values));
        }

        log::debug!(
            "Grouped {} records into {} students",
            dataset.record_count(),
            dataset.len()
        );

        Ok(dataset)
    }

    /// Read a CSV file and group its rows
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<GroupedDataset> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| DataError::Parse {
            line: None,
            message: format!("file is not valid UTF-8: {}", e),
        })?;
        // Spreadsheet exports often start with a byte-order mark
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        self.parse(text)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Line on which a never-closed quoted field opens
///
/// The csv reader silently runs an unclosed quote to end of input, which
/// would merge every following row into one field.
fn unterminated_quote(text: &str, delimiter: u8, quote: u8) -> Option<u64> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1u64;
    let mut opened_on = 0u64;

    for &b in text.as_bytes() {
        state = match state {
            QuoteState::FieldStart if b == quote => {
                opened_on = line;
                QuoteState::Quoted
            }
            QuoteState::FieldStart | QuoteState::Unquoted => {
                if b == delimiter || b == b'\n' {
                    QuoteState::FieldStart
                } else if b == b'\r' {
                    state
                } else {
                    QuoteState::Unquoted
                }
            }
            QuoteState::Quoted if b == quote => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if b == quote => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if b == delimiter || b == b'\n' => QuoteState::FieldStart,
            QuoteState::QuoteInQuoted => QuoteState::Unquoted,
        };
        if b == b'\n' {
            line += 1;
        }
    }

    (state == QuoteState::Quoted).then_some(opened_on)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_groups_by_name() {
        let csv = "NAME,COURSE\nAna,Math\nLuis,Math\nAna,History\n";
        let ds = RecordGrouper::default().parse(csv).unwrap();

        assert_eq!(ds.keys().collect::<Vec<_>>(), vec!["Ana", "Luis"]);
        assert_eq!(ds.get("Ana").unwrap().len(), 2);
        assert_eq!(ds.record_count(), 3);
    }

    #[test]
    fn test_header_only_is_empty() {
        let ds = RecordGrouper::default().parse("NAME,COURSE\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.record_count(), 0);
        assert_eq!(ds.headers(), &["NAME".to_string(), "COURSE".to_string()]);
    }

    #[test]
    fn test_empty_input_is_empty() {
        let ds = RecordGrouper::default().parse("").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_values_not_trimmed() {
        let csv = "NAME,COURSE\n Ana ,Math\n";
        let ds = RecordGrouper::default().parse(csv).unwrap();
        assert_eq!(ds.keys().next(), Some(" Ana "));
    }

    #[test]
    fn test_record_lines() {
        let csv = "NAME,NOTE\nAna,\"two\nlines\"\nLuis,x\n";
        let ds = RecordGrouper::default().parse(csv).unwrap();
        assert_eq!(ds.get("Ana").unwrap().records()[0].line(), 2);
        assert_eq!(ds.get("Luis").unwrap().records()[0].line(), 4);
    }

    #[test]
    fn test_ragged_row_reports_line() {
        let csv = "NAME,COURSE,GRADE\nAna,Math,A\nLuis,Math\n";
        let err = RecordGrouper::default().parse(csv).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_unterminated_quote_reports_opening_line() {
        let csv = "NAME,COURSE\nAna,Math\nLuis,\"History\nPia,Art\n";
        let err = RecordGrouper::default().parse(csv).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("never closed"));
    }

    #[test]
    fn test_escaped_quotes_are_not_unterminated() {
        let csv = "NAME,NOTE\nAna,\"said \"\"hi\"\"\"\nLuis,5\" tall\n";
        let ds = RecordGrouper::default().parse(csv).unwrap();
        assert_eq!(ds.get("Ana").unwrap().records()[0].get("NOTE"), Some("said \"hi\""));
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_custom_group_column() {
        let csv = "id,name\n1,Ana\n2,Ana\n";
        let grouper = RecordGrouper::new(CsvOptions::default().with_group_by("id"));
        let ds = grouper.parse(csv).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_semicolon_options() {
        let csv = "NAME;COURSE\nAna;Math\n";
        let ds = RecordGrouper::new(CsvOptions::semicolon()).parse(csv).unwrap();
        assert_eq!(ds.get("Ana").unwrap().records()[0].get("COURSE"), Some("Math"));
    }

    #[test]
    fn test_unterminated_quote_scanner() {
        assert_eq!(unterminated_quote("a,b\n1,2\n", b',', b'"'), None);
        assert_eq!(unterminated_quote("a,b\n\"1,2\n", b',', b'"'), Some(2));
        assert_eq!(unterminated_quote("a\r\n\"x\"\r\n", b',', b'"'), None);
        assert_eq!(unterminated_quote("a\nx\"y\n", b',', b'"'), None);
    }
}
