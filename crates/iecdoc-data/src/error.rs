//! Error types for CSV ingestion.

use thiserror::Error;

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading and grouping course records
#[derive(Debug, Error)]
pub enum DataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Malformed CSV input (ragged rows, unterminated quotes, bad UTF-8)
    #[error("{}", parse_message(*line, message))]
    Parse {
        /// 1-based source line of the offending row, when known
        line: Option<u64>,
        /// Description of what went wrong
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Line reported by a parse failure, if any
    pub fn line(&self) -> Option<u64> {
        match self {
            DataError::Parse { line, .. } => *line,
            _ => None,
        }
    }
}

fn parse_message(line: Option<u64>, message: &str) -> String {
    match line {
        Some(line) => format!("CSV parse error on line {}: {}", line, message),
        None => format!("CSV parse error: {}", message),
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line());
        let message = match err.kind() {
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => format!(
                "row has {} fields but the header declares {}",
                len, expected_len
            ),
            _ => err.to_string(),
        };
        DataError::Parse { line, message }
    }
}
