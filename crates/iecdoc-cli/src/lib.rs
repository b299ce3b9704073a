//! iecdoc CLI - Command-line interface library
//!
//! This library provides the CLI functionality for iecdoc:
//! - Group: list the students and courses found in a CSV export
//! - Export: write one PDF holding every student's transcript
//! - Init-config: write a configuration file with all defaults
//!
//! # Binary Usage
//!
//! ```bash
//! # Inspect the grouping
//! iecdoc group roster.csv --format json
//!
//! # Generate transcripts
//! iecdoc export roster.csv --output out/ --config iecdoc.toml
//! ```

pub mod app;
pub mod config;

// Re-export main entry point and types
pub use app::{export_command, format_text, group_command, init_config_command};
pub use app::{run_cli, OutputFormat};
pub use config::{CsvSettings, ExportSettings, Settings, CONFIG_FILE_NAME};
