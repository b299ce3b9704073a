//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use iecdoc_data::{Field, GroupedDataset, RecordGrouper};
use iecdoc_pdf::{ExportDriver, ExportState};
use iecdoc_render::{format_attendance, TranscriptLayout};

use crate::config::{Settings, CONFIG_FILE_NAME};

/// Output format for grouped records
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON object keyed by student
    Json,
}

#[derive(Parser)]
#[command(name = "iecdoc")]
#[command(author, version, about = "Student transcripts from course-record CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a CSV export by student and print the result
    Group {
        /// Input CSV file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate one PDF with a transcript for every student
    Export {
        /// Input CSV file
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Output file name (overrides the config file)
        #[arg(long)]
        file_name: Option<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Capture scale in device pixels per CSS pixel
        #[arg(long)]
        scale: Option<f32>,

        /// Give up on a page whose capture takes longer than this
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Write a configuration file with every default spelled out
    InitConfig {
        /// Output file path
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            input,
            format,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            print!("{}", group_command(&input, format, &settings)?);
        }
        Commands::Export {
            input,
            output,
            file_name,
            config,
            scale,
            timeout_secs,
        } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(file_name) = file_name {
                settings.export.file_name = file_name;
            }
            if let Some(scale) = scale {
                settings.export.scale = scale;
            }
            if timeout_secs.is_some() {
                settings.export.timeout_secs = timeout_secs;
            }
            let path = export_command(&input, &output, &settings)?;
            println!("Wrote {}", path.display());
        }
        Commands::InitConfig { output } => {
            init_config_command(&output)?;
            println!("Created {}", output.display());
        }
    }

    Ok(())
}

fn load_dataset(input: &Path, settings: &Settings) -> Result<GroupedDataset> {
    let grouper = RecordGrouper::new(settings.csv.to_options()?);
    let dataset = grouper
        .parse_file(input)
        .with_context(|| format!("Failed to read CSV: {}", input.display()))?;

    if !dataset.is_empty() && !dataset.has_group_column() {
        tracing::warn!(
            "No '{}' column in {}; all rows are grouped together",
            settings.csv.group_by,
            input.display()
        );
    }
    let missing = missing_columns(&dataset);
    if !missing.is_empty() {
        tracing::debug!("Columns not present: {}", missing.join(", "));
    }
    Ok(dataset)
}

/// Canonical transcript columns the dataset's header row lacks
pub fn missing_columns(dataset: &GroupedDataset) -> Vec<&'static str> {
    dataset
        .schema()
        .missing()
        .into_iter()
        .filter_map(|field| field.headers().first().copied())
        .collect()
}

/// Execute the group command, returning the rendered output
pub fn group_command(input: &Path, format: OutputFormat, settings: &Settings) -> Result<String> {
    let dataset = load_dataset(input, settings)?;

    match format {
        OutputFormat::Text => Ok(format_text(&dataset)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&dataset).context("Failed to serialize records")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Human-readable listing of students and their courses
pub fn format_text(dataset: &GroupedDataset) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} students, {} records",
        dataset.len(),
        dataset.record_count()
    )
    .unwrap();

    for group in dataset {
        writeln!(
            out,
            "\n{} ({} courses, attendance {})",
            display_key(group.key()),
            group.len(),
            format_attendance(group.attendance_average())
        )
        .unwrap();
        for course in group.courses() {
            let code = course.text(Field::Course);
            let name = course.text(Field::CourseName);
            let grade = course.get(Field::CourseGrade).unwrap_or("-");
            let result = course.text(Field::Result);
            let line = format!("  {:<10} {:<32} {:<4} {}", code, name, grade, result);
            writeln!(out, "{}", line.trim_end()).unwrap();
        }
    }
    out
}

fn display_key(key: &str) -> &str {
    if key.is_empty() {
        "(no name)"
    } else {
        key
    }
}

/// Execute the export command, returning the written file
pub fn export_command(input: &Path, output_dir: &Path, settings: &Settings) -> Result<PathBuf> {
    let dataset = load_dataset(input, settings)?;
    tracing::info!(
        "Loaded {} students ({} records) from {}",
        dataset.len(),
        dataset.record_count(),
        input.display()
    );

    let layout = TranscriptLayout::new(settings.document.clone());
    let pages = layout.pages(&dataset);

    let driver = ExportDriver::new(settings.export.rasterizer()?)
        .with_options(settings.export.export_options());
    let total = pages.len();
    let artifact = driver
        .export_all_with(&pages, &settings.export.control(), &mut |state: &ExportState| {
            if let ExportState::Capturing(i) = state {
                tracing::info!("Capturing page {}/{}", i + 1, total);
            }
        })
        .with_context(|| format!("Failed to export {}", input.display()))?;

    artifact
        .write_to(output_dir)
        .with_context(|| format!("Failed to write PDF to {}", output_dir.display()))
}

/// Execute the init-config command
pub fn init_config_command(output: &Path) -> Result<()> {
    if output.exists() {
        bail!("Refusing to overwrite existing file: {}", output.display());
    }
    let text = Settings::default().to_toml_string()?;
    fs::write(output, text)
        .with_context(|| format!("Failed to write config file: {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_columns() {
        let dataset = RecordGrouper::default()
            .parse("NAME,COURSE,COURSE GRADE\nAna,ESL101,A\n")
            .unwrap();
        let missing = missing_columns(&dataset);

        assert!(missing.contains(&"TERM"));
        assert!(missing.contains(&"COURSE NAME"));
        assert!(!missing.contains(&"NAME"));
        assert!(!missing.contains(&"COURSE"));
        assert_eq!(missing.len(), 16);
    }

    #[test]
    fn test_parse_export_args() {
        let cli = Cli::try_parse_from([
            "iecdoc",
            "export",
            "roster.csv",
            "-o",
            "out",
            "--scale",
            "1.5",
            "--timeout-secs",
            "20",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                input,
                output,
                scale,
                timeout_secs,
                file_name,
                ..
            } => {
                assert_eq!(input, PathBuf::from("roster.csv"));
                assert_eq!(output, PathBuf::from("out"));
                assert_eq!(scale, Some(1.5));
                assert_eq!(timeout_secs, Some(20));
                assert_eq!(file_name, None);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_format_text() {
        let csv = "NAME,COURSE,COURSE NAME,COURSE GRADE,RESULT,COLUMN1\n\
                   Ana,ESL101,Reading,A,PASS,90%\n\
                   Ana,ESL102,Writing,,,80%\n";
        let dataset = RecordGrouper::default().parse(csv).unwrap();
        let text = format_text(&dataset);

        assert!(text.starts_with("1 students, 2 records\n"));
        assert!(text.contains("Ana (2 courses, attendance 85%)"));
        assert!(text.contains("  ESL101     Reading                          A    PASS\n"));
        assert!(text.contains("  ESL102     Writing                          -\n"));
    }
}
