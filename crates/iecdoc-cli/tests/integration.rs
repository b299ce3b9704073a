//! Integration tests for iecdoc CLI
//!
//! These run the command functions end to end against files in a
//! temporary directory.

use std::fs;

use iecdoc_cli::{
    export_command, group_command, init_config_command, OutputFormat, Settings,
};
use tempfile::TempDir;

const ROSTER: &str = "\
TERM,NUMBER,NAME,COURSE,COURSE NAME,COURSE GRADE,RESULT,COLUMN1
Fall 2025,1001,Maria Lopez,ESL301,Reading & Vocabulary,B,PASS,93%
Fall 2025,1002,Kenji Sato,ESL201,Listening,C,PASS,
Fall 2025,1001,Maria Lopez,ESL302,Grammar,A,PASS,88%
";

fn write_roster(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("roster.csv");
    fs::write(&path, content).expect("Failed to write CSV");
    path
}

fn quick_settings() -> Settings {
    let mut settings = Settings::default();
    settings.export.system_fonts = false;
    settings.export.scale = 0.25;
    settings
}

#[test]
fn test_group_text() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_roster(&dir, ROSTER);

    let out = group_command(&input, OutputFormat::Text, &Settings::default()).unwrap();

    assert!(out.starts_with("2 students, 3 records\n"));
    let maria = out.find("Maria Lopez (2 courses, attendance 91%)").unwrap();
    let kenji = out.find("Kenji Sato (1 courses, attendance N/A)").unwrap();
    assert!(maria < kenji);
}

#[test]
fn test_group_json_keeps_every_column() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_roster(&dir, ROSTER);

    let out = group_command(&input, OutputFormat::Json, &Settings::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    let maria = json["Maria Lopez"].as_array().unwrap();
    assert_eq!(maria.len(), 2);
    assert_eq!(maria[0]["COURSE NAME"], "Reading & Vocabulary");
    assert_eq!(maria[1]["COURSE"], "ESL302");
    assert_eq!(json["Kenji Sato"][0]["COLUMN1"], "");
}

#[test]
fn test_group_with_semicolon_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_roster(&dir, "NAME;COURSE\nAna;Math\nAna;History\n");
    let config = dir.path().join("iecdoc.toml");
    fs::write(&config, "[csv]\ndelimiter = \";\"\n").unwrap();

    let settings = Settings::load(Some(&config)).unwrap();
    let out = group_command(&input, OutputFormat::Text, &settings).unwrap();

    assert!(out.starts_with("1 students, 2 records\n"));
}

#[test]
fn test_group_reports_parse_line() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_roster(&dir, "NAME,COURSE\nAna,Math\nLuis,\"History\n");

    let err = group_command(&input, OutputFormat::Text, &Settings::default()).unwrap_err();
    let chain = format!("{:#}", err);

    assert!(chain.contains("Failed to read CSV"));
    assert!(chain.contains("line 3"));
}

#[test]
fn test_group_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("nope.csv");
    assert!(group_command(&missing, OutputFormat::Text, &Settings::default()).is_err());
}

#[test]
fn test_export_writes_pdf() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_roster(&dir, ROSTER);
    let out_dir = dir.path().join("out");

    let path = export_command(&input, &out_dir, &quick_settings()).unwrap();

    assert_eq!(path, out_dir.join("transcript.pdf"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    let pages = bytes
        .windows(b"/Subtype /Image".len())
        .filter(|w| *w == b"/Subtype /Image")
        .count();
    assert_eq!(pages, 4);
}

#[test]
fn test_export_empty_csv_writes_nothing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_roster(&dir, "NAME,COURSE\n");
    let out_dir = dir.path().join("out");

    let err = export_command(&input, &out_dir, &quick_settings()).unwrap_err();

    assert!(format!("{:#}", err).contains("nothing to export"));
    assert!(!out_dir.join("transcript.pdf").exists());
}

#[test]
fn test_init_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("iecdoc.toml");

    init_config_command(&path).unwrap();
    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.csv, Settings::default().csv);
    assert_eq!(settings.export, Settings::default().export);

    // Never overwrites
    assert!(init_config_command(&path).is_err());
}

#[test]
fn test_config_paths_relative_to_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = dir.path().join("iecdoc.toml");
    fs::write(&config, "[document.assets]\nlogo = \"logo.png\"\n").unwrap();

    let settings = Settings::load(Some(&config)).unwrap();

    assert_eq!(settings.document.assets.logo, Some(dir.path().join("logo.png")));
}
