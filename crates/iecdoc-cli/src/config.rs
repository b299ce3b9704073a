//! Configuration file (`iecdoc.toml`)
//!
//! Every section and field has a default, so a partial file (or none at
//! all) is valid:
//!
//! ```toml
//! [csv]
//! delimiter = ";"
//!
//! [document]
//! coordinator_name = "Jordan Vega"
//! date_issued = "July 3, 2025"
//!
//! [document.assets]
//! logo = "assets/logo.png"
//!
//! [export]
//! scale = 2.0
//! timeout_secs = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use iecdoc_data::{CsvOptions, DEFAULT_GROUP_BY};
use iecdoc_pdf::{
    CaptureOptions, ExportControl, ExportOptions, SvgRasterizer, DEFAULT_FILE_NAME,
    DEFAULT_PAGE_WIDTH_PT, DEFAULT_SCALE,
};
use iecdoc_render::TranscriptTemplate;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "iecdoc.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// CSV input settings
    pub csv: CsvSettings,
    /// Transcript text and images
    pub document: TranscriptTemplate,
    /// Capture and PDF settings
    pub export: ExportSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    /// Load settings from `path`, or from `./iecdoc.toml` if present
    ///
    /// Relative file paths in the configuration are resolved against the
    /// directory containing the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                if !default.is_file() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut settings = Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            settings.resolve_paths(base);
        }
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Make relative asset and font paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        let assets = &mut self.document.assets;
        assets.logo.iter_mut().for_each(resolve);
        assets.footer.iter_mut().for_each(resolve);
        assets.partner_logos.iter_mut().for_each(resolve);
        assets.level_images.iter_mut().for_each(resolve);
        self.export.fonts.iter_mut().for_each(resolve);
        self.export.font_dirs.iter_mut().for_each(resolve);
    }
}

/// CSV input configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CsvSettings {
    /// Field delimiter
    pub delimiter: char,
    /// Header of the column identifying a student
    pub group_by: String,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            group_by: DEFAULT_GROUP_BY.to_string(),
        }
    }
}

impl CsvSettings {
    /// Parser options for these settings
    pub fn to_options(&self) -> Result<CsvOptions> {
        if !self.delimiter.is_ascii() {
            bail!("CSV delimiter must be an ASCII character, got '{}'", self.delimiter);
        }
        let options = match self.delimiter {
            '\t' => CsvOptions::tsv(),
            ';' => CsvOptions::semicolon(),
            other => CsvOptions {
                delimiter: other as u8,
                ..Default::default()
            },
        };
        Ok(options.with_group_by(self.group_by.clone()))
    }
}

/// Capture and PDF configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Output file name
    pub file_name: String,
    /// PDF document title
    pub title: String,
    /// Page width in points
    pub page_width_pt: f32,
    /// Capture scale (device pixels per CSS pixel)
    pub scale: f32,
    /// Per-page capture time limit in seconds
    pub timeout_secs: Option<u64>,
    /// Load the fonts installed on this machine
    pub system_fonts: bool,
    /// Extra font files
    pub fonts: Vec<PathBuf>,
    /// Extra font directories
    pub font_dirs: Vec<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            title: "Transcripts".to_string(),
            page_width_pt: DEFAULT_PAGE_WIDTH_PT,
            scale: DEFAULT_SCALE,
            timeout_secs: None,
            system_fonts: true,
            fonts: Vec::new(),
            font_dirs: Vec::new(),
        }
    }
}

impl ExportSettings {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            page_width_pt: self.page_width_pt,
            file_name: self.file_name.clone(),
            title: self.title.clone(),
            capture: CaptureOptions::default().with_scale(self.scale),
        }
    }

    pub fn control(&self) -> ExportControl {
        match self.timeout_secs {
            Some(secs) => ExportControl::new().with_capture_timeout(Duration::from_secs(secs)),
            None => ExportControl::new(),
        }
    }

    /// Build the rasterizer with the configured fonts
    pub fn rasterizer(&self) -> Result<SvgRasterizer> {
        let mut rasterizer = if self.system_fonts {
            SvgRasterizer::new()
        } else {
            SvgRasterizer::without_system_fonts()
        };
        for font in &self.fonts {
            rasterizer = rasterizer
                .with_font_file(font)
                .with_context(|| format!("Failed to load font: {}", font.display()))?;
        }
        for dir in &self.font_dirs {
            rasterizer = rasterizer.with_font_dir(dir);
        }
        if rasterizer.font_count() == 0 {
            tracing::warn!("No fonts available, transcript text will be missing from the PDF");
        }
        Ok(rasterizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.csv.group_by, "NAME");
        assert_eq!(settings.export.scale, 2.0);
    }

    #[test]
    fn test_delimiter_presets() {
        let settings = Settings::from_toml_str("[csv]\ndelimiter = \"\\t\"\n").unwrap();
        assert_eq!(settings.csv.to_options().unwrap().delimiter, b'\t');

        let settings = Settings::from_toml_str("[csv]\ndelimiter = \";\"\n").unwrap();
        assert_eq!(settings.csv.to_options().unwrap().delimiter, b';');
    }

    #[test]
    fn test_partial_config() {
        let settings = Settings::from_toml_str(
            r#"
[csv]
delimiter = ";"

[document]
coordinator_name = "Jordan Vega"

[export]
timeout_secs = 30
"#,
        )
        .unwrap();

        assert_eq!(settings.csv.delimiter, ';');
        assert_eq!(settings.csv.group_by, "NAME");
        assert_eq!(settings.document.coordinator_name, "Jordan Vega");
        assert_eq!(settings.document.title, "OFFICIAL TRANSCRIPT");
        assert_eq!(settings.export.timeout_secs, Some(30));
        assert_eq!(
            settings.export.control().capture_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = Settings::default().to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), Settings::default());
    }

    #[test]
    fn test_csv_options() {
        let options = CsvSettings {
            delimiter: '\t',
            group_by: "Student".to_string(),
        }
        .to_options()
        .unwrap();
        assert_eq!(options.delimiter, b'\t');
        assert_eq!(options.group_by, "Student");

        let bad = CsvSettings {
            delimiter: '§',
            ..Default::default()
        };
        assert!(bad.to_options().is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let mut settings = Settings::from_toml_str(
            r#"
[document.assets]
logo = "img/logo.png"
footer = "/abs/footer.png"
"#,
        )
        .unwrap();
        settings.resolve_paths(Path::new("/etc/iecdoc"));

        assert_eq!(
            settings.document.assets.logo,
            Some(PathBuf::from("/etc/iecdoc/img/logo.png"))
        );
        assert_eq!(
            settings.document.assets.footer,
            Some(PathBuf::from("/abs/footer.png"))
        );
    }

    #[test]
    fn test_export_options() {
        let settings = ExportSettings {
            scale: 1.5,
            file_name: "out.pdf".to_string(),
            ..Default::default()
        };
        let options = settings.export_options();
        assert_eq!(options.capture.scale, 1.5);
        assert_eq!(options.file_name, "out.pdf");
        assert_eq!(options.page_width_pt, 595.28);
    }
}
