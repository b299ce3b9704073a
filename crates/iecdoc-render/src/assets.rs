//! Image assets embedded into page markup as data URIs.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::template::AssetPaths;

/// Assets loaded once per layout and shared by all pages
#[derive(Debug, Clone, Default)]
pub struct LoadedAssets {
    pub logo: Option<String>,
    pub footer: Option<String>,
    pub partner_logos: Vec<String>,
    pub level_images: Vec<String>,
}

impl LoadedAssets {
    /// Load every configured asset, skipping files that cannot be read
    pub fn load(paths: &AssetPaths) -> Self {
        Self {
            logo: paths.logo.as_deref().and_then(load_data_uri),
            footer: paths.footer.as_deref().and_then(load_data_uri),
            partner_logos: paths
                .partner_logos
                .iter()
                .filter_map(|p| load_data_uri(p))
                .collect(),
            level_images: paths
                .level_images
                .iter()
                .filter_map(|p| load_data_uri(p))
                .collect(),
        }
    }
}

/// Read an image file and encode it as a `data:` URI
pub fn load_data_uri(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mime = mime_for(path, &bytes);
            log::debug!("Loaded asset {} ({} bytes)", path.display(), bytes.len());
            Some(data_uri(mime, &bytes))
        }
        Err(e) => {
            log::warn!("Skipping asset {}: {}", path.display(), e);
            None
        }
    }
}

/// Encode bytes as a base64 `data:` URI
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

fn mime_for(path: &Path, bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}
