//! Builder settings loaded from `config/builder.yaml`.
//!
//! Settings describe where the two builder collections live, how many
//! products a page shows, and which collections activate the builder.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Collection handles recognised by auto-detection.
pub const KNOWN_COLLECTIONS: &[&str] = &[
    "gemstones",
    "gemstone",
    "stones",
    "precious-stones",
    "precious_stones",
    "sapphires",
    "rubies",
    "emeralds",
    "diamonds",
    "setting",
    "settings",
    "ring-settings",
    "ring_settings",
    "mountings",
    "rings",
    "pendants",
    "loose-stones",
    "loose-diamonds",
    "white-lab-diamonds",
    "lab-diamonds",
    "loose-white-lab-grown-diamonds",
    "loose-blue-lab-grown-diamonds",
    "loose-pink-lab-grown-diamonds",
    "loose-yellow-lab-grown-diamonds",
];

/// Substrings that mark a collection handle as builder-related.
const COLLECTION_KEYWORDS: &[&str] = &[
    "gemstone",
    "sapphire",
    "ruby",
    "emerald",
    "stone",
    "setting",
    "mounting",
    "ring",
    "pendant",
    "diamond",
    "loose",
    "lab-grown",
    "lab-diamond",
    "precious",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    /// Collection path listing loose gemstones.
    pub gem_url: String,
    /// Collection path listing ring settings.
    pub set_url: String,
    pub per_page: usize,
    pub per_row_desktop: u8,
    pub per_row_mobile: u8,
    pub show_filters: bool,
    pub auto_detect: bool,
    /// Collections that always activate the builder, regardless of
    /// `auto_detect`.
    pub collection_handles: Vec<String>,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            gem_url: "/collections/loose-white-lab-grown-diamonds".to_string(),
            set_url: "/collections/ring-settings".to_string(),
            per_page: 24,
            per_row_desktop: 4,
            per_row_mobile: 2,
            show_filters: true,
            auto_detect: true,
            collection_handles: Vec::new(),
        }
    }
}

impl BuilderSettings {
    /// Whether `handle` is listed explicitly in `collection_handles`.
    #[must_use]
    pub fn lists_collection(&self, handle: &str) -> bool {
        let handle = handle.trim();
        self.collection_handles
            .iter()
            .any(|h| h.trim().eq_ignore_ascii_case(handle))
    }
}

/// Load and validate builder settings from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_builder_settings(path: &Path) -> Result<BuilderSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings: BuilderSettings =
        serde_yaml::from_str(&content).map_err(ConfigError::SettingsFileParse)?;

    validate_settings(&settings)?;

    Ok(settings)
}

/// Whether the collection with this handle should render the builder.
///
/// Explicitly listed handles always match. With `auto_detect` on, a handle
/// also matches when it is a known builder collection or contains one of
/// the builder keywords.
#[must_use]
pub fn is_ring_builder_collection(handle: &str, settings: &BuilderSettings) -> bool {
    if settings.lists_collection(handle) {
        return true;
    }
    if !settings.auto_detect {
        return false;
    }

    let handle = handle.trim().to_lowercase();
    KNOWN_COLLECTIONS.contains(&handle.as_str())
        || COLLECTION_KEYWORDS.iter().any(|k| handle.contains(k))
}

fn validate_settings(settings: &BuilderSettings) -> Result<(), ConfigError> {
    if settings.per_page == 0 {
        return Err(ConfigError::Validation(
            "per_page must be at least 1".to_string(),
        ));
    }

    for (name, value) in [
        ("per_row_desktop", settings.per_row_desktop),
        ("per_row_mobile", settings.per_row_mobile),
    ] {
        if !(1..=6).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{name} is {value}; must be between 1 and 6"
            )));
        }
    }

    for (name, url) in [("gem_url", &settings.gem_url), ("set_url", &settings.set_url)] {
        if !url.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{name} '{url}' must be a site-relative path starting with '/'"
            )));
        }
    }

    if settings.collection_handles.iter().any(|h| h.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "collection_handles must not contain empty entries".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
