//! Output naming and writing of exported configs.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::{GabaritoError, Result};

use super::assembler::ExportedConfig;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());
static CONFIG_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^config_").unwrap());
static JSON_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.json$").unwrap());

/// File name for an export: `config_<NAME>.json`.
///
/// The `.json` suffix and a `config_` prefix are dropped, whitespace runs
/// become `_`, anything outside letters, digits, `_` and `-` is removed and
/// the rest is upper-cased.
pub fn export_file_name(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let without_suffix = JSON_SUFFIX.replace(trimmed, "");
    let underscored = WHITESPACE.replace_all(&without_suffix, "_");
    let sanitized = DISALLOWED.replace_all(&underscored, "");
    let name = CONFIG_PREFIX.replace(&sanitized, "");

    if name.is_empty() {
        return Err(GabaritoError::InvalidFileName(input.to_string()));
    }
    Ok(format!("config_{}.json", name.to_uppercase()))
}

impl ExportedConfig {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    GabaritoError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            GabaritoError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            GabaritoError::Persistence(format!("Failed to serialize config: {}", e))
        })?;

        info!(path = %path.display(), mappings = self.column_mapping.len(), "config written");
        Ok(())
    }

    /// Save under `dir` using the name produced by [`export_file_name`].
    pub fn save_named(&self, dir: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
        let path = dir.as_ref().join(export_file_name(name)?);
        self.save(&path)?;
        Ok(path)
    }
}
