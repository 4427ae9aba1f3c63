//! Program-level settings: exit codes and help rendering switches.
//!
//! Settings are plain serde data and can be loaded from YAML or JSON; the
//! format is chosen from the file extension.
//!
//! # Example YAML
//!
//! ```yaml
//! help_exit_code: 0
//! usage_error_code: 2
//! show_defaults: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving [`ProgramSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither `.json`, `.yaml` nor `.yml`.
    #[error("unsupported settings format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience alias for results with [`SettingsError`].
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Exit codes and help rendering switches for one program.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ProgramSettings;
///
/// let settings = ProgramSettings::default();
/// assert_eq!(settings.help_exit_code, 0);
/// assert_eq!(settings.usage_error_code, 1);
///
/// let custom: ProgramSettings = serde_json::from_str(r#"{"usage_error_code": 64}"#).unwrap();
/// assert_eq!(custom.usage_error_code, 64);
/// assert_eq!(custom.help_exit_code, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramSettings {
    /// Exit code after `-h`/`--help` is handled.
    pub help_exit_code: i32,
    /// Exit code after any parse, conversion or validation failure.
    pub usage_error_code: i32,
    /// Append `[default: …]` to option descriptions in help text.
    pub show_defaults: bool,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            help_exit_code: 0,
            usage_error_code: 1,
            show_defaults: true,
        }
    }
}

enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}

impl ProgramSettings {
    /// Loads settings from a `.json`, `.yaml` or `.yml` file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IoError`] if the file cannot be read,
    /// [`SettingsError::UnsupportedFormat`] for other extensions, or a
    /// parse error from the matching format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let settings = match format {
            Format::Json => serde_json::from_reader(reader)?,
            Format::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(settings)
    }

    /// Saves settings in the format implied by the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IoError`] if the file cannot be written or a
    /// serialization error from the matching format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            Format::Json => serde_json::to_writer_pretty(writer, self)?,
            Format::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        let settings = ProgramSettings {
            help_exit_code: 3,
            usage_error_code: 64,
            show_defaults: false,
        };

        settings.save(&path).unwrap();
        assert_eq!(ProgramSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"help_exit_code": 5}"#).unwrap();

        let loaded = ProgramSettings::load(&path).unwrap();
        assert_eq!(loaded.help_exit_code, 5);
        assert_eq!(loaded.usage_error_code, 1);
        assert!(loaded.show_defaults);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = ProgramSettings::load("settings.toml").unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(ext) if ext == "toml"));
    }
}
