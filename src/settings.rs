use crate::errors::{Result, SplitError};
use crate::image_loader::LoadLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Output
    /// Where channel images and charts go; `None` means next to the input.
    pub output_dir: Option<PathBuf>,
    pub write_csv: bool,

    // Processing
    pub parallel: bool,

    // Loading limits
    pub max_file_size_mb: u64,
    pub max_megapixels: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = LoadLimits::default();
        Self {
            output_dir: None,
            write_csv: false,

            parallel: true,

            max_file_size_mb: limits.max_file_size_mb,
            max_megapixels: limits.max_megapixels,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "chromasplit", "ChromaSplit")
        .map(|proj_dirs| proj_dirs.config_dir().join("settings.json"))
}

impl Settings {
    /// Loads the user's settings, falling back to defaults when missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring settings at {:?}: {}", config_path, e),
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path().ok_or_else(|| SplitError::SettingsError {
            message: "no home directory to store settings in".to_string(),
        })?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn load_limits(&self) -> LoadLimits {
        LoadLimits {
            max_file_size_mb: self.max_file_size_mb,
            max_megapixels: self.max_megapixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            output_dir: Some(PathBuf::from("/tmp/out")),
            write_csv: true,
            parallel: false,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "write_csv": true }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.write_csv);
        assert!(settings.parallel);
        assert_eq!(settings.load_limits(), LoadLimits::default());
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert_eq!(err.error_code(), "JSON_ERROR");
    }

    #[test]
    fn test_max_limits_from_file_load_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "max_file_size_mb": 18446744073709551615, "max_megapixels": 18446744073709551615 }"#,
        )
        .unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.max_file_size_mb, u64::MAX);

        let image_path = dir.path().join("pixel.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]))
            .save(&image_path)
            .unwrap();
        assert!(crate::image_loader::load_image(&image_path, settings.load_limits()).is_ok());
    }
}
