//! Settings from flags, environment and an optional TOML file.
//!
//! Precedence: flags and environment, then the file, then defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use campaign_core::campaign::DEFAULT_MODEL;
use campaign_core::generation::{DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use campaign_core::GenerationOptions;
use campaign_gemini::DEFAULT_API_BASE;
use serde::Deserialize;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "campaign.toml";
/// Artifact directory when none is configured.
pub const DEFAULT_ARTIFACTS_DIR: &str = "images";

/// Contents of the TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "GEMINI_API_KEY")]
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub artifacts_dir: Option<PathBuf>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub api_base: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load the explicit file, or the default one when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub artifacts_dir: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` when no non-empty key was found anywhere.
    pub api_key: Option<String>,
    pub model: String,
    pub artifacts_dir: PathBuf,
    pub options: GenerationOptions,
    pub api_base: String,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let non_blank = |k: String| {
            let k = k.trim().to_string();
            (!k.is_empty()).then_some(k)
        };
        let api_key = overrides
            .api_key
            .and_then(non_blank)
            .or_else(|| file.api_key.and_then(non_blank));

        Self {
            api_key,
            model: overrides
                .model
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            artifacts_dir: overrides
                .artifacts_dir
                .or(file.artifacts_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
            options: GenerationOptions {
                temperature: file.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                top_p: file.top_p.unwrap_or(DEFAULT_TOP_P),
            },
            api_base: file.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file() {
        let config: FileConfig = toml::from_str(
            r#"
GEMINI_API_KEY = "secret"
model = "gemini-pro"
artifacts_dir = "out/images"
temperature = 0.2
"#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model.as_deref(), Some("gemini-pro"));
        assert_eq!(config.artifacts_dir, Some(PathBuf::from("out/images")));
        assert_eq!(config.temperature, Some(0.2));
        assert!(config.top_p.is_none());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(Overrides::default(), FileConfig::default());
        assert!(settings.api_key.is_none());
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.artifacts_dir, PathBuf::from("images"));
        assert_eq!(settings.options, GenerationOptions::default());
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            model: Some("gemini-pro".to_string()),
            ..Default::default()
        };
        let overrides = Overrides {
            api_key: Some("from-env".to_string()),
            model: None,
            artifacts_dir: Some(PathBuf::from("/tmp/art")),
        };
        let settings = Settings::resolve(overrides, file);
        assert_eq!(settings.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.artifacts_dir, PathBuf::from("/tmp/art"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let overrides = Overrides {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(overrides, FileConfig::default()).api_key.is_none());

        let overrides = Overrides {
            api_key: Some(String::new()),
            ..Default::default()
        };
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Settings::resolve(overrides, file).api_key.as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.toml");
        std::fs::write(&path, "GEMINI_API_KEY = \"k\"\ntop_p = 0.9\n").unwrap();
        let config = FileConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.top_p, Some(0.9));

        std::fs::write(&path, "temperature = \"hot\"").unwrap();
        assert!(FileConfig::from_file(&path).is_err());
    }
}
