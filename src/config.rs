//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mediakit/mediakit.toml`
//! 3. Environment variables: `MEDIAKIT_*` prefix, `__` between sections
//!    (e.g. `MEDIAKIT_RETRY__MAX_ATTEMPTS=5`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{DomainError, SortBy};

/// Retrying loader settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    /// Upper bound on attempts per load, at least 1
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GallerySettings {
    /// Strategy used when none is given on the command line
    pub sort_by: SortBy,
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub retry: RawRetrySettings,
    pub gallery: RawGallerySettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRetrySettings {
    pub max_attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGallerySettings {
    pub sort_by: Option<SortBy>,
}

/// Unified configuration for mediakit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub retry: RetrySettings,
    pub gallery: GallerySettings,
}

/// Get the XDG config directory for mediakit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mediakit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mediakit.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            retry: RetrySettings {
                max_attempts: overlay
                    .retry
                    .max_attempts
                    .unwrap_or(self.retry.max_attempts),
                delay_ms: overlay.retry.delay_ms.unwrap_or(self.retry.delay_ms),
            },
            gallery: GallerySettings {
                sort_by: overlay.gallery.sort_by.unwrap_or(self.gallery.sort_by),
            },
        }
    }

    /// Load settings with layered precedence from the XDG global config.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `global_path` as the global config file.
    ///
    /// A missing file is skipped; an unreadable or malformed one is an error.
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply MEDIAKIT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MEDIAKIT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("retry.max_attempts") {
            settings.retry.max_attempts = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("MEDIAKIT_RETRY__MAX_ATTEMPTS is not a number: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("retry.delay_ms") {
            settings.retry.delay_ms = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("MEDIAKIT_RETRY__DELAY_MS is not a number: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("gallery.sort_by") {
            let sort_by: SortBy = val.parse().map_err(|e: DomainError| ApplicationError::Config {
                message: format!("MEDIAKIT_GALLERY__SORT_BY: {e}"),
            })?;
            settings.gallery.sort_by = sort_by;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.retry.max_attempts == 0 {
            return Err(ApplicationError::Config {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mediakit configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mediakit/mediakit.toml
#   Env:    MEDIAKIT_* environment variables, e.g. MEDIAKIT_RETRY__MAX_ATTEMPTS=5

[retry]
# Attempts per image load before giving up (at least 1)
# max_attempts = 3

# Pause between attempts in milliseconds
# delay_ms = 0

[gallery]
# Default ordering: "date", "name" or "size"
# sort_by = "date"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
