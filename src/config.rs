//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/conceptmap/conceptmap.toml`
//! 3. Environment variables: `CONCEPTMAP_*` prefix, `__` as section
//!    separator (e.g. `CONCEPTMAP_ENDPOINT`, `CONCEPTMAP_EXPORT__PIXEL_RATIO`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::Canvas;
use crate::view::{ZoomBounds, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Load(#[from] ConfigError),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Logical drawing surface size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 800.0,
        }
    }
}

/// Zoom clamp range for the interactive view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Image export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ExportSettings {
    /// Pixel-density multiplier (0 → default 2)
    pub pixel_ratio: f32,
    /// Explicit clipboard command, e.g. "wl-copy -t image/png"
    pub clipboard_command: Option<String>,
    /// TTF/OTF font for node labels
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Mind map generation endpoint
    pub endpoint: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Skip the service entirely and always use the local placeholder
    pub offline: bool,
    pub canvas: CanvasConfig,
    pub zoom: ZoomConfig,
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/mindmap".into(),
            timeout_secs: 30,
            offline: false,
            canvas: CanvasConfig::default(),
            zoom: ZoomConfig::default(),
            export: ExportSettings {
                pixel_ratio: 2.0,
                clipboard_command: None,
                font_path: None,
            },
        }
    }
}

impl Settings {
    /// Loads layered settings: global TOML (if present) overridden by
    /// `CONCEPTMAP_*` environment variables, on top of compiled defaults.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(Self::global_config_path().as_deref())
    }

    /// Same as [`Settings::load`] with an explicit config file (used by tests).
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("CONCEPTMAP")
                .separator("__")
                .try_parsing(true),
        );
        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "conceptmap").map(|d| d.config_dir().join("conceptmap.toml"))
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes a template with the compiled defaults to `path`.
    pub fn write_template(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                context: format!("creating {}", parent.display()),
                source,
            })?;
        }
        let body = Self::default().to_toml()?;
        std::fs::write(path, body).map_err(|source| SettingsError::Io {
            context: format!("writing {}", path.display()),
            source,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.canvas.width,
            height: self.canvas.height,
        }
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds {
            min: self.zoom.min,
            max: self.zoom.max,
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
