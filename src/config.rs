//! Viewer configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command-line flags are applied on top of the loaded file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::{ExportSettings, EXPORT_FILENAME, EXPORT_HEIGHT, EXPORT_WIDTH};
use crate::render::TargetSize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width of the initial window
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Modern Residential Façade".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Limits applied to the window's scale factor when picking a pixel density
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub min_pixel_ratio: f32,
    pub max_pixel_ratio: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_pixel_ratio: 1.0,
            max_pixel_ratio: 2.0,
        }
    }
}

impl RenderConfig {
    pub fn clamp_pixel_ratio(&self, scale_factor: f64) -> f32 {
        (scale_factor as f32).clamp(self.min_pixel_ratio, self.max_pixel_ratio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub filename: String,
    /// Where exported images are written
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: EXPORT_WIDTH,
            height: EXPORT_HEIGHT,
            pixel_ratio: 1.0,
            filename: EXPORT_FILENAME.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            size: TargetSize::new(self.width, self.height),
            pixel_ratio: self.pixel_ratio,
            filename: self.filename.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub export: ExportConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read/write config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ViewerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path.as_ref(), contents).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        let render = &self.render;
        if !(render.min_pixel_ratio > 0.0 && render.min_pixel_ratio <= render.max_pixel_ratio) {
            return invalid(format!(
                "pixel ratio range [{}, {}] is empty or non-positive",
                render.min_pixel_ratio, render.max_pixel_ratio
            ));
        }
        if self.export.width == 0 || self.export.height == 0 {
            return invalid(format!(
                "export size must be non-zero, got {}x{}",
                self.export.width, self.export.height
            ));
        }
        if !(self.export.pixel_ratio > 0.0) {
            return invalid(format!("export pixel ratio must be positive, got {}", self.export.pixel_ratio));
        }
        if self.export.filename.trim().is_empty() {
            return invalid("export filename is empty".to_string());
        }
        Ok(())
    }
}
