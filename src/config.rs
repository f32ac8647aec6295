//! Viewer settings loaded from an optional JSON file.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::DEFAULT_POSITION;
use crate::gizmo::DEFAULT_GIZMO_SIZE;
use crate::math::Color;
use crate::navigator::DEFAULT_DAMPING;
use crate::scenes::{DEFAULT_CUBE_COLOR, MAX_LIGHT_INTENSITY};
use crate::selection::HIGHLIGHT_COLOR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub light_intensity: f32,
    pub light_color: Color,
    pub cube_color: Color,
    pub highlight_color: Color,
    pub camera_position: [f32; 3],
    pub gizmo_size: f32,
    pub damping: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            light_intensity: 1.0,
            light_color: Color::WHITE,
            cube_color: Color::from_hex(DEFAULT_CUBE_COLOR),
            highlight_color: Color::from_hex(HIGHLIGHT_COLOR),
            camera_position: DEFAULT_POSITION.to_array(),
            gizmo_size: DEFAULT_GIZMO_SIZE,
            damping: DEFAULT_DAMPING,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }

    /// Clamps values into the ranges the controls accept.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.light_intensity = if self.light_intensity.is_finite() {
            self.light_intensity.clamp(0.0, MAX_LIGHT_INTENSITY)
        } else {
            defaults.light_intensity
        };
        if !self.gizmo_size.is_finite() || self.gizmo_size <= 0.0 {
            self.gizmo_size = defaults.gizmo_size;
        }
        self.damping = if self.damping.is_finite() {
            self.damping.clamp(0.0, 1.0)
        } else {
            defaults.damping
        };
        if !self.camera_position.iter().all(|c| c.is_finite()) {
            self.camera_position = defaults.camera_position;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ViewerConfig::from_json(r#"{ "light_intensity": 2.5 }"#).unwrap();
        assert_eq!(config.light_intensity, 2.5);
        assert_eq!(config.cube_color, Color::from_hex(0x44aa88));
        assert_eq!(config.highlight_color, Color::from_hex(0xffff00));
        assert_eq!(config.camera_position, [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_colors_parse_from_hex_strings() {
        let config = ViewerConfig::from_json(r##"{ "light_color": "#ff8800" }"##).unwrap();
        assert_eq!(config.light_color.to_hex(), 0xff8800);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = ViewerConfig::from_json(r#"{ "light_intensity": 12.0, "damping": -1.0, "gizmo_size": 0 }"#).unwrap();
        assert_eq!(config.light_intensity, 3.0);
        assert_eq!(config.damping, 0.0);
        assert_eq!(config.gizmo_size, 1.5);
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let err = ViewerConfig::from_json(r#"{ "cube_color": "green" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ViewerConfig::load("/nonexistent/viewer.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/viewer.json"));
    }
}
