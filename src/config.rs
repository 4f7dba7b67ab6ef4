//! Scene configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.
//! Every field has a default matching the reference NES layout: four
//! nametables arranged as a 64x60 grid of 8x8 tiles.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::rasterizer::{Color, Vec3};

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Colors used by the overlay passes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayColors {
    /// Wash drawn over emphasised (stenciled) pixels
    pub highlight_wash: Color,
    /// Nametable grid lines
    pub nametable_grid: Color,
    /// OAM sprite outlines
    pub sprite_outline: Color,
    /// Framebuffer clear color
    pub clear: Color,
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            highlight_wash: Color::from_f32(1.0, 1.0, 1.0, 0.3),
            nametable_grid: Color::from_f32(1.0, 0.0, 0.0, 0.1),
            sprite_outline: Color::WHITE,
            clear: Color::new(20, 20, 25),
        }
    }
}

/// Scene layout, camera and input tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Background grid width in tiles
    pub grid_width: usize,
    /// Background grid height in tiles
    pub grid_height: usize,
    /// Tile edge in scene pixels
    pub tile_size: usize,
    /// Sprite edge in scene pixels (hit box)
    pub sprite_size: usize,
    /// World units per scene pixel, horizontally
    pub pixel_size_w: f32,
    /// World units per scene pixel, vertically
    pub pixel_size_h: f32,
    /// Nametable size in tiles (grid overlay spacing)
    pub nametable_width: usize,
    pub nametable_height: usize,
    /// Initial camera position
    pub camera_start: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Degrees of rotation per pixel of mouse movement
    pub rotate_speed: f32,
    /// World units per frame for keyboard panning
    pub pan_speed: f32,
    pub overlay: OverlayColors,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            grid_width: 64,
            grid_height: 60,
            tile_size: 8,
            sprite_size: 8,
            pixel_size_w: 2.0 / 256.0,
            pixel_size_h: 2.0 / 240.0,
            nametable_width: 32,
            nametable_height: 30,
            camera_start: Vec3::new(0.0, 0.0, -2.0),
            fov_degrees: 60.0,
            rotate_speed: 1.0 / 3.0,
            pan_speed: 0.02,
            overlay: OverlayColors::default(),
        }
    }
}

impl SceneConfig {
    /// Scene width in scene pixels
    pub fn pixel_width(&self) -> usize {
        self.grid_width * self.tile_size
    }

    /// Scene height in scene pixels
    pub fn pixel_height(&self) -> usize {
        self.grid_height * self.tile_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid("grid dimensions must be non-zero".into()));
        }
        if self.tile_size == 0 || self.sprite_size == 0 {
            return Err(ConfigError::Invalid("tile and sprite size must be non-zero".into()));
        }
        if self.pixel_size_w <= 0.0 || self.pixel_size_h <= 0.0 {
            return Err(ConfigError::Invalid("pixel sizes must be positive".into()));
        }
        if self.nametable_width == 0 || self.nametable_height == 0 {
            return Err(ConfigError::Invalid("nametable dimensions must be non-zero".into()));
        }
        if !(1.0..179.0).contains(&self.fov_degrees) {
            return Err(ConfigError::Invalid(format!("fov {} out of range", self.fov_degrees)));
        }
        Ok(())
    }

    /// Load and validate a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse and validate a config from a RON string
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_reference_layout() {
        let config = SceneConfig::default();
        assert_eq!(config.pixel_width(), 512);
        assert_eq!(config.pixel_height(), 480);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = SceneConfig::from_ron("(grid_width: 32, fov_degrees: 45.0)").unwrap();
        assert_eq!(config.grid_width, 32);
        assert_eq!(config.grid_height, 60);
        assert_eq!(config.pixel_width(), 256);
    }

    #[test]
    fn test_zero_grid_rejected() {
        let err = SceneConfig::from_ron("(grid_height: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(tile_size: 8, camera_start: (x: 0.0, y: 0.5, z: -3.0))").unwrap();
        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.camera_start, Vec3::new(0.0, 0.5, -3.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SceneConfig::load("/nonexistent/scene.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
