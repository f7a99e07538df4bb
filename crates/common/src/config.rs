//! Engine configuration.
//!
//! All scene parameters are fixed for the lifetime of a session. They can be
//! overridden from a YAML file; any key left out keeps its default.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest ray a config may ask for. Past this, unit steps lose enough f32
/// precision that a traversal could stop advancing.
pub const MAX_RENDER_DISTANCE: f32 = 100_000.0;

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Fixed scene, camera and shading parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Side length of the voxel cube.
    pub grid_side: usize,
    /// Frame buffer width in pixels.
    pub width: u32,
    /// Frame buffer height in pixels.
    pub height: u32,
    /// Vertical field of view, in degrees. The horizontal extent is scaled
    /// by the aspect ratio.
    pub fov_degrees: f32,
    /// Rays give up after travelling this far.
    pub render_distance: f32,
    /// Brightness floor applied even in full shadow.
    pub ambient: f32,
    /// Direction towards the light. Normalized on load.
    pub light_direction: Vec3,
    /// Offset along the light direction for shadow ray origins.
    pub shadow_bias: f32,
    /// Camera movement per tick.
    pub move_speed: f32,
    /// Speed factor while the modifier key is held.
    pub fast_multiplier: f32,
    /// Radians of rotation per unit of pointer motion.
    pub sensitivity: f32,
    /// Fixed delay between frames.
    pub frame_delay_ms: u64,
    /// Scene generation seed.
    pub seed: u64,
    /// Each generated voxel is solid with probability `1 / solid_one_in`.
    pub solid_one_in: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_side: 16,
            width: 320,
            height: 180,
            fov_degrees: 75.0,
            render_distance: 32.0,
            ambient: 0.5,
            light_direction: Vec3::new(-0.801784, 0.534522, -0.267261),
            shadow_bias: 0.001,
            move_speed: 0.2,
            fast_multiplier: 3.0,
            sensitivity: 0.001,
            frame_delay_ms: 8,
            seed: 42,
            solid_one_in: 50,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validated()
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Check every field and normalize the light direction.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        fn is_positive(value: f32) -> bool {
            value > 0.0
        }

        if self.grid_side == 0 {
            return Err(invalid("grid_side", "must be at least 1"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(invalid("width/height", "frame must be at least 1x1"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid(
                "fov_degrees",
                format!("{} is outside (0, 180)", self.fov_degrees),
            ));
        }
        if !is_positive(self.render_distance) {
            return Err(invalid("render_distance", "must be positive"));
        }
        if self.render_distance > MAX_RENDER_DISTANCE {
            return Err(invalid(
                "render_distance",
                format!("{} exceeds the limit of {MAX_RENDER_DISTANCE}", self.render_distance),
            ));
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return Err(invalid(
                "ambient",
                format!("{} is outside [0, 1]", self.ambient),
            ));
        }
        if self.shadow_bias.is_nan() || self.shadow_bias < 0.0 {
            return Err(invalid("shadow_bias", "must not be negative"));
        }
        if !is_positive(self.move_speed) {
            return Err(invalid("move_speed", "must be positive"));
        }
        if !is_positive(self.fast_multiplier) {
            return Err(invalid("fast_multiplier", "must be positive"));
        }
        if !is_positive(self.sensitivity) {
            return Err(invalid("sensitivity", "must be positive"));
        }
        if self.solid_one_in == 0 {
            return Err(invalid("solid_one_in", "must be at least 1"));
        }
        self.light_direction = self
            .light_direction
            .try_normalize()
            .ok_or_else(|| invalid("light_direction", "must be a non-zero vector"))?;

        Ok(self)
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default().validated().unwrap();
        assert_eq!(config.grid_side, 16);
        assert_eq!((config.width, config.height), (320, 180));
        assert!((config.light_direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str("width: 64\nheight: 48\nambient: 0.25\n").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 48);
        assert_eq!(config.ambient, 0.25);
        assert_eq!(config.render_distance, 32.0);
        assert_eq!(config.grid_side, 16);
    }

    #[test]
    fn light_direction_is_normalized() {
        let config = EngineConfig::from_yaml_str("light_direction: [0.0, 2.0, 0.0]").unwrap();
        assert_eq!(config.light_direction, Vec3::Y);
    }

    #[test]
    fn rejects_invalid_values() {
        let cases = [
            ("grid_side: 0", "grid_side"),
            ("width: 0", "width/height"),
            ("fov_degrees: 180.0", "fov_degrees"),
            ("render_distance: -1.0", "render_distance"),
            ("render_distance: .nan", "render_distance"),
            ("render_distance: 2.0e7", "render_distance"),
            ("ambient: 1.5", "ambient"),
            ("light_direction: [0.0, 0.0, 0.0]", "light_direction"),
            ("solid_one_in: 0", "solid_one_in"),
        ];
        for (yaml, expected) in cases {
            match EngineConfig::from_yaml_str(yaml) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{yaml}"),
                other => panic!("{yaml}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn render_distance_limit_is_inclusive() {
        let yaml = format!("render_distance: {MAX_RENDER_DISTANCE}");
        let config = EngineConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.render_distance, MAX_RENDER_DISTANCE);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            EngineConfig::from_yaml_str("widht: 10"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed: 7\nfov_degrees: 90.0").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert!((config.fov_radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
