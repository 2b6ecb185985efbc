//! Stage Configuration
//!
//! [`StageConfig`] gathers every tunable of the viewer: where assets live,
//! which models the catalog cycles through, which clip files are streamed,
//! and how cross-fades behave. Every field has a default, so an empty JSON
//! object (or no file at all) yields the stock setup.
//!
//! ```rust,ignore
//! let config = StageConfig::from_json_file("stage.json")?;
//! let session = Session::new(config)?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::assets::catalog::ClipCategory;
use crate::errors::{Result, StageError};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Local directory or `http(s)://` base URL holding `models/`.
    pub resource_root: String,
    /// Model files (relative to `models/`) cycled by next/previous.
    pub models: Vec<String>,
    /// Sub-directory of `models/animations/` holding the clip categories.
    /// Empty means the categories sit directly under `models/animations/`.
    pub animation_pack: String,
    pub idle: ClipSetConfig,
    pub dance: ClipSetConfig,
    pub expression: ClipSetConfig,
    pub blend: BlendSettings,
    pub environment: EnvironmentConfig,
    pub window: WindowConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            resource_root: "resources".to_string(),
            models: vec!["readyplayer2.glb".to_string()],
            animation_pack: "masculine".to_string(),
            idle: ClipSetConfig::new(ClipCategory::Idle, "M_Standing_Idle_Variations_", 2, 1),
            dance: ClipSetConfig::new(ClipCategory::Dance, "M_Dances_", 1, 9),
            expression: ClipSetConfig::new(ClipCategory::Expression, "M_Standing_Expressions_", 6, 4),
            blend: BlendSettings::default(),
            environment: EnvironmentConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl StageConfig {
    /// Parses a configuration from JSON text and validates it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::info!("Loaded stage configuration from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(StageError::EmptyCatalog);
        }
        if !(self.blend.step > 0.0 && self.blend.step <= 1.0) {
            return Err(StageError::InvalidConfig(format!(
                "blend.step must be in (0, 1], got {}",
                self.blend.step
            )));
        }
        if !self.blend.speed_ratio.is_finite() || self.blend.speed_ratio <= 0.0 {
            return Err(StageError::InvalidConfig(format!(
                "blend.speed_ratio must be positive, got {}",
                self.blend.speed_ratio
            )));
        }
        for set in self.clip_sets() {
            if set.first.checked_add(set.count).is_none() {
                return Err(StageError::InvalidConfig(format!(
                    "clip set '{}' numbers past {}",
                    set.prefix,
                    u32::MAX
                )));
            }
        }
        Ok(())
    }

    /// Clip sets in fetch order: idle, dance, expression.
    #[must_use]
    pub fn clip_sets(&self) -> [&ClipSetConfig; 3] {
        [&self.idle, &self.dance, &self.expression]
    }
}

/// A run of numbered clip files inside one category directory.
///
/// Files are named `<prefix><number>.glb` with the number zero-padded to
/// `pad_width` digits, covering `first..first + count`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipSetConfig {
    pub category: ClipCategory,
    pub prefix: String,
    pub first: u32,
    pub count: u32,
    #[serde(default = "default_pad_width")]
    pub pad_width: usize,
}

fn default_pad_width() -> usize {
    3
}

impl ClipSetConfig {
    #[must_use]
    pub fn new(category: ClipCategory, prefix: &str, first: u32, count: u32) -> Self {
        Self {
            category,
            prefix: prefix.to_string(),
            first,
            count,
            pad_width: default_pad_width(),
        }
    }

    /// File names of this set, in ascending numeric order.
    pub fn file_names(&self) -> impl Iterator<Item = String> + '_ {
        (self.first..self.first.saturating_add(self.count))
            .map(|n| format!("{}{:0width$}.glb", self.prefix, n, width = self.pad_width))
    }
}

/// Cross-fade tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BlendSettings {
    /// Weight transferred from the old clip to the new one per frame.
    pub step: f32,
    /// Requests closer than this to the previous accepted one are dropped.
    pub cooldown_ms: u64,
    /// Playback speed of clips started by a blend.
    pub speed_ratio: f32,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            step: 0.02,
            cooldown_ms: 500,
            speed_ratio: 1.0,
        }
    }
}

impl BlendSettings {
    #[inline]
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Optional reflection environment attached to model materials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Absolute URL, or a path relative to the resource root. `None` disables it.
    pub texture: Option<String>,
    pub reflection_level: f32,
    pub environment_intensity: f32,
    /// Rotation of the environment around the vertical axis, in degrees.
    pub rotation_degrees: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            texture: Some(
                "https://assets.babylonjs.com/environments/environmentSpecular.dds".to_string(),
            ),
            reflection_level: 0.9,
            environment_intensity: 0.7,
            rotation_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Avatar Stage".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = StageConfig::from_json_str("{}").unwrap();
        assert_eq!(config.models, vec!["readyplayer2.glb".to_string()]);
        assert_eq!(config.dance.count, 9);
        assert_eq!(config.expression.first, 6);
        assert!((config.blend.step - 0.02).abs() < f32::EPSILON);
        assert_eq!(config.blend.cooldown(), Duration::from_millis(500));
    }

    #[test]
    fn file_names_are_zero_padded() {
        let set = ClipSetConfig::new(ClipCategory::Dance, "M_Dances_", 1, 3);
        let names: Vec<_> = set.file_names().collect();
        assert_eq!(names, ["M_Dances_001.glb", "M_Dances_002.glb", "M_Dances_003.glb"]);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = StageConfig::from_json_str(r#"{ "models": [] }"#).unwrap_err();
        assert!(matches!(err, StageError::EmptyCatalog));
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = StageConfig::from_json_str(r#"{ "blend": { "step": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, StageError::InvalidConfig(_)));
    }

    #[test]
    fn nan_speed_is_rejected() {
        let mut config = StageConfig::default();
        config.blend.speed_ratio = f32::NAN;
        assert!(matches!(config.validate(), Err(StageError::InvalidConfig(_))));
    }

    #[test]
    fn overflowing_clip_numbers_are_rejected() {
        let text = r#"{ "dance": { "category": "dance", "prefix": "D_", "first": 4294967290, "count": 10 } }"#;
        let err = StageConfig::from_json_str(text).unwrap_err();
        assert!(matches!(err, StageError::InvalidConfig(_)));

        let set = ClipSetConfig::new(ClipCategory::Dance, "D_", u32::MAX - 1, 10);
        assert_eq!(set.file_names().count(), 1);
    }

    #[test]
    fn partial_blend_section_keeps_other_defaults() {
        let config = StageConfig::from_json_str(r#"{ "blend": { "cooldown_ms": 250 } }"#).unwrap();
        assert_eq!(config.blend.cooldown_ms, 250);
        assert!((config.blend.step - 0.02).abs() < f32::EPSILON);
    }
}
