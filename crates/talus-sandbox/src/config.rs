//! Sandbox configuration.
//!
//! One TOML file carries the controller, the motor and the run itself:
//!
//! ```toml
//! timestep = 0.016666668
//! frames = 240
//! spawn = [0.0, 1.0]
//! level = "levels/tunnel.ron"
//!
//! [controller]
//! skin_width = 0.015
//!
//! [motor]
//! walk_speed = 6.0
//! ```
//!
//! Missing fields fall back to their defaults.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use talus_common::{ConfigError, TalusError, TalusResult};
use talus_physics::{ControllerConfig, MotorSettings};
use tracing::info;

/// Default config file name.
pub const CONFIG_FILE: &str = "talus.toml";

/// Sandbox run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Seconds per frame
    pub timestep: f32,
    /// Frames per scripted phase
    pub frames: u32,
    /// Character spawn position
    pub spawn: Vec2,
    /// RON level file; the built-in level is used when absent
    pub level: Option<PathBuf>,
    /// Collision resolver settings
    pub controller: ControllerConfig,
    /// Movement tuning
    pub motor: MotorSettings,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            frames: 120,
            spawn: Vec2::new(-8.0, 1.0),
            level: None,
            controller: ControllerConfig::default(),
            motor: MotorSettings::default(),
        }
    }
}

impl SandboxConfig {
    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults. A file that exists but does not
    /// parse or validate is an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> TalusResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| TalusError::Parse(e.to_string()))?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> TalusResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| TalusError::Parse(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validates the run settings and both nested configurations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timestep.is_nan() || self.timestep <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "timestep",
                value: self.timestep,
            });
        }
        if self.frames == 0 {
            return Err(ConfigError::NonPositive {
                name: "frames",
                value: 0.0,
            });
        }
        self.controller.validate()?;
        self.motor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SandboxConfig::default();
        assert_eq!(config.frames, 120);
        assert!(config.level.is_none());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config =
            SandboxConfig::load_from(temp_dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, SandboxConfig::default());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = SandboxConfig::default();
        config.frames = 30;
        config.spawn = Vec2::new(2.0, 4.0);
        config.level = Some(PathBuf::from("levels/test.ron"));
        config.controller.skin_width = 0.02;
        config.motor.walk_speed = 8.0;

        config.save_to(&config_path).expect("Failed to save config");
        let loaded = SandboxConfig::load_from(&config_path).expect("Failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            "frames = 10\n\n[motor]\ncrouch_speed = 2.5\n",
        )
        .expect("write");

        let config = SandboxConfig::load_from(&config_path).expect("load");
        assert_eq!(config.frames, 10);
        assert_eq!(config.motor.crouch_speed, 2.5);
        assert_eq!(config.motor.walk_speed, 6.0);
        assert_eq!(config.controller, ControllerConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[controller]\nskin_width = -1.0\n").expect("write");

        let err = SandboxConfig::load_from(&config_path).expect_err("negative skin");
        assert!(matches!(
            err,
            TalusError::Config(ConfigError::NonPositiveSkin(_))
        ));
    }

    #[test]
    fn test_unparsable_file_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "frames = \"many\"\n").expect("write");

        let err = SandboxConfig::load_from(&config_path).expect_err("bad type");
        assert!(matches!(err, TalusError::Parse(_)));
    }
}
