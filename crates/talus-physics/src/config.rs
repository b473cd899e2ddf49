//! Controller configuration.
//!
//! Everything the resolver needs to know about a character that does not
//! change frame to frame. Loaded from TOML by hosts, validated once when a
//! [`crate::character::Character`] is built.

use serde::{Deserialize, Serialize};
use talus_common::{ConfigError, LayerMask};

use crate::hitbox::{HitboxProfile, HitboxProfiles};
use crate::origins::RayCounts;

/// Collision resolver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Probe rays per sweep
    pub rays: RayCounts,
    /// Inset applied to the box before casting
    pub skin_width: f32,
    /// Steepest slope (degrees) that can be walked up
    pub max_climb_angle: f32,
    /// Steepest slope (degrees) that is followed when walking down
    pub max_descend_angle: f32,
    /// Layers that block the character
    pub collision_mask: LayerMask,
    /// Standing and crouching boxes
    pub profiles: HitboxProfiles,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rays: RayCounts::default(),
            skin_width: 0.015,
            max_climb_angle: 80.0,
            max_descend_angle: 75.0,
            collision_mask: LayerMask::MASK_CHARACTER,
            profiles: HitboxProfiles::default(),
        }
    }
}

impl ControllerConfig {
    /// Checks every construction-time invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rays.horizontal < 2 {
            return Err(ConfigError::RayCountTooLow {
                axis: "horizontal",
                count: self.rays.horizontal,
            });
        }
        if self.rays.vertical < 2 {
            return Err(ConfigError::RayCountTooLow {
                axis: "vertical",
                count: self.rays.vertical,
            });
        }

        if self.skin_width.is_nan() || self.skin_width <= 0.0 {
            return Err(ConfigError::NonPositiveSkin(self.skin_width));
        }

        check_angle("max_climb_angle", self.max_climb_angle)?;
        check_angle("max_descend_angle", self.max_descend_angle)?;

        self.check_profile("standing", &self.profiles.standing)?;
        self.check_profile("crouching", &self.profiles.crouching)
    }

    fn check_profile(&self, name: &'static str, profile: &HitboxProfile) -> Result<(), ConfigError> {
        let size = profile.size;
        if size.is_nan() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(ConfigError::InvalidProfileSize {
                profile: name,
                width: size.x,
                height: size.y,
            });
        }

        let limit = size.min_element() * 0.5;
        if self.skin_width >= limit {
            return Err(ConfigError::SkinTooThick {
                skin: self.skin_width,
                profile: name,
                limit,
            });
        }
        Ok(())
    }
}

fn check_angle(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::AngleOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ControllerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.rays.horizontal, 4);
        assert_eq!(config.max_climb_angle, 80.0);
        assert_eq!(config.max_descend_angle, 75.0);
    }

    #[test]
    fn test_rejects_single_ray() {
        let mut config = ControllerConfig::default();
        config.rays.vertical = 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RayCountTooLow {
                axis: "vertical",
                count: 1
            })
        );
    }

    #[test]
    fn test_rejects_non_positive_skin() {
        let mut config = ControllerConfig::default();
        config.skin_width = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveSkin(0.0)));

        config.skin_width = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveSkin(_))
        ));
    }

    #[test]
    fn test_rejects_skin_thicker_than_crouch_box() {
        let mut config = ControllerConfig::default();
        config.profiles.crouching.size = Vec2::new(1.0, 0.02);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SkinTooThick {
                profile: "crouching",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_angle_out_of_range() {
        let mut config = ControllerConfig::default();
        config.max_climb_angle = 95.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::AngleOutOfRange {
                name: "max_climb_angle",
                value: 95.0
            })
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ControllerConfig = toml::from_str(
            r"
            skin_width = 0.02
            max_climb_angle = 60.0

            [rays]
            horizontal = 6
            vertical = 3
            ",
        )
        .expect("parse");

        assert_eq!(config.skin_width, 0.02);
        assert_eq!(config.max_climb_angle, 60.0);
        assert_eq!(config.max_descend_angle, 75.0);
        assert_eq!(config.rays.horizontal, 6);
        assert_eq!(config.collision_mask, LayerMask::MASK_CHARACTER);
        assert_eq!(config.validate(), Ok(()));
    }
}
