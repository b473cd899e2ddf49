//! Standing and crouching hitbox profiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;

/// Which hitbox profile is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    /// Full-height box
    #[default]
    Standing,
    /// Reduced-height box
    Crouching,
}

impl Stance {
    /// Maps a crouch flag to a stance.
    #[must_use]
    pub const fn from_crouching(crouching: bool) -> Self {
        if crouching {
            Self::Crouching
        } else {
            Self::Standing
        }
    }
}

/// Box size and its offset from the character position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxProfile {
    /// Full width and height
    pub size: Vec2,
    /// Box center relative to the character position
    pub offset: Vec2,
}

impl HitboxProfile {
    /// Creates a profile.
    #[must_use]
    pub const fn new(size: Vec2, offset: Vec2) -> Self {
        Self { size, offset }
    }

    /// World-space box for a character at `position`.
    #[must_use]
    pub fn bounds_at(&self, position: Vec2) -> Aabb {
        Aabb::from_center_size(position + self.offset, self.size)
    }
}

/// The two profiles a character switches between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxProfiles {
    /// Profile used while standing
    pub standing: HitboxProfile,
    /// Profile used while crouching
    pub crouching: HitboxProfile,
}

impl Default for HitboxProfiles {
    fn default() -> Self {
        // Crouching keeps the feet where they are and lowers the head.
        Self {
            standing: HitboxProfile::new(Vec2::new(1.0, 2.0), Vec2::ZERO),
            crouching: HitboxProfile::new(Vec2::new(1.0, 1.0), Vec2::new(0.0, -0.5)),
        }
    }
}

impl HitboxProfiles {
    /// Returns the profile for `stance`.
    #[must_use]
    pub const fn get(&self, stance: Stance) -> &HitboxProfile {
        match stance {
            Stance::Standing => &self.standing,
            Stance::Crouching => &self.crouching,
        }
    }

    /// Height gained when standing up from a crouch.
    #[must_use]
    pub fn height_difference(&self) -> f32 {
        (self.standing.size.y.abs() - self.crouching.size.y.abs()).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_share_feet() {
        let profiles = HitboxProfiles::default();
        let position = Vec2::new(3.0, 1.0);
        let standing = profiles.get(Stance::Standing).bounds_at(position);
        let crouching = profiles.get(Stance::Crouching).bounds_at(position);
        assert!((standing.min.y - crouching.min.y).abs() < 1e-6);
        assert!(standing.max.y > crouching.max.y);
    }

    #[test]
    fn test_height_difference() {
        let profiles = HitboxProfiles::default();
        assert!((profiles.height_difference() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stance_from_crouching() {
        assert_eq!(Stance::from_crouching(true), Stance::Crouching);
        assert_eq!(Stance::from_crouching(false), Stance::Standing);
        assert_eq!(Stance::default(), Stance::Standing);
    }
}
