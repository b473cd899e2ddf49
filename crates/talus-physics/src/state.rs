//! Per-move collision report.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What the character touched during one resolved move.
///
/// A fresh value is produced by every resolve. The only thing carried over
/// from the previous move is the slope angle, which becomes
/// [`slope_angle_old`](Self::slope_angle_old).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionState {
    /// Contact above (ceiling)
    pub above: bool,
    /// Contact below (ground, slope or platform)
    pub below: bool,
    /// Contact on the left
    pub left: bool,
    /// Contact on the right
    pub right: bool,
    /// Displacement was redirected up a slope
    pub climbing_slope: bool,
    /// Displacement was redirected down a slope
    pub descending_slope: bool,
    /// Slope angle in degrees touched this move
    pub slope_angle: f32,
    /// Slope angle in degrees from the previous move
    pub slope_angle_old: f32,
    /// Displacement requested at the start of the move
    pub previous_velocity: Vec2,
}

impl CollisionState {
    /// Starts the state for a new move following `previous`.
    #[must_use]
    pub fn next(previous: &CollisionState, requested: Vec2) -> Self {
        Self {
            slope_angle_old: previous.slope_angle,
            previous_velocity: requested,
            ..Self::default()
        }
    }

    /// Returns true when standing on something.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.below
    }

    /// Returns true when touching a wall on either side.
    #[must_use]
    pub fn touching_wall(&self) -> bool {
        self.left || self.right
    }

    /// Returns true when any contact flag is set.
    #[must_use]
    pub fn any_contact(&self) -> bool {
        self.above || self.below || self.left || self.right
    }

    /// Returns true while following a slope in either direction.
    #[must_use]
    pub fn on_slope(&self) -> bool {
        self.climbing_slope || self.descending_slope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_carries_only_slope_angle() {
        let previous = CollisionState {
            above: true,
            below: true,
            left: true,
            right: true,
            climbing_slope: true,
            descending_slope: false,
            slope_angle: 30.0,
            slope_angle_old: 12.0,
            previous_velocity: Vec2::new(1.0, 1.0),
        };

        let next = CollisionState::next(&previous, Vec2::new(0.5, -0.2));
        assert!(!next.any_contact());
        assert!(!next.on_slope());
        assert_eq!(next.slope_angle, 0.0);
        assert_eq!(next.slope_angle_old, 30.0);
        assert_eq!(next.previous_velocity, Vec2::new(0.5, -0.2));
    }

    #[test]
    fn test_default_is_empty() {
        let state = CollisionState::default();
        assert!(!state.is_grounded());
        assert!(!state.touching_wall());
        assert!(!state.any_contact());
    }
}
