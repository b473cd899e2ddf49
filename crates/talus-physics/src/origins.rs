//! Ray origins and spacing derived from the character's box.
//!
//! Both values are pure functions of the current bounds and the skin width.
//! Origins move with the character and are rebuilt on every resolve; spacing
//! only changes with the box size and is cached by the character between
//! profile switches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;

/// Number of parallel probe rays per sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RayCounts {
    /// Rays cast sideways, spread along the box height
    pub horizontal: u32,
    /// Rays cast up or down, spread along the box width
    pub vertical: u32,
}

impl Default for RayCounts {
    fn default() -> Self {
        Self {
            horizontal: 4,
            vertical: 4,
        }
    }
}

/// Corners of the skin-inset box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxOrigins {
    /// Inset bottom-left corner
    pub bottom_left: Vec2,
    /// Inset bottom-right corner
    pub bottom_right: Vec2,
    /// Inset top-left corner
    pub top_left: Vec2,
    /// Inset top-right corner
    pub top_right: Vec2,
}

impl BoxOrigins {
    /// Computes the origins of `bounds` shrunk by `skin` on every side.
    #[must_use]
    pub fn from_bounds(bounds: Aabb, skin: f32) -> Self {
        let inset = bounds.expanded(-skin);
        Self {
            bottom_left: inset.min,
            bottom_right: Vec2::new(inset.max.x, inset.min.y),
            top_left: Vec2::new(inset.min.x, inset.max.y),
            top_right: inset.max,
        }
    }

    /// Bottom corner on the leading side for horizontal travel in `direction`.
    #[must_use]
    pub fn leading_bottom(&self, direction: f32) -> Vec2 {
        if direction < 0.0 {
            self.bottom_left
        } else {
            self.bottom_right
        }
    }

    /// Bottom corner on the trailing side for horizontal travel in `direction`.
    #[must_use]
    pub fn trailing_bottom(&self, direction: f32) -> Vec2 {
        if direction < 0.0 {
            self.bottom_right
        } else {
            self.bottom_left
        }
    }

    /// Left corner of the row that leads vertical travel in `direction`.
    #[must_use]
    pub fn leading_row(&self, direction: f32) -> Vec2 {
        if direction < 0.0 {
            self.bottom_left
        } else {
            self.top_left
        }
    }
}

/// Distance between neighbouring parallel rays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RaySpacing {
    /// Gap between horizontal rays, measured along the box height
    pub horizontal: f32,
    /// Gap between vertical rays, measured along the box width
    pub vertical: f32,
}

impl RaySpacing {
    /// Spreads `counts` rays evenly across the skin-inset `bounds`.
    ///
    /// Counts below two are treated as two so the first and last rays always
    /// sit on the inset corners.
    #[must_use]
    pub fn from_bounds(bounds: Aabb, skin: f32, counts: RayCounts) -> Self {
        let inset = bounds.expanded(-skin);
        let horizontal = counts.horizontal.max(2);
        let vertical = counts.vertical.max(2);
        Self {
            horizontal: inset.height() / (horizontal - 1) as f32,
            vertical: inset.width() / (vertical - 1) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(1.0, 2.0))
    }

    #[test]
    fn test_origins_are_inset_by_skin() {
        let origins = BoxOrigins::from_bounds(unit_box(), 0.1);
        assert!((origins.bottom_left - Vec2::new(0.1, 0.1)).length() < 1e-6);
        assert!((origins.bottom_right - Vec2::new(0.9, 0.1)).length() < 1e-6);
        assert!((origins.top_left - Vec2::new(0.1, 1.9)).length() < 1e-6);
        assert!((origins.top_right - Vec2::new(0.9, 1.9)).length() < 1e-6);
    }

    #[test]
    fn test_leading_corners() {
        let origins = BoxOrigins::from_bounds(unit_box(), 0.1);
        assert_eq!(origins.leading_bottom(-1.0), origins.bottom_left);
        assert_eq!(origins.leading_bottom(1.0), origins.bottom_right);
        assert_eq!(origins.trailing_bottom(-1.0), origins.bottom_right);
        assert_eq!(origins.leading_row(1.0), origins.top_left);
        assert_eq!(origins.leading_row(-1.0), origins.bottom_left);
    }

    #[test]
    fn test_spacing_spans_inset_box() {
        let counts = RayCounts {
            horizontal: 5,
            vertical: 3,
        };
        let spacing = RaySpacing::from_bounds(unit_box(), 0.1, counts);
        // inset box is 0.8 x 1.8
        assert!((spacing.horizontal - 1.8 / 4.0).abs() < 1e-6);
        assert!((spacing.vertical - 0.8 / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_spacing_clamps_low_counts() {
        let counts = RayCounts {
            horizontal: 0,
            vertical: 1,
        };
        let spacing = RaySpacing::from_bounds(unit_box(), 0.1, counts);
        assert!((spacing.horizontal - 1.8).abs() < 1e-6);
        assert!((spacing.vertical - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_last_ray_lands_on_far_corner() {
        let counts = RayCounts::default();
        let bounds = Aabb::new(Vec2::new(3.0, 4.0), Vec2::new(5.0, 7.0));
        let origins = BoxOrigins::from_bounds(bounds, 0.05);
        let spacing = RaySpacing::from_bounds(bounds, 0.05, counts);
        let last = origins.bottom_left + Vec2::X * spacing.vertical * (counts.vertical - 1) as f32;
        assert!((last - origins.bottom_right).length() < 1e-5);
    }
}
