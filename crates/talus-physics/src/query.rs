//! Geometry query interface consumed by the resolver.
//!
//! The resolver never looks at level geometry directly. It asks a
//! [`GeometryQuery`] for the nearest surface along a ray, many times per move.
//! Hosts with their own physics world implement the trait over it; everyone
//! else can use [`crate::geometry::StaticGeometry`].

use glam::Vec2;
use talus_common::LayerMask;

/// Nearest surface found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec2,
    /// Unit surface normal, facing back toward the ray origin
    pub normal: Vec2,
}

/// Raycast service over level geometry.
pub trait GeometryQuery {
    /// Casts a ray and returns the nearest hit on any collider in `mask`.
    ///
    /// `direction` must be a unit vector. `max_distance` may be
    /// `f32::INFINITY`. A ray starting inside a collider reports a hit at
    /// distance zero.
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask)
        -> Option<RayHit>;
}

impl<T: GeometryQuery + ?Sized> GeometryQuery for &T {
    fn cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance, mask)
    }
}

/// Angle in degrees between a surface normal and world up.
///
/// 0 is flat ground, 90 is a vertical wall.
#[must_use]
pub fn slope_angle(normal: Vec2) -> f32 {
    let n = normal.normalize_or_zero();
    n.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Direction of travel along one axis. Zero counts as positive.
#[inline]
#[must_use]
pub fn travel_sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_angle_flat_and_wall() {
        assert!(slope_angle(Vec2::Y).abs() < 1e-4);
        assert!((slope_angle(Vec2::X) - 90.0).abs() < 1e-4);
        assert!((slope_angle(Vec2::NEG_X) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_slope_angle_thirty_degrees() {
        let theta = 30.0_f32.to_radians();
        let normal = Vec2::new(-theta.sin(), theta.cos());
        assert!((slope_angle(normal) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_travel_sign_zero_is_positive() {
        assert_eq!(travel_sign(0.0), 1.0);
        assert_eq!(travel_sign(-0.0), 1.0);
        assert_eq!(travel_sign(3.0), 1.0);
        assert_eq!(travel_sign(-0.1), -1.0);
    }
}
