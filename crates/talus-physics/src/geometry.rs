//! Static level geometry with raycasts.
//!
//! A flat list of colliders (boxes, convex polygons, segments) tagged with
//! collision layers. Every cast tests every collider, which is plenty for
//! hand-built levels and tests; hosts with a broadphase should implement
//! [`GeometryQuery`] over their own world instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use talus_common::{LayerMask, LevelError};

use crate::aabb::Aabb;
use crate::query::{GeometryQuery, RayHit};

/// Cross products below this treat a ray and an edge as parallel.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Collider shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box
    Box(Aabb),
    /// Convex polygon, any winding
    Polygon(Vec<Vec2>),
    /// Two-sided line segment
    Segment {
        /// First endpoint
        start: Vec2,
        /// Second endpoint
        end: Vec2,
    },
}

/// A shape and the layers it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Collider shape
    pub shape: Shape,
    /// Layers this collider belongs to
    pub layers: LayerMask,
}

impl Collider {
    /// Casts a ray against this collider alone.
    #[must_use]
    pub fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        match &self.shape {
            Shape::Box(aabb) => cast_convex(&aabb.corners(), origin, direction, max_distance),
            Shape::Polygon(points) => cast_convex(points, origin, direction, max_distance),
            Shape::Segment { start, end } => {
                ray_edge(origin, direction, *start, *end).and_then(|(t, normal)| {
                    (t <= max_distance).then(|| RayHit {
                        distance: t,
                        point: origin + direction * t,
                        normal,
                    })
                })
            },
        }
    }
}

/// Collection of static colliders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticGeometry {
    colliders: Vec<Collider>,
}

impl StaticGeometry {
    /// Creates empty geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Returns true if there are no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Adds a validated collider and returns its index.
    pub fn add(&mut self, collider: Collider) -> Result<usize, LevelError> {
        let index = self.colliders.len();
        match &collider.shape {
            Shape::Box(aabb) => {
                if aabb.width() <= 0.0 || aabb.height() <= 0.0 {
                    return Err(LevelError::Degenerate { index });
                }
            },
            Shape::Polygon(points) => {
                if points.len() < 3 {
                    return Err(LevelError::TooFewVertices {
                        index,
                        count: points.len(),
                    });
                }
            },
            Shape::Segment { start, end } => {
                if start.distance_squared(*end) <= f32::EPSILON {
                    return Err(LevelError::Degenerate { index });
                }
            },
        }
        self.colliders.push(collider);
        Ok(index)
    }

    /// Adds an axis-aligned solid box.
    pub fn add_box(&mut self, min: Vec2, max: Vec2, layers: LayerMask) -> Result<usize, LevelError> {
        self.add(Collider {
            shape: Shape::Box(Aabb::new(min, max)),
            layers,
        })
    }

    /// Adds a right-triangle ramp.
    ///
    /// The ramp starts at `foot` and rises over a horizontal `run` at `angle`
    /// degrees. A negative `run` builds a ramp rising to the left.
    pub fn add_ramp(
        &mut self,
        foot: Vec2,
        run: f32,
        angle: f32,
        layers: LayerMask,
    ) -> Result<usize, LevelError> {
        let rise = run.abs() * angle.to_radians().tan();
        let top_x = foot.x + run;
        self.add(Collider {
            shape: Shape::Polygon(vec![
                foot,
                Vec2::new(top_x, foot.y),
                Vec2::new(top_x, foot.y + rise),
            ]),
            layers,
        })
    }

    /// Adds a two-sided segment.
    pub fn add_segment(
        &mut self,
        start: Vec2,
        end: Vec2,
        layers: LayerMask,
    ) -> Result<usize, LevelError> {
        self.add(Collider {
            shape: Shape::Segment { start, end },
            layers,
        })
    }
}

impl GeometryQuery for StaticGeometry {
    fn cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        self.colliders
            .iter()
            .filter(|collider| collider.layers.intersects(mask))
            .filter_map(|collider| collider.cast(origin, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Intersects a ray with one edge. Returns the ray parameter and the edge
/// normal facing the ray.
fn ray_edge(origin: Vec2, direction: Vec2, a: Vec2, b: Vec2) -> Option<(f32, Vec2)> {
    let edge = b - a;
    let denom = direction.perp_dot(edge);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let to_a = a - origin;
    let t = to_a.perp_dot(edge) / denom;
    let s = to_a.perp_dot(direction) / denom;
    if t < 0.0 || !(0.0..=1.0).contains(&s) {
        return None;
    }

    let mut normal = edge.perp().normalize_or_zero();
    if normal.dot(direction) > 0.0 {
        normal = -normal;
    }
    Some((t, normal))
}

/// Strict point-in-convex-polygon test, any winding.
fn inside_convex(points: &[Vec2], point: Vec2) -> bool {
    let mut winding: Option<bool> = None;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = (b - a).perp_dot(point - a);
        if cross.abs() <= f32::EPSILON {
            return false;
        }
        let positive = cross > 0.0;
        match winding {
            None => winding = Some(positive),
            Some(expected) if expected != positive => return false,
            Some(_) => {},
        }
    }
    true
}

fn cast_convex(points: &[Vec2], origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
    if inside_convex(points, origin) {
        return Some(RayHit {
            distance: 0.0,
            point: origin,
            normal: -direction,
        });
    }

    let mut best: Option<(f32, Vec2)> = None;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        if let Some((t, normal)) = ray_edge(origin, direction, a, b) {
            if t <= max_distance && best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, normal));
            }
        }
    }

    best.map(|(t, normal)| RayHit {
        distance: t,
        point: origin + direction * t,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::slope_angle;

    fn floor() -> StaticGeometry {
        let mut geometry = StaticGeometry::new();
        geometry
            .add_box(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0), LayerMask::SOLID)
            .expect("valid box");
        geometry
    }

    #[test]
    fn test_ray_hits_floor_from_above() {
        let geometry = floor();
        let hit = geometry
            .cast(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 10.0, LayerMask::ALL)
            .expect("should hit floor");
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec2::Y).length() < 1e-5);
        assert!((hit.point - Vec2::ZERO).length() < 1e-5);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let geometry = floor();
        assert!(geometry
            .cast(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 1.5, LayerMask::ALL)
            .is_none());
        assert!(geometry
            .cast(Vec2::new(0.0, 2.0), Vec2::NEG_Y, f32::INFINITY, LayerMask::ALL)
            .is_some());
    }

    #[test]
    fn test_ray_respects_layers() {
        let geometry = floor();
        assert!(geometry
            .cast(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 10.0, LayerMask::TRIGGER)
            .is_none());
    }

    #[test]
    fn test_ray_inside_box_reports_zero_distance() {
        let geometry = floor();
        let hit = geometry
            .cast(Vec2::new(0.0, -0.5), Vec2::X, 10.0, LayerMask::ALL)
            .expect("inside hit");
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let geometry = floor();
        assert!(geometry
            .cast(Vec2::new(0.0, 2.0), Vec2::Y, 10.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn test_wall_normal_faces_ray() {
        let mut geometry = StaticGeometry::new();
        geometry
            .add_box(Vec2::new(5.0, 0.0), Vec2::new(6.0, 10.0), LayerMask::SOLID)
            .expect("valid box");
        let hit = geometry
            .cast(Vec2::new(0.0, 1.0), Vec2::X, 10.0, LayerMask::ALL)
            .expect("wall hit");
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!((hit.normal - Vec2::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_ramp_surface_angle() {
        let mut geometry = StaticGeometry::new();
        geometry
            .add_ramp(Vec2::new(2.0, 0.0), 10.0, 30.0, LayerMask::SOLID)
            .expect("valid ramp");
        let hit = geometry
            .cast(Vec2::new(0.0, 0.5), Vec2::X, 10.0, LayerMask::ALL)
            .expect("ramp hit");
        assert!((slope_angle(hit.normal) - 30.0).abs() < 1e-3);
        assert!(hit.normal.x < 0.0);
    }

    #[test]
    fn test_left_rising_ramp_normal_points_right() {
        let mut geometry = StaticGeometry::new();
        geometry
            .add_ramp(Vec2::new(0.0, 0.0), -10.0, 45.0, LayerMask::SOLID)
            .expect("valid ramp");
        let hit = geometry
            .cast(Vec2::new(-2.0, 20.0), Vec2::NEG_Y, f32::INFINITY, LayerMask::ALL)
            .expect("ramp hit");
        assert!(hit.normal.x > 0.0);
        assert!((slope_angle(hit.normal) - 45.0).abs() < 1e-3);
        assert!((hit.point.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_collider_wins() {
        let mut geometry = floor();
        geometry
            .add_segment(Vec2::new(-1.0, 1.0), Vec2::new(1.0, 1.0), LayerMask::PLATFORM)
            .expect("valid segment");
        let hit = geometry
            .cast(Vec2::new(0.0, 3.0), Vec2::NEG_Y, 10.0, LayerMask::ALL)
            .expect("hit");
        assert!((hit.distance - 2.0).abs() < 1e-5);

        let solid_only = geometry
            .cast(Vec2::new(0.0, 3.0), Vec2::NEG_Y, 10.0, LayerMask::SOLID)
            .expect("hit");
        assert!((solid_only.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_degenerate_colliders() {
        let mut geometry = StaticGeometry::new();
        assert_eq!(
            geometry.add_segment(Vec2::ONE, Vec2::ONE, LayerMask::SOLID),
            Err(LevelError::Degenerate { index: 0 })
        );
        assert_eq!(
            geometry.add(Collider {
                shape: Shape::Polygon(vec![Vec2::ZERO, Vec2::ONE]),
                layers: LayerMask::SOLID,
            }),
            Err(LevelError::TooFewVertices { index: 0, count: 2 })
        );
        assert!(geometry.is_empty());
    }
}
