//! Raycast collision resolver.
//!
//! Takes the displacement a character wants to make this frame and returns
//! the part of it that does not penetrate geometry. The work happens in a
//! fixed order: slope descent, horizontal sweep, vertical sweep. Each stage
//! rewrites the displacement the next one sees.
//!
//! ## Sweeps
//!
//! Each sweep casts a row of parallel rays from the skin-inset box edge that
//! leads the motion. A hit clamps the displacement on that axis so the box
//! stops one skin width short of the surface, and shortens the remaining rays
//! so a farther hit can never loosen the clamp.
//!
//! ## Slopes
//!
//! The lowest horizontal ray doubles as a slope sensor. A surface no steeper
//! than `max_climb_angle` turns horizontal motion into motion along the
//! surface. While descending, a single downward ray from the trailing corner
//! snaps motion onto a slope that falls away no steeper than
//! `max_descend_angle`.

use glam::Vec2;
use talus_common::ConfigError;
use tracing::{debug, trace};

use crate::aabb::Aabb;
use crate::config::ControllerConfig;
use crate::origins::{BoxOrigins, RaySpacing};
use crate::query::{slope_angle, travel_sign, GeometryQuery, RayHit};
use crate::state::CollisionState;

/// Angles closer than this (degrees) count as the same slope.
const ANGLE_EPSILON: f32 = 1e-3;

fn angles_differ(a: f32, b: f32) -> bool {
    (a - b).abs() > ANGLE_EPSILON
}

/// Corrected displacement and the contacts that shaped it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Displacement that keeps the box out of geometry
    pub velocity: Vec2,
    /// Contacts found while resolving
    pub collisions: CollisionState,
}

/// Stateless resolver for one controller configuration.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    config: ControllerConfig,
}

impl CollisionResolver {
    /// Creates a resolver, rejecting invalid configurations.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Spacing for a box of the given bounds under this configuration.
    #[must_use]
    pub fn spacing_for(&self, bounds: Aabb) -> RaySpacing {
        RaySpacing::from_bounds(bounds, self.config.skin_width, self.config.rays)
    }

    /// Resolves `requested` for a box at `bounds`.
    ///
    /// `previous` is the state returned by the last resolve for the same
    /// character; only its slope angle is read. `spacing` must match the
    /// current box size.
    pub fn resolve<Q: GeometryQuery + ?Sized>(
        &self,
        query: &Q,
        bounds: Aabb,
        spacing: RaySpacing,
        requested: Vec2,
        previous: &CollisionState,
        standing_on_platform: bool,
    ) -> Resolution {
        let mut sweep = Sweep {
            query,
            config: &self.config,
            origins: BoxOrigins::from_bounds(bounds, self.config.skin_width),
            spacing,
            state: CollisionState::next(previous, requested),
        };
        let mut velocity = requested;

        if velocity.y < 0.0 {
            sweep.descend_slope(&mut velocity);
        }
        if velocity.x != 0.0 {
            sweep.horizontal(&mut velocity);
        }
        if velocity.y != 0.0 {
            sweep.vertical(&mut velocity);
        }

        if standing_on_platform {
            sweep.state.below = true;
        }

        Resolution {
            velocity,
            collisions: sweep.state,
        }
    }

    /// Runs only the vertical sweep and reports whether any ray hit.
    ///
    /// Nothing is written back: the state is a scratch copy of `current`.
    pub fn probe_vertical<Q: GeometryQuery + ?Sized>(
        &self,
        query: &Q,
        bounds: Aabb,
        spacing: RaySpacing,
        velocity: Vec2,
        current: &CollisionState,
    ) -> bool {
        let mut sweep = Sweep {
            query,
            config: &self.config,
            origins: BoxOrigins::from_bounds(bounds, self.config.skin_width),
            spacing,
            state: *current,
        };
        let mut scratch = velocity;
        sweep.vertical(&mut scratch)
    }
}

/// Working data for one resolve.
struct Sweep<'a, Q: ?Sized> {
    query: &'a Q,
    config: &'a ControllerConfig,
    origins: BoxOrigins,
    spacing: RaySpacing,
    state: CollisionState,
}

impl<Q: GeometryQuery + ?Sized> Sweep<'_, Q> {
    fn cast(&self, origin: Vec2, direction: Vec2, length: f32) -> Option<RayHit> {
        let hit = self
            .query
            .cast(origin, direction, length, self.config.collision_mask);
        if let Some(hit) = &hit {
            trace!(
                "ray {:?} -> {:?} hit at {:.4} normal {:?}",
                origin,
                direction,
                hit.distance,
                hit.normal
            );
        }
        hit
    }

    fn horizontal(&mut self, velocity: &mut Vec2) {
        let skin = self.config.skin_width;
        let direction = travel_sign(velocity.x);
        let mut ray_length = velocity.x.abs() + skin;

        for i in 0..self.config.rays.horizontal {
            let origin = self.origins.leading_bottom(direction)
                + Vec2::Y * (self.spacing.horizontal * i as f32);
            let Some(hit) = self.cast(origin, Vec2::X * direction, ray_length) else {
                continue;
            };

            // Already overlapping: leave it to the other rays.
            if hit.distance <= 0.0 {
                continue;
            }

            let angle = slope_angle(hit.normal);
            if i == 0 && angle <= self.config.max_climb_angle {
                if self.state.descending_slope {
                    self.state.descending_slope = false;
                    *velocity = self.state.previous_velocity;
                }

                // Walk up to the foot of a new slope before bending onto it.
                let mut distance_to_slope_start = 0.0;
                if angles_differ(angle, self.state.slope_angle_old) {
                    debug!(
                        "slope change {:.2} -> {:.2} at {:.4}",
                        self.state.slope_angle_old, angle, hit.distance
                    );
                    distance_to_slope_start = hit.distance - skin;
                    velocity.x -= distance_to_slope_start * direction;
                }
                self.climb_slope(velocity, angle);
                velocity.x += distance_to_slope_start * direction;
            }

            if !self.state.climbing_slope || angle > self.config.max_climb_angle {
                velocity.x = (hit.distance - skin) * direction;
                ray_length = hit.distance;

                // Wall while on a slope: stay on the slope surface.
                if self.state.climbing_slope {
                    velocity.y = self.state.slope_angle.to_radians().tan() * velocity.x.abs();
                }

                self.state.left = direction < 0.0;
                self.state.right = direction > 0.0;
            }
        }
    }

    fn vertical(&mut self, velocity: &mut Vec2) -> bool {
        let skin = self.config.skin_width;
        let direction = travel_sign(velocity.y);
        let mut ray_length = velocity.y.abs() + skin;
        let mut collided = false;

        for i in 0..self.config.rays.vertical {
            let origin = self.origins.leading_row(direction)
                + Vec2::X * (self.spacing.vertical * i as f32 + velocity.x);
            let Some(hit) = self.cast(origin, Vec2::Y * direction, ray_length) else {
                continue;
            };

            collided = true;
            velocity.y = (hit.distance - skin) * direction;
            ray_length = hit.distance;

            if self.state.climbing_slope {
                let tan = self.state.slope_angle.to_radians().tan();
                if tan > f32::EPSILON {
                    velocity.x = velocity.y / tan * travel_sign(velocity.x);
                }
            }

            self.state.below = direction < 0.0;
            self.state.above = direction > 0.0;
        }

        if self.state.climbing_slope {
            // Re-check the grade underfoot at the new height.
            let direction = travel_sign(velocity.x);
            let ray_length = velocity.x.abs() + skin;
            let origin = self.origins.leading_bottom(direction) + Vec2::Y * velocity.y;

            if let Some(hit) = self.cast(origin, Vec2::X * direction, ray_length) {
                collided = true;
                let angle = slope_angle(hit.normal);
                if angles_differ(angle, self.state.slope_angle) {
                    velocity.x = (hit.distance - skin) * direction;
                    // A wall ahead only clamps; the slope underfoot is unchanged.
                    if angle <= self.config.max_climb_angle {
                        debug!(
                            "slope grade change {:.2} -> {:.2}",
                            self.state.slope_angle, angle
                        );
                        self.state.slope_angle = angle;
                    }
                }
            }
        }

        collided
    }

    fn climb_slope(&mut self, velocity: &mut Vec2, angle: f32) {
        let move_distance = velocity.x.abs();
        let radians = angle.to_radians();
        let climb_y = radians.sin() * move_distance;

        // An active jump outruns the slope.
        if velocity.y <= climb_y {
            velocity.y = climb_y;
            velocity.x = radians.cos() * move_distance * travel_sign(velocity.x);

            self.state.below = true;
            self.state.climbing_slope = true;
            self.state.slope_angle = angle;
        }
    }

    fn descend_slope(&mut self, velocity: &mut Vec2) {
        let direction = travel_sign(velocity.x);
        let origin = self.origins.trailing_bottom(direction);

        let Some(hit) = self.cast(origin, Vec2::NEG_Y, f32::INFINITY) else {
            return;
        };

        let angle = slope_angle(hit.normal);
        if angle <= ANGLE_EPSILON || angle > self.config.max_descend_angle {
            return;
        }
        // Only slopes falling away in the travel direction.
        if (hit.normal.x < 0.0) != (direction < 0.0) {
            return;
        }

        let radians = angle.to_radians();
        let move_distance = velocity.x.abs();
        if hit.distance - self.config.skin_width <= radians.tan() * move_distance {
            velocity.x = radians.cos() * move_distance * direction;
            velocity.y -= radians.sin() * move_distance;

            self.state.below = true;
            self.state.descending_slope = true;
            self.state.slope_angle = angle;
        }
    }
}
