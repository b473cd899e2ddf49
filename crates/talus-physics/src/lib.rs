//! # Talus Physics
//!
//! Raycast-based kinematic collision resolution for 2D characters.
//!
//! A character is an axis-aligned box that asks to move by some displacement
//! each frame. The resolver fans rays out of the box, trims the displacement
//! so the box stops at walls, floors and ceilings, walks it up and down
//! slopes, and reports what it touched.
//!
//! Layers, bottom up:
//! - [`query`]: the ray query seam and slope math
//! - [`geometry`]: a static level that answers ray queries
//! - [`resolver`]: horizontal and vertical sweeps with slope handling
//! - [`character`]: a box with position, stance and cached spacing
//! - [`motor`]: gravity, jumping, smoothed walking and crouching per frame

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod aabb;
pub mod character;
pub mod config;
pub mod geometry;
pub mod hitbox;
pub mod motor;
pub mod origins;
pub mod query;
pub mod resolver;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aabb::Aabb;
    pub use crate::character::{Character, Drive, MoveOptions};
    pub use crate::config::ControllerConfig;
    pub use crate::geometry::{Collider, Shape, StaticGeometry};
    pub use crate::hitbox::{HitboxProfile, HitboxProfiles, Stance};
    pub use crate::motor::{smooth_damp, CharacterMotor, MotorInput, MotorSettings, StepReport};
    pub use crate::origins::{BoxOrigins, RayCounts, RaySpacing};
    pub use crate::query::{slope_angle, travel_sign, GeometryQuery, RayHit};
    pub use crate::resolver::{CollisionResolver, Resolution};
    pub use crate::state::CollisionState;
}

pub use prelude::*;
