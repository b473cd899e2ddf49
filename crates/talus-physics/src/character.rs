//! Character body driven by the collision resolver.
//!
//! A [`Character`] owns everything the resolver needs between frames: the
//! position, the active hitbox profile, the cached ray spacing for that
//! profile and the collision state of the last move.

use glam::Vec2;
use talus_common::TalusResult;
use tracing::{debug, warn};

use crate::aabb::Aabb;
use crate::config::ControllerConfig;
use crate::geometry::StaticGeometry;
use crate::hitbox::{HitboxProfile, Stance};
use crate::origins::RaySpacing;
use crate::query::GeometryQuery;
use crate::resolver::CollisionResolver;
use crate::state::CollisionState;

/// Who owns the character's position for a move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Drive {
    /// The resolver applies the corrected displacement
    #[default]
    Free,
    /// A joint anchored at `anchor` moves the character; the resolver only
    /// reports contacts
    External {
        /// Joint anchor point
        anchor: Vec2,
    },
}

/// Per-move flags.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOptions {
    /// Riding a moving platform: always report ground contact
    pub standing_on_platform: bool,
    /// Position ownership for this move
    pub drive: Drive,
}

/// Kinematic character with a switchable hitbox.
#[derive(Debug, Clone)]
pub struct Character {
    position: Vec2,
    stance: Stance,
    resolver: CollisionResolver,
    spacing: RaySpacing,
    /// Stance the cached spacing was computed for
    spacing_stance: Stance,
    collisions: CollisionState,
    anchor: Option<Vec2>,
}

impl Character {
    /// Creates a standing character at `position`.
    pub fn new(config: ControllerConfig, position: Vec2) -> TalusResult<Self> {
        let resolver = CollisionResolver::new(config)?;
        let stance = Stance::Standing;
        let spacing = resolver.spacing_for(resolver.config().profiles.get(stance).bounds_at(position));
        Ok(Self {
            position,
            stance,
            resolver,
            spacing,
            spacing_stance: stance,
            collisions: CollisionState::default(),
            anchor: None,
        })
    }

    /// Returns the character position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleports the character. Contacts are kept until the next move.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Returns the active stance.
    #[must_use]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Returns the controller configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        self.resolver.config()
    }

    /// Returns the active hitbox profile.
    #[must_use]
    pub fn profile(&self) -> &HitboxProfile {
        self.config().profiles.get(self.stance)
    }

    /// Returns the world-space box of the active profile.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.profile().bounds_at(self.position)
    }

    /// Returns the cached ray spacing.
    #[must_use]
    pub fn ray_spacing(&self) -> RaySpacing {
        self.spacing
    }

    /// Returns the contacts of the last move.
    #[must_use]
    pub fn collisions(&self) -> &CollisionState {
        &self.collisions
    }

    /// Joint anchor of the last move, if it was externally driven.
    #[must_use]
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Resolves `velocity` against `query` and returns the corrected
    /// displacement.
    ///
    /// The position is advanced by the result unless `options.drive` hands
    /// the position to an external joint.
    pub fn move_by<Q: GeometryQuery + ?Sized>(
        &mut self,
        query: &Q,
        velocity: Vec2,
        options: MoveOptions,
    ) -> Vec2 {
        if self.spacing_stance != self.stance {
            warn!(
                "resolving with ray spacing for {:?} while {:?}; call recompute_ray_spacing after set_profile",
                self.spacing_stance, self.stance
            );
        }

        let resolution = self.resolver.resolve(
            query,
            self.bounds(),
            self.spacing,
            velocity,
            &self.collisions,
            options.standing_on_platform,
        );
        self.collisions = resolution.collisions;

        match options.drive {
            Drive::Free => {
                self.anchor = None;
                self.position += resolution.velocity;
            },
            Drive::External { anchor } => {
                self.anchor = Some(anchor);
            },
        }

        resolution.velocity
    }

    /// Switches between the standing and crouching hitbox.
    ///
    /// Ray spacing is left untouched; call
    /// [`recompute_ray_spacing`](Self::recompute_ray_spacing) before the next
    /// move.
    pub fn set_profile(&mut self, crouching: bool) {
        let stance = Stance::from_crouching(crouching);
        if stance != self.stance {
            debug!("hitbox profile {:?} -> {:?}", self.stance, stance);
        }
        self.stance = stance;
    }

    /// Rebuilds the ray spacing for the active profile.
    pub fn recompute_ray_spacing(&mut self) {
        self.spacing = self.resolver.spacing_for(self.bounds());
        self.spacing_stance = self.stance;
        debug!(
            "ray spacing h={:.4} v={:.4} for {:?}",
            self.spacing.horizontal, self.spacing.vertical, self.stance
        );
    }

    /// Returns true if a ceiling would block standing up from the current box.
    ///
    /// Profiles whose heights differ by no more than twice the skin width
    /// never report a ceiling.
    ///
    /// Casts the vertical sweep upward by the height the standing profile
    /// adds, from the current box, without touching the profile, the position
    /// or the published collision state. `velocity` supplies the horizontal
    /// offset of the probe rays; its vertical part is replaced.
    #[must_use]
    pub fn probe_headroom<Q: GeometryQuery + ?Sized>(&self, query: &Q, velocity: Vec2) -> bool {
        let config = self.config();
        let rise = config.profiles.height_difference() - config.skin_width * 2.0;
        if rise <= 0.0 {
            return false;
        }
        let probe = Vec2::new(velocity.x, rise);
        self.resolver
            .probe_vertical(query, self.bounds(), self.spacing, probe, &self.collisions)
    }

    /// Same as [`move_by`](Self::move_by) against static geometry with
    /// default options.
    pub fn move_in(&mut self, geometry: &StaticGeometry, velocity: Vec2) -> Vec2 {
        self.move_by(geometry, velocity, MoveOptions::default())
    }
}
