//! Frame-step driver for a [`Character`].
//!
//! The motor turns per-frame intent (stick axes, jump edges) into a velocity
//! and hands `velocity * dt` to the resolver. It owns gravity, variable jump
//! height, smoothed horizontal acceleration and the crouch toggle with its
//! headroom veto. Reading devices is the host's job; the motor only sees a
//! [`MotorInput`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use talus_common::ConfigError;
use tracing::debug;

use crate::character::{Character, Drive, MoveOptions};
use crate::query::GeometryQuery;
use crate::state::CollisionState;

/// Stick deflection below this on the vertical axis requests a crouch.
const CROUCH_AXIS_THRESHOLD: f32 = -0.5;

/// Movement tuning. Times are smoothing times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorSettings {
    /// Apex height of a held jump
    pub max_jump_height: f32,
    /// Apex height of a tapped jump
    pub min_jump_height: f32,
    /// Seconds from takeoff to apex of a held jump
    pub time_to_jump_apex: f32,
    /// Top walking speed
    pub walk_speed: f32,
    /// Top crouched speed
    pub crouch_speed: f32,
    /// Speeding up in the air
    pub accel_airborne: f32,
    /// Speeding up on the ground
    pub accel_grounded: f32,
    /// Speeding up while crouched
    pub crouch_accel: f32,
    /// Slowing down in the air
    pub decel_airborne: f32,
    /// Slowing down on the ground
    pub decel_grounded: f32,
    /// Slowing down while crouched
    pub crouch_decel: f32,
    /// Bleeding walk speed after dropping into a crouch
    pub to_crouch_decel: f32,
    /// Bleeding speed above walk speed in the air
    pub momentum_decel_airborne: f32,
    /// Bleeding speed above walk speed on the ground
    pub momentum_decel_grounded: f32,
}

impl Default for MotorSettings {
    fn default() -> Self {
        Self {
            max_jump_height: 2.0,
            min_jump_height: 1.0,
            time_to_jump_apex: 0.4,
            walk_speed: 6.0,
            crouch_speed: 3.0,
            accel_airborne: 0.2,
            accel_grounded: 0.1,
            crouch_accel: 0.05,
            decel_airborne: 0.1,
            decel_grounded: 0.05,
            crouch_decel: 0.05,
            to_crouch_decel: 0.25,
            momentum_decel_airborne: 0.5,
            momentum_decel_grounded: 0.25,
        }
    }
}

impl MotorSettings {
    /// Checks that every parameter is strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("max_jump_height", self.max_jump_height),
            ("min_jump_height", self.min_jump_height),
            ("time_to_jump_apex", self.time_to_jump_apex),
            ("walk_speed", self.walk_speed),
            ("crouch_speed", self.crouch_speed),
            ("accel_airborne", self.accel_airborne),
            ("accel_grounded", self.accel_grounded),
            ("crouch_accel", self.crouch_accel),
            ("decel_airborne", self.decel_airborne),
            ("decel_grounded", self.decel_grounded),
            ("crouch_decel", self.crouch_decel),
            ("to_crouch_decel", self.to_crouch_decel),
            ("momentum_decel_airborne", self.momentum_decel_airborne),
            ("momentum_decel_grounded", self.momentum_decel_grounded),
        ];
        for (name, value) in fields {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Gravity (negative, units/s²) that reaches `max_jump_height` in
    /// `time_to_jump_apex`.
    #[must_use]
    pub fn gravity(&self) -> f32 {
        -(2.0 * self.max_jump_height) / (self.time_to_jump_apex * self.time_to_jump_apex)
    }

    /// Takeoff speed of a held jump.
    #[must_use]
    pub fn max_jump_velocity(&self) -> f32 {
        self.gravity().abs() * self.time_to_jump_apex
    }

    /// Speed a released jump is cut down to.
    #[must_use]
    pub fn min_jump_velocity(&self) -> f32 {
        (2.0 * self.gravity().abs() * self.min_jump_height).sqrt()
    }
}

/// Intent for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorInput {
    /// Stick axes in [-1, 1]; y < -0.5 requests a crouch
    pub axis: Vec2,
    /// Jump went down this frame
    pub jump_pressed: bool,
    /// Jump went up this frame
    pub jump_released: bool,
    /// Position is owned by a joint this frame
    pub drive: Drive,
    /// Standing on a moving platform
    pub on_platform: bool,
}

/// Outcome of one motor step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Corrected displacement returned by the resolver
    pub displacement: Vec2,
    /// Motor velocity after the step, units/s
    pub velocity: Vec2,
    /// Crouching after the step
    pub crouching: bool,
    /// Contacts of the move
    pub collisions: CollisionState,
}

/// Velocity integrator that drives a [`Character`] once per frame.
#[derive(Debug, Clone)]
pub struct CharacterMotor {
    settings: MotorSettings,
    velocity: Vec2,
    smoothing: f32,
    target_velocity_x: f32,
    crouching: bool,
}

impl CharacterMotor {
    /// Creates a motor at rest.
    pub fn new(settings: MotorSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            velocity: Vec2::ZERO,
            smoothing: 0.0,
            target_velocity_x: 0.0,
            crouching: false,
        })
    }

    /// Returns the motor settings.
    #[must_use]
    pub fn settings(&self) -> &MotorSettings {
        &self.settings
    }

    /// Current velocity, units/s.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Returns true while crouched.
    #[must_use]
    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    /// Advances the character by one frame of `dt` seconds.
    pub fn step<Q: GeometryQuery + ?Sized>(
        &mut self,
        character: &mut Character,
        query: &Q,
        input: &MotorInput,
        dt: f32,
    ) -> StepReport {
        let externally_driven = matches!(input.drive, Drive::External { .. });
        let contacts = *character.collisions();

        if contacts.above || contacts.below || externally_driven {
            self.velocity.y = 0.0;
        }
        if externally_driven {
            self.velocity.x = 0.0;
        }

        self.apply_jump(input, contacts.below);
        self.apply_horizontal(input, contacts.below, dt);
        self.update_crouch(character, query, input, externally_driven, contacts.below, dt);

        self.velocity.y += self.settings.gravity() * dt;

        let options = MoveOptions {
            standing_on_platform: input.on_platform,
            drive: input.drive,
        };
        let displacement = character.move_by(query, self.velocity * dt, options);

        StepReport {
            displacement,
            velocity: self.velocity,
            crouching: self.crouching,
            collisions: *character.collisions(),
        }
    }

    fn apply_jump(&mut self, input: &MotorInput, grounded: bool) {
        if input.jump_pressed && grounded {
            self.velocity.y = self.settings.max_jump_velocity();
        }
        let min_jump = self.settings.min_jump_velocity();
        if input.jump_released && self.velocity.y > min_jump {
            self.velocity.y = min_jump;
        }
    }

    fn apply_horizontal(&mut self, input: &MotorInput, grounded: bool, dt: f32) {
        let s = &self.settings;
        let mut smoothing_time;

        if self.crouching {
            self.target_velocity_x = input.axis.x * s.crouch_speed;
            smoothing_time = if self.target_velocity_x == 0.0 {
                s.crouch_decel
            } else {
                s.crouch_accel
            };
            if self.target_velocity_x.abs() < self.velocity.x.abs() {
                smoothing_time = s.to_crouch_decel;
            }
        } else {
            self.target_velocity_x = input.axis.x * s.walk_speed;
            let (accel, decel) = if grounded {
                (s.accel_grounded, s.decel_grounded)
            } else {
                (s.accel_airborne, s.decel_airborne)
            };
            smoothing_time = if self.target_velocity_x == 0.0 {
                decel
            } else {
                accel
            };
        }

        // Faster than walking with the stick held: bleed momentum slowly.
        let speed = self.velocity.x.abs();
        if input.axis.x != 0.0 && speed > self.target_velocity_x.abs() && speed > s.walk_speed {
            smoothing_time = if grounded {
                s.momentum_decel_grounded
            } else {
                s.momentum_decel_airborne
            };
        }

        self.velocity.x = smooth_damp(
            self.velocity.x,
            self.target_velocity_x,
            &mut self.smoothing,
            smoothing_time,
            dt,
        );
    }

    fn update_crouch<Q: GeometryQuery + ?Sized>(
        &mut self,
        character: &mut Character,
        query: &Q,
        input: &MotorInput,
        externally_driven: bool,
        grounded: bool,
        dt: f32,
    ) {
        let was_crouching = self.crouching;
        self.crouching =
            !externally_driven && input.axis.y < CROUCH_AXIS_THRESHOLD && grounded;

        if was_crouching && !self.crouching {
            self.crouching = character.probe_headroom(query, self.velocity * dt);
            if self.crouching {
                debug!("stand up vetoed by ceiling");
            }
        }

        character.set_profile(self.crouching);
        if was_crouching != self.crouching {
            character.recompute_ray_spacing();
        }
    }
}

/// Critically damped approach of `current` toward `target`.
///
/// `velocity` is the smoothing state carried between calls. The result never
/// overshoots `target`.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    if dt <= 0.0 {
        return current;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}
