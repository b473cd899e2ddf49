//! Scripted input timelines.

use glam::Vec2;
use talus_physics::{Character, CharacterMotor, GeometryQuery, MotorInput};
use tracing::{debug, info};

/// Held input for a run of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// Label used in the run log
    pub name: String,
    /// Stick axes held for the whole phase
    pub axis: Vec2,
    /// Press jump on the first frame and release it halfway through
    pub jump: bool,
    /// Frames to run
    pub frames: u32,
}

impl Phase {
    /// Creates a phase without jumping.
    pub fn new(name: impl Into<String>, axis: Vec2, frames: u32) -> Self {
        Self {
            name: name.into(),
            axis,
            jump: false,
            frames,
        }
    }

    /// Same phase with a jump at its start.
    #[must_use]
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    fn input(&self, frame: u32) -> MotorInput {
        MotorInput {
            axis: self.axis,
            jump_pressed: self.jump && frame == 0,
            jump_released: self.jump && frame == self.frames / 2,
            ..MotorInput::default()
        }
    }
}

/// What happened during one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSummary {
    /// Phase label
    pub name: String,
    /// Position before the first frame
    pub start: Vec2,
    /// Position after the last frame
    pub end: Vec2,
    /// Highest position reached
    pub peak: f32,
    /// Frames spent crouched
    pub crouched_frames: u32,
    /// Frames where standing was requested but a ceiling kept the crouch
    pub vetoed_frames: u32,
    /// Frames spent following a slope
    pub slope_frames: u32,
    /// Any frame touched a wall
    pub hit_wall: bool,
    /// Any frame touched a ceiling
    pub hit_ceiling: bool,
    /// Crouched after the last frame
    pub crouching: bool,
    /// Grounded after the last frame
    pub grounded: bool,
}

/// Ordered list of phases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// Phases in play order
    pub phases: Vec<Phase>,
}

impl Script {
    /// Walk up the ramp, crouch into the tunnel, try to stand inside it,
    /// jump into the roof, then walk out and into the wall.
    #[must_use]
    pub fn tour(frames: u32) -> Self {
        Self {
            phases: vec![
                Phase::new("walk", Vec2::new(1.0, 0.0), frames),
                Phase::new("crouch", Vec2::new(1.0, -1.0), frames),
                Phase::new("stand", Vec2::new(0.5, 0.0), frames),
                Phase::new("jump", Vec2::new(1.0, 0.0), frames).with_jump(),
                Phase::new("wall", Vec2::new(1.0, 0.0), frames * 2),
            ],
        }
    }

    /// Plays every phase and returns one summary per phase.
    pub fn run<Q: GeometryQuery + ?Sized>(
        &self,
        character: &mut Character,
        motor: &mut CharacterMotor,
        query: &Q,
        dt: f32,
    ) -> Vec<PhaseSummary> {
        self.phases
            .iter()
            .map(|phase| {
                let summary = run_phase(phase, character, motor, query, dt);
                info!(
                    "{:>6}: ({:.2}, {:.2}) -> ({:.2}, {:.2}) peak {:.2} crouched {} vetoed {} slope {} wall {} ceiling {}",
                    summary.name,
                    summary.start.x,
                    summary.start.y,
                    summary.end.x,
                    summary.end.y,
                    summary.peak,
                    summary.crouched_frames,
                    summary.vetoed_frames,
                    summary.slope_frames,
                    summary.hit_wall,
                    summary.hit_ceiling,
                );
                summary
            })
            .collect()
    }
}

fn run_phase<Q: GeometryQuery + ?Sized>(
    phase: &Phase,
    character: &mut Character,
    motor: &mut CharacterMotor,
    query: &Q,
    dt: f32,
) -> PhaseSummary {
    let start = character.position();
    let mut summary = PhaseSummary {
        name: phase.name.clone(),
        start,
        end: start,
        peak: start.y,
        crouched_frames: 0,
        vetoed_frames: 0,
        slope_frames: 0,
        hit_wall: false,
        hit_ceiling: false,
        crouching: motor.is_crouching(),
        grounded: character.collisions().is_grounded(),
    };

    for frame in 0..phase.frames {
        let input = phase.input(frame);
        let report = motor.step(character, query, &input, dt);

        let wants_crouch = input.axis.y < -0.5;
        if report.crouching {
            summary.crouched_frames += 1;
            if !wants_crouch {
                summary.vetoed_frames += 1;
            }
        }
        if report.collisions.on_slope() {
            summary.slope_frames += 1;
        }
        summary.hit_wall |= report.collisions.touching_wall();
        summary.hit_ceiling |= report.collisions.above;
        summary.peak = summary.peak.max(character.position().y);

        if frame % 30 == 0 {
            debug!(
                "{} frame {}: pos ({:.3}, {:.3}) vel ({:.3}, {:.3})",
                phase.name,
                frame,
                character.position().x,
                character.position().y,
                report.velocity.x,
                report.velocity.y
            );
        }
    }

    summary.end = character.position();
    summary.crouching = motor.is_crouching();
    summary.grounded = character.collisions().is_grounded();
    summary
}
