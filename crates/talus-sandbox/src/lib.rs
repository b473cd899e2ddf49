//! Talus Sandbox - headless host for the Talus character controller.
//!
//! Loads a TOML configuration and a RON level, then plays a scripted input
//! timeline through a [`talus_physics::CharacterMotor`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod level;
pub mod script;

use talus_common::TalusResult;
use talus_physics::{Character, CharacterMotor};
use tracing::info;

use crate::config::SandboxConfig;
use crate::level::Level;
use crate::script::{PhaseSummary, Script};

/// Builds the level and actors described by `config` and plays the tour.
pub fn run(config: &SandboxConfig) -> TalusResult<Vec<PhaseSummary>> {
    config.validate()?;

    let level = match &config.level {
        Some(path) => Level::load_from(path)?,
        None => Level::builtin(),
    };
    let geometry = level.build()?;
    info!("Level '{}': {} colliders", level.name, geometry.len());

    let mut character = Character::new(config.controller.clone(), config.spawn)?;
    let mut motor = CharacterMotor::new(config.motor.clone())?;

    let script = Script::tour(config.frames);
    Ok(script.run(&mut character, &mut motor, &geometry, config.timestep))
}
