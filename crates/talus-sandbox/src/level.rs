//! Level loading.
//!
//! Levels are RON files listing pieces by kind:
//!
//! ```ron
//! (
//!     name: "tunnel",
//!     pieces: [
//!         Block(min: (-20.0, -1.0), max: (20.0, 0.0)),
//!         Ramp(foot: (2.0, 0.0), run: 4.0, angle: 30.0),
//!         Ledge(start: (6.0, 3.0), end: (9.0, 3.0), layers: 2),
//!     ],
//! )
//! ```
//!
//! `layers` defaults to the solid layer.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use talus_common::{LayerMask, TalusError, TalusResult};
use talus_physics::StaticGeometry;
use tracing::{debug, info};

fn solid() -> LayerMask {
    LayerMask::SOLID
}

/// One piece of level geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Piece {
    /// Axis-aligned box
    Block {
        /// Lower-left corner
        min: Vec2,
        /// Upper-right corner
        max: Vec2,
        /// Collision layers
        #[serde(default = "solid")]
        layers: LayerMask,
    },
    /// Right-triangle slope
    Ramp {
        /// Bottom corner on the low side
        foot: Vec2,
        /// Horizontal extent; negative rises to the left
        run: f32,
        /// Incline in degrees
        angle: f32,
        /// Collision layers
        #[serde(default = "solid")]
        layers: LayerMask,
    },
    /// Thin segment
    Ledge {
        /// First endpoint
        start: Vec2,
        /// Second endpoint
        end: Vec2,
        /// Collision layers
        #[serde(default = "solid")]
        layers: LayerMask,
    },
}

/// A named list of pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Display name
    pub name: String,
    /// Geometry pieces
    pub pieces: Vec<Piece>,
}

impl Level {
    /// Parses a level from RON text.
    pub fn from_ron(text: &str) -> TalusResult<Self> {
        ron::from_str(text).map_err(|e| TalusError::Parse(e.to_string()))
    }

    /// Reads and parses a RON level file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> TalusResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let level = Self::from_ron(&text)?;
        info!("Loaded level '{}' from {}", level.name, path.display());
        Ok(level)
    }

    /// Flat floor, a 30° ramp up to a raised deck, a low tunnel on the deck
    /// and a wall at the far end of the deck.
    #[must_use]
    pub fn builtin() -> Self {
        let solid = LayerMask::SOLID;
        let ramp_angle: f32 = 30.0;
        let ramp_run = 4.0;
        let deck = ramp_run * ramp_angle.to_radians().tan();

        Self {
            name: "builtin".to_string(),
            pieces: vec![
                Piece::Block {
                    min: Vec2::new(-20.0, -1.0),
                    max: Vec2::new(40.0, 0.0),
                    layers: solid,
                },
                Piece::Ramp {
                    foot: Vec2::new(0.0, 0.0),
                    run: ramp_run,
                    angle: ramp_angle,
                    layers: solid,
                },
                Piece::Block {
                    min: Vec2::new(ramp_run, 0.0),
                    max: Vec2::new(26.0, deck),
                    layers: solid,
                },
                // Tunnel roof: 1.5 units of clearance, enough for a crouch only.
                Piece::Block {
                    min: Vec2::new(8.0, deck + 1.5),
                    max: Vec2::new(18.0, deck + 4.0),
                    layers: solid,
                },
                Piece::Block {
                    min: Vec2::new(26.0, 0.0),
                    max: Vec2::new(27.0, 10.0),
                    layers: solid,
                },
            ],
        }
    }

    /// Builds queryable geometry from the pieces.
    pub fn build(&self) -> TalusResult<StaticGeometry> {
        let mut geometry = StaticGeometry::new();
        for piece in &self.pieces {
            match *piece {
                Piece::Block { min, max, layers } => {
                    geometry.add_box(min.min(max), min.max(max), layers)?;
                },
                Piece::Ramp {
                    foot,
                    run,
                    angle,
                    layers,
                } => {
                    geometry.add_ramp(foot, run, angle, layers)?;
                },
                Piece::Ledge { start, end, layers } => {
                    geometry.add_segment(start, end, layers)?;
                },
            }
        }
        debug!("Built level '{}' with {} colliders", self.name, geometry.len());
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use talus_common::LevelError;

    use super::*;

    #[test]
    fn test_parse_ron_level() {
        let level = Level::from_ron(
            r#"(
                name: "steps",
                pieces: [
                    Block(min: (-5.0, -1.0), max: (5.0, 0.0)),
                    Ramp(foot: (1.0, 0.0), run: -2.0, angle: 45.0, layers: 1),
                    Ledge(start: (0.0, 2.0), end: (3.0, 2.0), layers: 2),
                ],
            )"#,
        )
        .expect("parse");

        assert_eq!(level.name, "steps");
        assert_eq!(level.pieces.len(), 3);
        assert!(matches!(
            level.pieces[0],
            Piece::Block {
                layers: LayerMask::SOLID,
                ..
            }
        ));
        assert!(matches!(
            level.pieces[2],
            Piece::Ledge {
                layers: LayerMask::PLATFORM,
                ..
            }
        ));

        let geometry = level.build().expect("build");
        assert_eq!(geometry.len(), 3);
    }

    #[test]
    fn test_bad_ron_is_parse_error() {
        let err = Level::from_ron("(name: 3)").expect_err("invalid");
        assert!(matches!(err, TalusError::Parse(_)));
    }

    #[test]
    fn test_degenerate_piece_is_level_error() {
        let level = Level {
            name: "broken".to_string(),
            pieces: vec![Piece::Ledge {
                start: Vec2::ONE,
                end: Vec2::ONE,
                layers: LayerMask::SOLID,
            }],
        };
        let err = level.build().expect_err("zero-length ledge");
        assert!(matches!(
            err,
            TalusError::Level(LevelError::Degenerate { index: 0 })
        ));
    }

    #[test]
    fn test_builtin_builds() {
        let geometry = Level::builtin().build().expect("builtin level");
        assert_eq!(geometry.len(), 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("flat.ron");
        fs::write(
            &path,
            r#"(name: "flat", pieces: [Block(min: (0.0, 0.0), max: (1.0, 1.0))])"#,
        )
        .expect("write");

        let level = Level::load_from(&path).expect("load");
        assert_eq!(level.name, "flat");
    }
}
