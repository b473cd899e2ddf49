//! Error types for Talus.
//!
//! Resolution itself never fails; every degenerate geometry case is settled by
//! policy inside the resolver. Errors only come out of setup: building a
//! controller from a bad configuration, or loading a broken level.

use thiserror::Error;

/// Top-level error type for Talus operations.
#[derive(Debug, Error)]
pub enum TalusError {
    /// Configuration rejected at construction time
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Level geometry rejected while loading
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Text format (TOML/RON) could not be parsed or written
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Controller and motor configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Ray spacing divides by `count - 1`, so every axis needs two rays
    #[error("{axis} ray count must be at least 2, got {count}")]
    RayCountTooLow {
        /// Which axis ("horizontal" or "vertical")
        axis: &'static str,
        /// Configured count
        count: u32,
    },

    /// Skin width must be strictly positive
    #[error("skin width must be > 0, got {0}")]
    NonPositiveSkin(f32),

    /// Skin width does not fit inside a hitbox profile
    #[error("skin width {skin} must be smaller than half of the {profile} profile's smallest side ({limit})")]
    SkinTooThick {
        /// Configured skin width
        skin: f32,
        /// Profile name
        profile: &'static str,
        /// Half of the profile's smallest side
        limit: f32,
    },

    /// Hitbox profile with a zero or negative dimension
    #[error("{profile} profile size must be positive, got ({width}, {height})")]
    InvalidProfileSize {
        /// Profile name
        profile: &'static str,
        /// Configured width
        width: f32,
        /// Configured height
        height: f32,
    },

    /// Slope angle limit outside of [0, 90] degrees
    #[error("{name} must be within [0, 90] degrees, got {value}")]
    AngleOutOfRange {
        /// Setting name
        name: &'static str,
        /// Configured value
        value: f32,
    },

    /// Motor parameter that must be strictly positive
    #[error("{name} must be > 0, got {value}")]
    NonPositive {
        /// Setting name
        name: &'static str,
        /// Configured value
        value: f32,
    },
}

/// Level geometry errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// Polygon needs at least three vertices
    #[error("polygon {index} has {count} vertices, need at least 3")]
    TooFewVertices {
        /// Collider index in the level
        index: usize,
        /// Vertex count found
        count: usize,
    },

    /// Segment or box with no extent
    #[error("collider {index} is degenerate")]
    Degenerate {
        /// Collider index in the level
        index: usize,
    },
}

/// Result type alias for Talus operations.
pub type TalusResult<T> = Result<T, TalusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: TalusError = ConfigError::NonPositiveSkin(0.0).into();
        assert!(matches!(err, TalusError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: skin width must be > 0, got 0"
        );
    }

    #[test]
    fn test_ray_count_message() {
        let err = ConfigError::RayCountTooLow {
            axis: "horizontal",
            count: 1,
        };
        assert_eq!(
            err.to_string(),
            "horizontal ray count must be at least 2, got 1"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TalusError = io.into();
        assert!(matches!(err, TalusError::Io(_)));
    }
}
