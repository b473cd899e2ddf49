//! # Talus Common
//!
//! Shared types for the Talus kinematic character controller.
//!
//! This crate provides the foundation used by the other Talus crates:
//! - Error types for configuration and level loading
//! - Collision layer masks for geometry queries
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod layers;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::layers::*;
}

pub use prelude::*;
