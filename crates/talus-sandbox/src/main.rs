//! # Talus Sandbox
//!
//! Runs a scripted character through a level and logs what it touched.
//!
//! Usage: `talus [config.toml]`. Without an argument, `talus.toml` in the
//! working directory is used if present.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use talus_sandbox::config::{SandboxConfig, CONFIG_FILE};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("talus=info".parse()?))
        .init();

    info!("Talus sandbox {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);

    let config = SandboxConfig::load_from(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let summaries = talus_sandbox::run(&config).context("running sandbox")?;

    let grounded = summaries.last().is_some_and(|s| s.grounded);
    info!("Ran {} phases, grounded at end: {grounded}", summaries.len());
    Ok(())
}
