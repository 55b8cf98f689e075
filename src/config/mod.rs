// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Prefix for environment overrides, e.g. `STATUS_MONITOR__CHECKS__TIMEOUT_MS=2000`.
pub const ENV_PREFIX: &str = "STATUS_MONITOR";

/// Load configuration from a file (YAML, JSON or TOML by extension), with
/// environment overrides layered on top.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    let settings: Settings = ::config::Config::builder()
        .add_source(::config::File::from(path))
        .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .with_context(|| format!("Failed to read config file {}", path.display()))?
        .try_deserialize()
        .context("Failed to parse config")?;

    settings.validate()?;
    Ok(settings)
}

/// Parse configuration from an in-memory document.
pub fn parse_config(contents: &str, format: ::config::FileFormat) -> Result<Settings> {
    let settings: Settings = ::config::Config::builder()
        .add_source(::config::File::from_str(contents, format))
        .build()
        .context("Failed to read config")?
        .try_deserialize()
        .context("Failed to parse config")?;

    settings.validate()?;
    Ok(settings)
}
