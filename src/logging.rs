//! Log setup for the terminal runner.
//!
//! The terminal belongs to the game, so logs only go to a file, and only when
//! one is configured.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::util::SubscriberInitExt;

use crate::settings::Settings;

/// Install the global subscriber if `settings.log_path` is set
///
/// Returns whether logging was enabled.
pub fn init(settings: &Settings) -> Result<bool> {
    let Some(path) = settings.log_path.as_ref() else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .finish()
        .try_init()
        .context("install log subscriber")?;
    Ok(true)
}
