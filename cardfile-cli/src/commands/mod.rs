//! CLI command implementations

pub mod auth;
pub mod contacts;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cardfile_core::CardfileContext;

use crate::output::{TerminalEvents, TerminalNotifier};

/// Get the cardfile directory from environment or default
pub fn get_cardfile_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CARDFILE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".cardfile")
    }
}

/// Get or create the cardfile context
///
/// Construction rehydrates any persisted session and runs the initial
/// contact fetch when a token is present.
pub fn get_context() -> Result<CardfileContext> {
    let dir = get_cardfile_dir();

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cardfile directory: {:?}", dir))?;

    CardfileContext::new(&dir, Arc::new(TerminalNotifier), Arc::new(TerminalEvents))
        .context("Failed to initialize cardfile context")
}
