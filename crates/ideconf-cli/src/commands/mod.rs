//! Command implementations for the ideconf CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use ideconf::ConfigurationFileManager;

pub mod check;
pub mod query;
pub mod schema;
pub mod watch;

/// Manager for `project`, or for the current directory.
pub fn manager(project: Option<PathBuf>) -> Result<ConfigurationFileManager> {
    let root = match project {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    Ok(ConfigurationFileManager::new(root))
}
