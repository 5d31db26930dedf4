//! Watch command - reload the configuration whenever it changes on disk

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use ideconf::ConfigurationWatcher;
use tracing::{info, warn};

pub fn execute(project: Option<PathBuf>, interval: u64) -> Result<()> {
    let manager = Arc::new(super::manager(project)?);
    let _watcher = ConfigurationWatcher::new(Arc::clone(&manager))?;
    let interval = Duration::from_millis(interval.max(50));

    loop {
        if !manager.is_loaded() {
            match manager.try_document() {
                Ok(Some(document)) => info!(nodes = document.len(), "configuration reloaded"),
                Ok(None) => info!("no configuration file"),
                Err(err) => warn!(error = %err, "configuration is invalid"),
            }
        }
        thread::sleep(interval);
    }
}
