//! Filesystem watching for the configuration file.
//!
//! A [`ConfigurationWatcher`] watches the project root (not recursively) and
//! forwards every event to [`ConfigurationFileManager::on_file_events`], so
//! the cached document is dropped as soon as the file is created, edited or
//! deleted.

use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::error::{GatewayError, Result};
use crate::manager::ConfigurationFileManager;

/// Keeps the cache of a [`ConfigurationFileManager`] in step with the disk.
///
/// Watching stops when the watcher is dropped.
pub struct ConfigurationWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigurationWatcher {
    pub fn new(manager: Arc<ConfigurationFileManager>) -> Result<Self> {
        let root = manager.root().to_path_buf();
        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    if manager.on_file_events(std::slice::from_ref(&event)) {
                        debug!(kind = ?event.kind, "configuration cache invalidated");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "configuration watch error");
                }
            },
        )
        .map_err(|source| GatewayError::Watch {
            path: root.clone(),
            source,
        })?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|source| GatewayError::Watch {
                path: root.clone(),
                source,
            })?;

        info!(path = %root.display(), "watching configuration files");
        Ok(Self { _watcher: watcher })
    }
}
