//! # ideconf
//!
//! The configuration file of a project, as seen by the rest of the IDE.
//!
//! [`ConfigurationFileManager`] finds `ideconf.yaml` (or `ideconf.yml`) in a
//! project root, parses it once with `ideconf-yaml`, and serves typed
//! sections bound through `ideconf-options`. The parsed document is held in
//! a [`ClearableLazy`] and dropped whenever a matching file event arrives,
//! either passed in by the host or delivered by a [`ConfigurationWatcher`].
//!
//! Problems with the file never reach callers of the typed readers: a
//! missing, unreadable or malformed file simply means "no configuration".
//! [`ConfigurationFileManager::load`] reports them for tools that want to.

mod cache;
mod error;
mod manager;
mod watch;

pub use cache::ClearableLazy;
pub use error::{GatewayError, Result};
pub use manager::{
    ConfigurationFileManager, GatewayOptions, PLUGINS, RUN_CONFIGURATIONS, TEMPLATES,
};
pub use watch::ConfigurationWatcher;
