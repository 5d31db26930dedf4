//! The project configuration file and the typed sections read from it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ideconf_options::{Options, RegistryCache};
use ideconf_yaml::{
    Document, MappingRef, SequenceRef, compose_single_str, find_mapping, find_node, find_sequence,
};
use notify::EventKind;
use tracing::{debug, warn};

use crate::cache::ClearableLazy;
use crate::error::{GatewayError, Result};

/// Section holding run configurations, keyed by configuration type.
pub const RUN_CONFIGURATIONS: &str = "runConfigurations";

/// Section of `runConfigurations` holding per-type templates.
pub const TEMPLATES: &str = "templates";

/// Section holding plugin settings, keyed by plugin id.
pub const PLUGINS: &str = "plugins";

/// Where the configuration file is looked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOptions {
    /// Candidate file names in the project root, most preferred first.
    pub file_names: Vec<String>,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            file_names: vec!["ideconf.yaml".to_string(), "ideconf.yml".to_string()],
        }
    }
}

/// Access to the configuration file of one project.
///
/// The file is parsed on first use and kept until a change event for it is
/// passed to [`on_file_events`](Self::on_file_events). A missing, unreadable
/// or malformed file reads as "no configuration": every section is absent
/// and typed readers return defaults.
#[derive(Debug)]
pub struct ConfigurationFileManager {
    root: PathBuf,
    options: GatewayOptions,
    registries: RegistryCache,
    document: ClearableLazy<Option<Arc<Document>>>,
}

impl ConfigurationFileManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, GatewayOptions::default())
    }

    pub fn with_options(root: impl Into<PathBuf>, options: GatewayOptions) -> Self {
        Self {
            root: root.into(),
            options,
            registries: RegistryCache::new(),
            document: ClearableLazy::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registries(&self) -> &RegistryCache {
        &self.registries
    }

    /// The first candidate file that exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.options
            .file_names
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Whether `path` names one of the candidate files.
    pub fn is_config_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.options.file_names.iter().any(|n| n == name))
    }

    /// Read and parse the configuration file, bypassing the cache.
    ///
    /// Returns `Ok(None)` when there is no file, including one that
    /// disappears between lookup and read.
    pub fn load(&self) -> Result<Option<Document>> {
        let Some(path) = self.config_path() else {
            return Ok(None);
        };
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(GatewayError::Io { path, source }),
        };
        compose_single_str(&content).map_err(|source| GatewayError::Parse { path, source })
    }

    /// The parsed configuration, cached until invalidated.
    pub fn document(&self) -> Option<Arc<Document>> {
        self.try_document().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring configuration file");
            None
        })
    }

    /// Like [`document`](Self::document), but a file that fails to load is
    /// reported to the caller.
    ///
    /// The file is read at most once per cache generation. The failure is
    /// only returned by the call that parsed the file; it is cached as "no
    /// configuration", so later calls return `Ok(None)` until the cache is
    /// invalidated.
    pub fn try_document(&self) -> Result<Option<Arc<Document>>> {
        let mut failure = None;
        let document = self.document.get_or_compute(|| match self.load() {
            Ok(document) => {
                debug!(
                    root = %self.root.display(),
                    found = document.is_some(),
                    "configuration loaded"
                );
                document.map(Arc::new)
            }
            Err(err) => {
                failure = Some(err);
                None
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(document),
        }
    }

    /// Whether a parse result is cached.
    pub fn is_loaded(&self) -> bool {
        self.document.is_initialized()
    }

    /// Drop the cached document.
    pub fn invalidate(&self) {
        self.document.invalidate();
    }

    /// Invalidate the cache if any event creates, modifies or removes a
    /// configuration file. Returns whether it did.
    pub fn on_file_events(&self, events: &[notify::Event]) -> bool {
        let relevant = events.iter().any(|event| {
            matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) && event.paths.iter().any(|path| self.is_config_file(path))
        });
        if relevant {
            debug!(root = %self.root.display(), "configuration file changed");
            self.invalidate();
        }
        relevant
    }

    /// Run `f` on the mapping at `path`, if the configuration has one.
    pub fn with_mapping<R>(&self, path: &str, f: impl FnOnce(MappingRef<'_>) -> R) -> Option<R> {
        let document = self.document()?;
        let root = document.root_mapping()?;
        find_mapping(path, root).map(f)
    }

    /// Run `f` on the sequence at `path`, if the configuration has one.
    pub fn with_sequence<R>(&self, path: &str, f: impl FnOnce(SequenceRef<'_>) -> R) -> Option<R> {
        let document = self.document()?;
        let root = document.root_mapping()?;
        find_sequence(path, root).map(f)
    }

    /// Bind the mapping at `path` onto `target`. Returns whether the mapping
    /// exists.
    pub fn bind_section<T: Options>(&self, path: &str, target: &mut T) -> bool {
        let registry = self.registries.registry_for::<T>();
        self.with_mapping(path, |entries| {
            registry.bind(target, entries);
        })
        .is_some()
    }

    /// Settings of a plugin, from `plugins.<plugin_id>`.
    pub fn plugin_settings<T: Options + Default>(&self, plugin_id: &str) -> Option<T> {
        let mut settings = T::default();
        self.bind_section(&format!("{PLUGINS}.{plugin_id}"), &mut settings)
            .then_some(settings)
    }

    /// The template of a configuration type, from
    /// `runConfigurations.templates.<type_id>`.
    pub fn run_configuration_template<T: Options + Default>(&self, type_id: &str) -> Option<T> {
        let mut template = T::default();
        self.bind_section(&template_path(type_id), &mut template)
            .then_some(template)
    }

    /// Run configurations of one type, from `runConfigurations.<type_id>`,
    /// written either as a single mapping or as a list of mappings.
    ///
    /// Each configuration starts from the type's template, if there is one.
    pub fn run_configurations<T: Options + Default>(&self, type_id: &str) -> Vec<T> {
        let Some(document) = self.document() else {
            return Vec::new();
        };
        let Some(root) = document.root_mapping() else {
            return Vec::new();
        };
        let Some(node) = find_node(&format!("{RUN_CONFIGURATIONS}.{type_id}"), root) else {
            return Vec::new();
        };

        let registry = self.registries.registry_for::<T>();
        let template = find_mapping(&template_path(type_id), root);
        let configure = |entries: MappingRef<'_>| {
            let mut configuration = T::default();
            if let Some(template) = template {
                registry.bind(&mut configuration, template);
            }
            registry.bind(&mut configuration, entries);
            configuration
        };

        if let Some(entries) = node.as_mapping() {
            return vec![configure(entries)];
        }
        match node.as_sequence() {
            Some(items) => items
                .iter()
                .filter_map(|item| {
                    let entries = item.as_mapping();
                    if entries.is_none() {
                        debug!(type_id, mark = %item.mark(), "run configuration is not a mapping");
                    }
                    entries
                })
                .map(configure)
                .collect(),
            None => {
                debug!(
                    type_id,
                    mark = %node.mark(),
                    "run configurations are neither a mapping nor a list"
                );
                Vec::new()
            }
        }
    }
}

fn template_path(type_id: &str) -> String {
    format!("{RUN_CONFIGURATIONS}.{TEMPLATES}.{type_id}")
}
