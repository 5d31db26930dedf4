//! The configuration types a schema is generated for.
//!
//! A catalog is supplied by the host for each generation and is never
//! modified by the generator.

use ideconf_options::{Options, OptionsClass};

/// One run configuration type and the factories that create it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub factories: Vec<FactoryEntry>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            factories: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_factory(mut self, factory: FactoryEntry) -> Self {
        self.factories.push(factory);
        self
    }

    /// Text used as the schema description: the description if there is
    /// one, the display name otherwise.
    pub fn summary(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.display_name)
    }
}

/// A factory of a configuration type.
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryEntry {
    pub id: String,
    pub name: String,
    /// Options type bound from the configuration file. Factories without one
    /// are described by `RunConfigurationOptions`.
    pub options: Option<OptionsClass>,
}

impl FactoryEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            options: None,
        }
    }

    pub fn with_options<T: Options>(mut self) -> Self {
        self.options = Some(OptionsClass::of::<T>());
        self
    }
}

/// A plugin settings object, written under `plugins.<id>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSection {
    pub id: String,
    pub description: Option<String>,
    pub options: OptionsClass,
}

impl PluginSection {
    pub fn new<T: Options>(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            options: OptionsClass::of::<T>(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Everything a schema is generated from, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    pub run_configuration_types: Vec<CatalogEntry>,
    pub plugin_sections: Vec<PluginSection>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, entry: CatalogEntry) -> Self {
        self.run_configuration_types.push(entry);
        self
    }

    pub fn with_plugin(mut self, section: PluginSection) -> Self {
        self.plugin_sections.push(section);
        self
    }
}
