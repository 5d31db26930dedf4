//! Schema generation from a [`SchemaCatalog`].
//!
//! The generated document has two definition buckets. Every run
//! configuration type gets a definition under its canonical name in
//! `runConfigurationDefinitions`, and an object-only twin in
//! `runConfigurationTemplateDefinitions`. Types with several factories get
//! a grouping definition whose properties point at one leaf definition per
//! factory, named `{type}-{factory}`.
//!
//! Root `properties.runConfigurations` references the definitions by JSON
//! pointer; `properties.plugins` describes plugin sections inline.

use std::collections::HashSet;

use ideconf_options::{
    OptionsClass, PropertyKind, PropertyShape, RegistryCache, RunConfigurationOptions, ScalarKind,
};
use tracing::{debug, error};

use crate::catalog::{CatalogEntry, FactoryEntry, PluginSection, SchemaCatalog};
use crate::json::JsonBuilder;
use crate::naming::{check_identifier, to_property_name};
use crate::{Result, SchemaError};

const SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";
const DEFINITIONS: &str = "runConfigurationDefinitions";
const TEMPLATE_DEFINITIONS: &str = "runConfigurationTemplateDefinitions";

/// Root metadata and formatting of the generated schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// One level of indentation; `None` writes compact JSON.
    pub indent: Option<String>,
    pub id: String,
    pub title: String,
    pub description: String,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            indent: Some("  ".to_string()),
            id: "ideconf.schema.json".to_string(),
            title: "ideconf".to_string(),
            description: "Run configurations and plugin settings of a project".to_string(),
        }
    }
}

/// Decides whether a property of a factory's options appears in the schema.
pub type PropertyFilter<'c> = Box<dyn Fn(&FactoryEntry, &PropertyShape) -> bool + 'c>;

/// Generates the JSON schema of configuration files.
pub struct SchemaGenerator<'c> {
    cache: &'c RegistryCache,
    options: SchemaOptions,
    property_filter: Option<PropertyFilter<'c>>,
}

/// A definition bucket. Each id is written at most once.
struct Definitions {
    bucket: &'static str,
    builder: JsonBuilder,
    written: HashSet<String>,
}

impl Definitions {
    fn new(bucket: &'static str, indent: Option<String>) -> Self {
        Self {
            bucket,
            // Members of a bucket sit two levels below the root.
            builder: JsonBuilder::nested(indent, 2),
            written: HashSet::new(),
        }
    }

    fn prefix(&self) -> String {
        format!("#/{}/", self.bucket)
    }

    fn contains(&self, id: &str) -> bool {
        self.written.contains(id)
    }

    fn define(&mut self, id: &str, body: impl FnOnce(&mut JsonBuilder)) {
        if self.written.insert(id.to_string()) {
            self.builder.object(id, body);
        } else {
            debug!(bucket = self.bucket, id, "definition already written");
        }
    }
}

/// Whether a leaf accepts a list of configurations or a single one.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Shape {
    ObjectOrArray,
    Object,
}

/// Canonical names of one catalog entry, computed before anything is written.
struct ResolvedEntry<'e> {
    id: String,
    entry: &'e CatalogEntry,
    factories: Vec<(String, &'e FactoryEntry)>,
}

impl<'c> SchemaGenerator<'c> {
    pub fn new(cache: &'c RegistryCache) -> Self {
        Self {
            cache,
            options: SchemaOptions::default(),
            property_filter: None,
        }
    }

    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Only properties for which `filter` returns true are written.
    pub fn with_property_filter(
        mut self,
        filter: impl Fn(&FactoryEntry, &PropertyShape) -> bool + 'c,
    ) -> Self {
        self.property_filter = Some(Box::new(filter));
        self
    }

    /// Generate the schema text.
    ///
    /// Entries that cannot be described (no factories, unusable identifiers)
    /// are logged and left out; the rest of the schema is still generated.
    pub fn generate(&self, catalog: &SchemaCatalog) -> String {
        let indent = self.options.indent.clone();
        let mut definitions = Definitions::new(DEFINITIONS, indent.clone());
        let mut templates = Definitions::new(TEMPLATE_DEFINITIONS, indent.clone());
        let mut names = Vec::new();

        for entry in &catalog.run_configuration_types {
            match self.resolve(entry, &definitions) {
                Ok(resolved) => {
                    self.define_entry(&resolved, &mut definitions, Shape::ObjectOrArray);
                    self.define_entry(&resolved, &mut templates, Shape::Object);
                    names.push(resolved.id);
                }
                Err(err) => {
                    error!(
                        type_id = %entry.id,
                        error = %err,
                        "configuration type left out of schema"
                    );
                }
            }
        }

        let plugins: Vec<(&PluginSection, Vec<PropertyShape>)> = catalog
            .plugin_sections
            .iter()
            .filter_map(|section| match check_identifier(&section.id, &section.id) {
                Ok(()) => Some((section, section.options.shapes(self.cache))),
                Err(err) => {
                    error!(
                        plugin = %section.id,
                        error = %err,
                        "plugin section left out of schema"
                    );
                    None
                }
            })
            .collect();

        debug!(
            types = names.len(),
            plugins = plugins.len(),
            "generating configuration schema"
        );

        let definitions_prefix = definitions.prefix();
        let templates_prefix = templates.prefix();
        let mut root = JsonBuilder::new(indent);
        root.object_item(|b| {
            b.key("$schema").value(SCHEMA_DRAFT);
            b.key("$id").value(&self.options.id);
            b.key("title").value(&self.options.title);
            b.key("description").value(&self.options.description);
            b.key("type").value("object");
            b.object(DEFINITIONS, |b| {
                b.raw_members(definitions.builder.as_str());
            });
            b.object(TEMPLATE_DEFINITIONS, |b| {
                b.raw_members(templates.builder.as_str());
            });
            b.object("properties", |b| {
                b.object("runConfigurations", |b| {
                    b.key("type").value("object");
                    b.key("description").value("Run configurations");
                    b.object("properties", |b| {
                        b.object("templates", |b| {
                            b.key("type").value("object");
                            b.key("description").value("Run configuration templates");
                            b.object("properties", |b| {
                                for name in &names {
                                    b.reference(name, &templates_prefix, name);
                                }
                            });
                            b.key("additionalProperties").boolean(false);
                        });
                        for name in &names {
                            b.reference(name, &definitions_prefix, name);
                        }
                    });
                    b.key("additionalProperties").boolean(false);
                });
                b.object("plugins", |b| {
                    b.key("type").value("object");
                    b.key("description").value("Plugin settings");
                    b.object("properties", |b| {
                        for (section, shapes) in &plugins {
                            b.object(&section.id, |b| {
                                b.key("type").value("object");
                                if let Some(description) = &section.description {
                                    b.key("description").value(description);
                                }
                                write_properties(b, shapes.iter());
                                b.key("additionalProperties").boolean(false);
                            });
                        }
                    });
                    b.key("additionalProperties").boolean(false);
                });
            });
            b.key("additionalProperties").boolean(false);
        });
        root.finish()
    }

    fn resolve<'e>(
        &self,
        entry: &'e CatalogEntry,
        definitions: &Definitions,
    ) -> Result<ResolvedEntry<'e>> {
        if entry.factories.is_empty() {
            return Err(SchemaError::NoFactories {
                type_id: entry.id.clone(),
            });
        }
        let id = to_property_name(&entry.id)?;
        if definitions.contains(&id) {
            return Err(SchemaError::DuplicateName {
                identifier: entry.id.clone(),
                name: id,
            });
        }
        let factories = if entry.factories.len() == 1 {
            vec![(id.clone(), &entry.factories[0])]
        } else {
            let mut seen = HashSet::new();
            let mut factories = Vec::with_capacity(entry.factories.len());
            for factory in &entry.factories {
                let name = to_property_name(&factory.id)?;
                if !seen.insert(name.clone()) {
                    return Err(SchemaError::DuplicateName {
                        identifier: factory.id.clone(),
                        name,
                    });
                }
                factories.push((name, factory));
            }
            factories
        };
        Ok(ResolvedEntry {
            id,
            entry,
            factories,
        })
    }

    fn define_entry(&self, resolved: &ResolvedEntry<'_>, bucket: &mut Definitions, shape: Shape) {
        let summary = resolved.entry.summary();
        if let [(_, factory)] = resolved.factories.as_slice() {
            self.define_leaf(bucket, &resolved.id, summary, factory, shape);
            return;
        }

        let prefix = bucket.prefix();
        let leaves: Vec<String> = resolved
            .factories
            .iter()
            .map(|(name, _)| format!("{}-{}", resolved.id, name))
            .collect();
        bucket.define(&resolved.id, |b| {
            b.key("type").value("object");
            b.key("description").value(summary);
            b.object("properties", |b| {
                for ((name, _), leaf) in resolved.factories.iter().zip(&leaves) {
                    b.reference(name, &prefix, leaf);
                }
            });
            b.key("additionalProperties").boolean(false);
        });
        for ((_, factory), leaf) in resolved.factories.iter().zip(&leaves) {
            self.define_leaf(bucket, leaf, &factory.name, factory, shape);
        }
    }

    fn define_leaf(
        &self,
        bucket: &mut Definitions,
        id: &str,
        description: &str,
        factory: &FactoryEntry,
        shape: Shape,
    ) {
        let self_pointer = bucket.prefix();
        let shapes = self.shapes(factory);
        bucket.define(id, |b| {
            match shape {
                Shape::ObjectOrArray => {
                    b.key("type").raw_value(r#"["array","object"]"#);
                    b.reference("items", &self_pointer, id);
                }
                Shape::Object => {
                    b.key("type").value("object");
                }
            }
            b.key("description").value(description);
            write_properties(b, shapes.iter());
            b.key("additionalProperties").boolean(false);
        });
    }

    fn shapes(&self, factory: &FactoryEntry) -> Vec<PropertyShape> {
        let class = factory
            .options
            .unwrap_or_else(OptionsClass::of::<RunConfigurationOptions>);
        class
            .shapes(self.cache)
            .into_iter()
            .filter(|shape| {
                self.property_filter
                    .as_ref()
                    .is_none_or(|filter| filter(factory, shape))
            })
            .collect()
    }
}

fn write_properties<'s>(b: &mut JsonBuilder, shapes: impl Iterator<Item = &'s PropertyShape>) {
    b.object("properties", |b| {
        for shape in shapes {
            b.object(shape.name, |b| write_property_type(b, shape.kind));
        }
    });
}

fn write_property_type(b: &mut JsonBuilder, kind: PropertyKind) {
    match kind {
        PropertyKind::Scalar(ScalarKind::String) => {
            b.key("type").value("string");
        }
        PropertyKind::Scalar(ScalarKind::Boolean) => {
            b.key("type").value("boolean");
        }
        PropertyKind::Scalar(ScalarKind::Integer) => {
            b.key("type").value("integer");
        }
        PropertyKind::Scalar(ScalarKind::Enum(variants)) => {
            b.key("type").value("string");
            b.array("enum", |b| {
                for variant in variants {
                    b.value(variant);
                }
            });
        }
        PropertyKind::Map => {
            b.key("type").value("object");
            b.object("additionalProperties", |b| {
                b.key("type").value("string");
            });
        }
        PropertyKind::Collection => {
            b.key("type").value("array");
            b.object("items", |b| {
                b.key("type").value("string");
            });
        }
    }
}
