//! # ideconf-schema
//!
//! JSON schema generation for ideconf configuration files.
//!
//! A [`SchemaGenerator`] walks a [`SchemaCatalog`] of run configuration
//! types and plugin sections, looks up the property registry of each
//! options type through a shared [`RegistryCache`](ideconf_options::RegistryCache),
//! and writes a draft-07 schema with [`JsonBuilder`]. Identifiers become
//! schema names through [`to_property_name`].
//!
//! ## Example
//!
//! ```rust
//! use ideconf_options::{Options, RegistryBuilder, RegistryCache};
//! use ideconf_schema::{CatalogEntry, FactoryEntry, SchemaCatalog, SchemaGenerator};
//!
//! #[derive(Default)]
//! struct FooOptions {
//!     bar: String,
//! }
//!
//! impl Options for FooOptions {
//!     fn describe(registry: &mut RegistryBuilder<Self>) {
//!         registry.string("bar", |o, v| o.bar = v);
//!     }
//! }
//!
//! let catalog = SchemaCatalog::new().with_type(
//!     CatalogEntry::new("Foo", "Foo")
//!         .with_factory(FactoryEntry::new("Foo", "Foo").with_options::<FooOptions>()),
//! );
//! let cache = RegistryCache::new();
//! let schema = SchemaGenerator::new(&cache).generate(&catalog);
//! assert!(schema.contains("#/runConfigurationDefinitions/foo"));
//! ```

mod catalog;
mod error;
mod generator;
mod json;
mod naming;

pub use catalog::{CatalogEntry, FactoryEntry, PluginSection, SchemaCatalog};
pub use error::{Result, SchemaError};
pub use generator::{PropertyFilter, SchemaGenerator, SchemaOptions};
pub use json::JsonBuilder;
pub use naming::to_property_name;
