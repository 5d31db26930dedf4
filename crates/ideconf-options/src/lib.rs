//! # ideconf-options
//!
//! Typed option objects bound from composed YAML mappings.
//!
//! Each option type implements [`Options`] and declares its bindable
//! properties once through a [`RegistryBuilder`]. The resulting
//! [`PropertyRegistry`] is cached per type in a [`RegistryCache`] and is
//! used both to bind mappings onto instances and, through [`OptionsClass`],
//! to describe the type's shape for schema generation.
//!
//! ## Example
//!
//! ```rust
//! use ideconf_options::{Options, RegistryBuilder, RegistryCache};
//! use ideconf_yaml::compose_single_str;
//!
//! #[derive(Default)]
//! struct ApplicationOptions {
//!     main_class: String,
//!     program_parameters: Vec<String>,
//! }
//!
//! impl Options for ApplicationOptions {
//!     fn describe(registry: &mut RegistryBuilder<Self>) {
//!         registry
//!             .string("mainClass", |o, v| o.main_class = v)
//!             .collection("programParameters", |o| &mut o.program_parameters);
//!     }
//! }
//!
//! let doc = compose_single_str("mainClass: app.Main\nprogramParameters: [-v]\n")
//!     .unwrap()
//!     .unwrap();
//! let cache = RegistryCache::new();
//! let mut options = ApplicationOptions::default();
//! cache
//!     .registry_for::<ApplicationOptions>()
//!     .bind(&mut options, doc.root_mapping().unwrap());
//! assert_eq!(options.main_class, "app.Main");
//! assert_eq!(options.program_parameters, vec!["-v"]);
//! ```

mod base;
mod bind;
mod error;
mod property;
mod registry;

pub use base::RunConfigurationOptions;
pub use error::ValueError;
pub use property::{
    CollectionProperty, MapProperty, OptionEnum, PropertyKind, PropertyShape, ScalarKind,
    ScalarProperty, StoredProperty,
};
pub use registry::{Options, OptionsClass, PropertyRegistry, RegistryBuilder, RegistryCache};
