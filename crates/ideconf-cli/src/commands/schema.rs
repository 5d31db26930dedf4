//! Schema command - generate the JSON schema of configuration files

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ideconf_options::RegistryCache;
use ideconf_schema::{CatalogEntry, FactoryEntry, SchemaCatalog, SchemaGenerator, SchemaOptions};
use tracing::info;

pub struct SchemaArgs {
    pub types: Vec<String>,
    pub compact: bool,
    pub output: Option<PathBuf>,
}

/// Build a catalog from `ID` or `ID:DISPLAY NAME` arguments. Each type gets a
/// single factory described by the common run configuration options.
pub fn catalog(types: &[String]) -> SchemaCatalog {
    types.iter().fold(SchemaCatalog::new(), |catalog, arg| {
        let (id, name) = arg.split_once(':').unwrap_or((arg.as_str(), arg.as_str()));
        catalog.with_type(CatalogEntry::new(id, name).with_factory(FactoryEntry::new(id, name)))
    })
}

pub fn execute(args: SchemaArgs) -> Result<()> {
    let cache = RegistryCache::new();
    let options = SchemaOptions {
        indent: if args.compact {
            None
        } else {
            SchemaOptions::default().indent
        },
        ..SchemaOptions::default()
    };
    let schema = SchemaGenerator::new(&cache)
        .with_options(options)
        .generate(&catalog(&args.types));

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{schema}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "schema written");
        }
        None => println!("{schema}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_arguments() {
        let catalog = catalog(&["ShellScript:Shell Script".to_string(), "Make".to_string()]);
        let entries = &catalog.run_configuration_types;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "ShellScript");
        assert_eq!(entries[0].display_name, "Shell Script");
        assert_eq!(entries[1].display_name, "Make");
        assert_eq!(entries[1].factories.len(), 1);
        assert!(entries[1].factories[0].options.is_none());
    }
}
