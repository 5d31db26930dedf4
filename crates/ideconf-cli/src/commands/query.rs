//! Query and dump commands - print parts of the composed configuration

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use ideconf_yaml::{Document, find_node};

fn load(project: Option<PathBuf>) -> Result<Document> {
    let manager = super::manager(project)?;
    manager
        .load()?
        .ok_or_else(|| anyhow!("No configuration in {}", manager.root().display()))
}

/// Print the node at `path`: scalars as plain text, anything else as YAML.
pub fn execute(path: &str, project: Option<PathBuf>) -> Result<()> {
    let document = load(project)?;
    let root = document
        .root_mapping()
        .context("The document root is not a mapping")?;
    let node = find_node(path, root).with_context(|| format!("Nothing at `{path}`"))?;

    if let Some(value) = node.as_scalar() {
        println!("{value}");
        return Ok(());
    }
    println!("{}", node.to_yaml_string()?);
    Ok(())
}

/// Print the whole document with aliases expanded.
pub fn dump(project: Option<PathBuf>) -> Result<()> {
    let document = load(project)?;
    println!("{}", document.to_yaml_string()?);
    Ok(())
}
