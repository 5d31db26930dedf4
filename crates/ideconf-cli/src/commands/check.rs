//! Check command - parse the configuration file and report problems

use std::path::PathBuf;

use anyhow::Result;
use ideconf::{PLUGINS, RUN_CONFIGURATIONS};
use tracing::info;

pub fn execute(project: Option<PathBuf>) -> Result<()> {
    let manager = super::manager(project)?;
    let Some(path) = manager.config_path() else {
        println!("No configuration file in {}", manager.root().display());
        return Ok(());
    };
    let path = path.display().to_string();
    let Some(document) = manager.load()? else {
        println!("{path}: empty");
        return Ok(());
    };
    info!(path = %path, nodes = document.len(), "configuration parsed");

    let Some(root) = document.root_mapping() else {
        anyhow::bail!("{path}: the document root must be a mapping");
    };
    for (key, value) in root.iter() {
        let Some(name) = key.as_scalar() else {
            continue;
        };
        if (name == RUN_CONFIGURATIONS || name == PLUGINS) && value.as_mapping().is_none() {
            anyhow::bail!("{path}: `{name}` must be a mapping ({})", value.mark());
        }
    }

    println!("{path}: ok");
    Ok(())
}
