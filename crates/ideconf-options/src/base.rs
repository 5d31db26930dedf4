//! Option types shared by every run configuration.

use crate::{Options, RegistryBuilder};

/// Settings common to all run configurations.
///
/// Also used to describe a factory that declares no options type of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunConfigurationOptions {
    pub name: Option<String>,
    pub show_console_on_std_out: bool,
    pub show_console_on_std_err: bool,
    pub allow_running_in_parallel: bool,
    pub log_files: Vec<String>,
}

impl Options for RunConfigurationOptions {
    fn describe(registry: &mut RegistryBuilder<Self>) {
        registry
            .string("name", |o, v| o.name = Some(v))
            .boolean("showConsoleOnStdOut", |o, v| o.show_console_on_std_out = v)
            .boolean("showConsoleOnStdErr", |o, v| o.show_console_on_std_err = v)
            .boolean("allowRunningInParallel", |o, v| {
                o.allow_running_in_parallel = v
            })
            .collection("logFiles", |o| &mut o.log_files);
    }
}
