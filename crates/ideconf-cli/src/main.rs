//! ideconf CLI - inspect project configuration files and generate their schema

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ideconf")]
#[command(version, about = "Project configuration files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the configuration file and report problems
    Check {
        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },

    /// Print the value at a dotted path, e.g. runConfigurations.templates
    Query {
        /// Dotted path from the document root
        path: String,

        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },

    /// Print the configuration with aliases expanded
    Dump {
        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },

    /// Generate the JSON schema of configuration files
    Schema {
        /// Run configuration type (ID or ID:DISPLAY NAME), described by the
        /// common run configuration options
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Write to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Watch the configuration file and report each reload
    Watch {
        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Polling interval for reloads, in milliseconds
        #[arg(long, default_value_t = 500)]
        interval: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ideconf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { project } => commands::check::execute(project),
        Commands::Query { path, project } => commands::query::execute(&path, project),
        Commands::Dump { project } => commands::query::dump(project),
        Commands::Schema {
            types,
            compact,
            output,
        } => commands::schema::execute(commands::schema::SchemaArgs {
            types,
            compact,
            output,
        }),
        Commands::Watch { project, interval } => commands::watch::execute(project, interval),
    }
}
