//! Error types for the configuration gateway.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ideconf_yaml::Error,
    },

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        source: notify::Error,
    },
}

pub type Result<T> = std::result::Result<T, GatewayError>;
