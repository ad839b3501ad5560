//! Error types for the launcher core.
//!
//! None of these escape to the user: configuration errors fall back to
//! defaults, launch errors leave the loading view up, probe errors are retried.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid backend port '{0}': expected 1-65535")]
    InvalidPort(String),

    #[error("invalid backend name '{0}': must be a plain file name")]
    InvalidBackendName(String),

    #[error("failed to read launcher config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse launcher config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("resource directory is unavailable in packaged mode")]
    ResourceDirUnavailable,

    #[error("invalid backend command override: {0}")]
    InvalidCustomCommand(String),

    #[error("failed to spawn backend {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("refusing to relax TLS trust for non-loopback host in {0}")]
    NonLoopbackHost(String),

    #[error("failed to build probe client: {0}")]
    ClientBuild(reqwest::Error),
}
