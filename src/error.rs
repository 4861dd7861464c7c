// ABOUTME: Application-wide error types for berth.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::lifecycle::LifecycleError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("container not found: {0}")]
    NotFound(String),

    #[error("failed to create {name}: {reason}")]
    CreateFailed { name: String, reason: String },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
