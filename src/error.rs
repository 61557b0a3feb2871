// ABOUTME: Application-wide error types for scriptgen-release.
// ABOUTME: Uses thiserror; step failures pass through untouched so main can print them once.

use std::path::PathBuf;
use thiserror::Error;

use crate::release_host::HostError;
use crate::step::StepFailed;
use crate::types::{DriveLetterError, ReleaseVersionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid release version: {0}")]
    InvalidVersion(#[from] ReleaseVersionError),

    #[error("invalid drive: {0}")]
    InvalidDrive(#[from] DriveLetterError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] HostError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Step(#[from] StepFailed),
}

pub type Result<T> = std::result::Result<T, Error>;
