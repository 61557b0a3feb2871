// ABOUTME: Validated release version string.
// ABOUTME: Ensures the version is safe to splice into share paths and tag names.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseVersionError {
    #[error("release version cannot be empty")]
    Empty,

    #[error("release version exceeds maximum length of 64 characters")]
    TooLong,

    #[error("release version must start with a digit or a letter")]
    BadStart,

    #[error("invalid character in release version: '{0}'")]
    InvalidChar(char),
}

/// The version being released, e.g. `1.2.3` or `4.0.0-rc1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn new(value: &str) -> Result<Self, ReleaseVersionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ReleaseVersionError::Empty);
        }

        if value.len() > 64 {
            return Err(ReleaseVersionError::TooLong);
        }

        if !value.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(ReleaseVersionError::BadStart);
        }

        // Spliced into a UNC path and a git tag, so no separators or spaces.
        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_' | '+') {
                return Err(ReleaseVersionError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute this version for every `{version}` placeholder in `template`.
    pub fn render(&self, template: &str) -> String {
        template.replace("{version}", &self.0)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
