// ABOUTME: Validated Windows drive letter used as the share mount point.
// ABOUTME: Accepts "z", "Z" or "Z:" and normalizes to "Z:".

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriveLetterError {
    #[error("drive cannot be empty")]
    Empty,

    #[error("drive must be a single letter followed by an optional colon, got '{0}'")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriveLetter(char);

impl DriveLetter {
    pub fn new(value: &str) -> Result<Self, DriveLetterError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DriveLetterError::Empty);
        }

        let letter = value.strip_suffix(':').unwrap_or(value);
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Self(c.to_ascii_uppercase())),
            _ => Err(DriveLetterError::Malformed(value.to_string())),
        }
    }

    pub fn letter(&self) -> char {
        self.0
    }

    /// Root of the drive, e.g. `Z:\`.
    pub fn root(&self) -> String {
        format!("{}:\\", self.0)
    }
}

impl Default for DriveLetter {
    fn default() -> Self {
        Self('Z')
    }
}

impl fmt::Display for DriveLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.0)
    }
}
