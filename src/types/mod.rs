// ABOUTME: Type-safe identifiers and validated domain values.
// ABOUTME: Uses phantom types to keep release and asset ids apart at compile time.

mod drive;
mod id;
mod version;

pub use drive::{DriveLetter, DriveLetterError};
pub use id::{AssetId, Id, ReleaseId};
pub use version::{ReleaseVersion, ReleaseVersionError};
