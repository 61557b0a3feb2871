// ABOUTME: Remote release-hosting seam: create releases, manage assets, delete releases.
// ABOUTME: Defines the ReleaseHost trait, its records, and HostError; GitHub is the implementation.

mod endpoints;
mod github;

pub use endpoints::{ASSETS_PER_PAGE, Endpoints};
pub use github::GitHubReleases;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AssetId, ReleaseId};

/// Body of a create-release request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftRelease {
    pub tag_name: String,
    pub name: String,
    pub draft: bool,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
}

/// Errors talking to the release host.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host answered with a non-2xx status.
    #[error("HTTP {status} {reason}{}", detail(.message))]
    Status {
        status: u16,
        reason: String,
        message: Option<String>,
    },

    /// The request never got an answer.
    #[error("request failed: {0}")]
    Transport(String),

    /// A 2xx answer whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl HostError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HostError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations the pipeline needs from the release host.
///
/// Implementations authenticate every call.
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    async fn create_release(&self, draft: &DraftRelease) -> Result<ReleaseId, HostError>;

    /// All assets of the release, across every page.
    async fn list_assets(&self, release: &ReleaseId) -> Result<Vec<Asset>, HostError>;

    async fn delete_asset(&self, asset: &AssetId) -> Result<(), HostError>;

    async fn upload_asset(
        &self,
        release: &ReleaseId,
        name: &str,
        content: Vec<u8>,
    ) -> Result<(), HostError>;

    async fn delete_release(&self, release: &ReleaseId) -> Result<(), HostError>;
}
