// ABOUTME: URL construction for the GitHub releases REST API.
// ABOUTME: API calls and asset uploads live on different hosts.

use crate::types::{AssetId, ReleaseId};

/// Page size requested when listing assets. A shorter page is the last one.
pub const ASSETS_PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: String,
    uploads: String,
    repository: String,
}

impl Endpoints {
    pub fn new(api: &str, uploads: &str, repository: &str) -> Self {
        Self {
            api: api.trim_end_matches('/').to_string(),
            uploads: uploads.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
        }
    }

    pub fn releases(&self) -> String {
        format!("{}/repos/{}/releases", self.api, self.repository)
    }

    pub fn release(&self, release: &ReleaseId) -> String {
        format!("{}/{}", self.releases(), segment(release.as_str()))
    }

    pub fn assets(&self, release: &ReleaseId, page: usize) -> String {
        format!(
            "{}/assets?per_page={}&page={}",
            self.release(release),
            ASSETS_PER_PAGE,
            page
        )
    }

    pub fn asset(&self, asset: &AssetId) -> String {
        format!("{}/assets/{}", self.releases(), segment(asset.as_str()))
    }

    pub fn upload(&self, release: &ReleaseId, name: &str) -> String {
        format!(
            "{}/repos/{}/releases/{}/assets?name={}",
            self.uploads,
            self.repository,
            segment(release.as_str()),
            urlencoding::encode(name)
        )
    }
}

/// Ids come from the host or from the operator; neither may add path segments or a query.
fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
