// ABOUTME: GitHub implementation of ReleaseHost over the REST API.
// ABOUTME: Every request carries the bearer token; any non-2xx status becomes HostError::Status.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{ASSETS_PER_PAGE, Asset, DraftRelease, Endpoints, HostError, ReleaseHost};
use crate::config::RunConfig;
use crate::types::{AssetId, ReleaseId};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

pub struct GitHubReleases {
    client: reqwest::Client,
    endpoints: Endpoints,
    token: SecretString,
}

impl std::fmt::Debug for GitHubReleases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubReleases")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

#[derive(Deserialize)]
struct CreatedRelease {
    id: ReleaseId,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GitHubReleases {
    pub fn new(endpoints: Endpoints, token: SecretString) -> Result<Self, HostError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scriptgen-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, endpoints, token))
    }

    /// Use a preconfigured HTTP client, e.g. one with proxies disabled.
    pub fn with_client(client: reqwest::Client, endpoints: Endpoints, token: SecretString) -> Self {
        Self {
            client,
            endpoints,
            token,
        }
    }

    /// Client for the repository and hosts named in the run configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self, HostError> {
        let settings = config.settings();
        let endpoints = Endpoints::new(
            &settings.api_url,
            &settings.uploads_url,
            &settings.repository,
        );
        let token = SecretString::from(config.token().expose_secret().to_owned());
        Self::new(endpoints, token)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, HostError> {
        let response = request
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        check_status(response).await
    }
}

/// Pass 2xx responses through; turn anything else into `HostError::Status`.
async fn check_status(response: Response) -> Result<Response, HostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => Some(parsed.message),
        Err(_) if body.trim().is_empty() => None,
        Err(_) => Some(body.trim().chars().take(200).collect()),
    };

    Err(HostError::Status {
        status: status.as_u16(),
        reason,
        message,
    })
}

#[async_trait]
impl ReleaseHost for GitHubReleases {
    async fn create_release(&self, draft: &DraftRelease) -> Result<ReleaseId, HostError> {
        tracing::info!("Creating release {} ({})", draft.name, draft.tag_name);
        let response = self
            .send(
                self.request(Method::POST, &self.endpoints.releases())
                    .json(draft),
            )
            .await?;

        let created: CreatedRelease = response
            .json()
            .await
            .map_err(|e| HostError::MalformedResponse(e.to_string()))?;
        Ok(created.id)
    }

    async fn list_assets(&self, release: &ReleaseId) -> Result<Vec<Asset>, HostError> {
        let mut assets = Vec::new();
        let mut page = 1;
        loop {
            let response = self
                .send(self.request(Method::GET, &self.endpoints.assets(release, page)))
                .await?;
            let batch: Vec<Asset> = response
                .json()
                .await
                .map_err(|e| HostError::MalformedResponse(e.to_string()))?;

            let last = batch.len() < ASSETS_PER_PAGE;
            assets.extend(batch);
            if last {
                return Ok(assets);
            }
            page += 1;
        }
    }

    async fn delete_asset(&self, asset: &AssetId) -> Result<(), HostError> {
        tracing::info!("Deleting asset {}", asset);
        self.send(self.request(Method::DELETE, &self.endpoints.asset(asset)))
            .await
            .map(drop)
    }

    async fn upload_asset(
        &self,
        release: &ReleaseId,
        name: &str,
        content: Vec<u8>,
    ) -> Result<(), HostError> {
        tracing::info!("Uploading {} ({} bytes) to release {}", name, content.len(), release);
        self.send(
            self.request(Method::POST, &self.endpoints.upload(release, name))
                .header(CONTENT_TYPE, "application/zip")
                .body(content),
        )
        .await
        .map(drop)
    }

    async fn delete_release(&self, release: &ReleaseId) -> Result<(), HostError> {
        tracing::info!("Deleting release {}", release);
        self.send(self.request(Method::DELETE, &self.endpoints.release(release)))
            .await
            .map(drop)
    }
}
