// ABOUTME: Release settings (optional release.yml) and the immutable per-run configuration.
// ABOUTME: Handles YAML parsing, file discovery, validation, and {version} template rendering.

mod deserialize;

use crate::error::{Error, Result};
use crate::smoke;
use crate::types::{DriveLetter, ReleaseVersion};
use deserialize::{deserialize_checklist, deserialize_repository};
use nonempty::NonEmpty;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "release.yml";
pub const CONFIG_FILENAME_ALT: &str = "release.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".release/config.yml";

pub const DEFAULT_REPOSITORY: &str = "ISISComputingGroup/ScriptGenerator";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_UPLOADS_URL: &str = "https://uploads.github.com";
pub const DEFAULT_SHARE_TEMPLATE: &str = r"\\isis.cclrc.ac.uk\inst$\Kits$\CompGroup\ICP\Releases\script_generator_release\Script_Gen_{version}\script_generator";
pub const DEFAULT_ARTIFACT_DIR: &str = "script_generator";
pub const DEFAULT_ARCHIVE_NAME: &str = "script_generator.zip";
pub const DEFAULT_RESTRICTED_LIBRARY: &str = "genie_python";

/// Settings that rarely change between releases. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReleaseSettings {
    /// GitHub repository as `owner/name`.
    #[serde(deserialize_with = "deserialize_repository")]
    pub repository: String,

    pub api_url: String,

    pub uploads_url: String,

    /// UNC path of the build share; `{version}` is replaced.
    pub share_template: String,

    /// Directory on the mounted drive holding the build.
    pub artifact_dir: String,

    /// Use this directory as the copy source instead of `<drive>\<artifact_dir>`.
    pub source_dir: Option<PathBuf>,

    /// Local copy of the build that gets stripped and archived.
    pub workspace_dir: PathBuf,

    /// File name of the archive, also the release asset name.
    pub archive_name: String,

    /// Directory name of the library that must not be redistributed.
    pub restricted_library: String,

    pub tag_template: String,

    pub release_name_template: String,

    #[serde(deserialize_with = "deserialize_checklist")]
    pub smoke_test: NonEmpty<String>,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            uploads_url: DEFAULT_UPLOADS_URL.to_string(),
            share_template: DEFAULT_SHARE_TEMPLATE.to_string(),
            artifact_dir: DEFAULT_ARTIFACT_DIR.to_string(),
            source_dir: None,
            workspace_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            restricted_library: DEFAULT_RESTRICTED_LIBRARY.to_string(),
            tag_template: "{version}".to_string(),
            release_name_template: "Script Generator v{version}".to_string(),
            smoke_test: smoke::default_checklist(),
        }
    }
}

impl ReleaseSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first settings file found in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Using settings from {}", path.display());
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        for (key, template) in [
            ("share_template", &self.share_template),
            ("tag_template", &self.tag_template),
            ("release_name_template", &self.release_name_template),
        ] {
            if !template.contains("{version}") {
                return Err(Error::InvalidConfig(format!(
                    "{key} must contain a {{version}} placeholder"
                )));
            }
        }

        if self.archive_name.trim().is_empty()
            || self.archive_name.contains(['/', '\\'])
        {
            return Err(Error::InvalidConfig(format!(
                "archive_name must be a plain file name, got '{}'",
                self.archive_name
            )));
        }

        if self.restricted_library.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "restricted_library cannot be empty".to_string(),
            ));
        }

        // The copy step deletes workspace_dir before refilling it.
        if self.workspace_dir.file_name().is_none() {
            return Err(Error::InvalidConfig(format!(
                "workspace_dir must name a directory of its own, got '{}'",
                self.workspace_dir.display()
            )));
        }
        if let Some(ref source) = self.source_dir
            && (self.workspace_dir.starts_with(source) || source.starts_with(&self.workspace_dir))
        {
            return Err(Error::InvalidConfig(format!(
                "workspace_dir '{}' must not overlap source_dir '{}'",
                self.workspace_dir.display(),
                source.display()
            )));
        }

        for (key, url) in [("api_url", &self.api_url), ("uploads_url", &self.uploads_url)] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(Error::InvalidConfig(format!(
                    "{key} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }
}

/// Everything one pipeline run needs, fixed before the first step.
#[derive(Debug)]
pub struct RunConfig {
    version: ReleaseVersion,
    token: SecretString,
    drive: DriveLetter,
    settings: ReleaseSettings,
}

impl RunConfig {
    pub fn new(
        version: ReleaseVersion,
        token: SecretString,
        drive: DriveLetter,
        settings: ReleaseSettings,
    ) -> Self {
        Self {
            version,
            token,
            drive,
            settings,
        }
    }

    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn drive(&self) -> &DriveLetter {
        &self.drive
    }

    pub fn settings(&self) -> &ReleaseSettings {
        &self.settings
    }

    /// UNC path of the share holding this version's build.
    pub fn share_path(&self) -> String {
        self.version.render(&self.settings.share_template)
    }

    /// Where the copy step reads the build from.
    pub fn source_dir(&self) -> PathBuf {
        match self.settings.source_dir {
            Some(ref dir) => dir.clone(),
            None => PathBuf::from(format!(
                "{}{}",
                self.drive.root(),
                self.settings.artifact_dir
            )),
        }
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.settings.workspace_dir
    }

    /// The archive sits next to the workspace directory.
    pub fn archive_path(&self) -> PathBuf {
        let parent = self
            .settings
            .workspace_dir
            .parent()
            .unwrap_or_else(|| Path::new(""));
        parent.join(&self.settings.archive_name)
    }

    pub fn asset_name(&self) -> &str {
        &self.settings.archive_name
    }

    pub fn tag_name(&self) -> String {
        self.version.render(&self.settings.tag_template)
    }

    pub fn release_name(&self) -> String {
        self.version.render(&self.settings.release_name_template)
    }
}
