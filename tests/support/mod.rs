// ABOUTME: Shared test doubles for integration tests.
// ABOUTME: Scripted operator, recording mounter, fake release host, and fixture builders.

#![allow(dead_code)]

pub mod http_stub;

use async_trait::async_trait;
use nonempty::NonEmpty;
use parking_lot::Mutex;
use scriptgen_release::config::{ReleaseSettings, RunConfig};
use scriptgen_release::operator::{Operator, OperatorError};
use scriptgen_release::release_host::{Asset, DraftRelease, HostError, ReleaseHost};
use scriptgen_release::share::{MountError, ShareMounter};
use scriptgen_release::types::{AssetId, DriveLetter, ReleaseId, ReleaseVersion};
use secrecy::SecretString;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("scriptgen_release=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Operator that answers from a fixed script and records everything it was shown.
pub struct ScriptedOperator {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
    told: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            questions: Mutex::new(Vec::new()),
            told: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().clone()
    }

    pub fn told(&self) -> Vec<String> {
        self.told.lock().clone()
    }

    pub fn unused_answers(&self) -> usize {
        self.answers.lock().len()
    }
}

impl Operator for ScriptedOperator {
    fn ask(&self, question: &str) -> Result<String, OperatorError> {
        self.questions.lock().push(question.to_string());
        self.answers.lock().pop_front().ok_or(OperatorError::Closed)
    }

    fn tell(&self, message: &str) {
        self.told.lock().push(message.to_string());
    }
}

/// Mounter that records calls and succeeds unless told otherwise.
#[derive(Default)]
pub struct RecordingMounter {
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingMounter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ShareMounter for RecordingMounter {
    async fn mount(&self, share: &str, drive: &DriveLetter) -> Result<(), MountError> {
        self.calls.lock().push((share.to_string(), drive.to_string()));
        if self.fail {
            return Err(MountError::Rejected {
                code: Some(2),
                output: "System error 85 has occurred.".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Create(DraftRelease),
    ListAssets(String),
    DeleteAsset(String),
    Upload {
        release: String,
        name: String,
        bytes: usize,
    },
    DeleteRelease(String),
}

/// In-memory release host.
pub struct FakeHost {
    release_id: String,
    create_status: Option<u16>,
    upload_status: Option<u16>,
    assets: Vec<Asset>,
    calls: Mutex<Vec<HostCall>>,
}

impl FakeHost {
    pub fn new(release_id: &str) -> Self {
        Self {
            release_id: release_id.to_string(),
            create_status: None,
            upload_status: None,
            assets: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_asset(mut self, id: &str, name: &str) -> Self {
        self.assets.push(Asset {
            id: AssetId::new(id),
            name: name.to_string(),
        });
        self
    }

    pub fn failing_create(mut self, status: u16) -> Self {
        self.create_status = Some(status);
        self
    }

    pub fn failing_upload(mut self, status: u16) -> Self {
        self.upload_status = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    fn status_error(status: u16) -> HostError {
        HostError::Status {
            status,
            reason: "Stubbed".to_string(),
            message: None,
        }
    }
}

#[async_trait]
impl ReleaseHost for FakeHost {
    async fn create_release(&self, draft: &DraftRelease) -> Result<ReleaseId, HostError> {
        self.calls.lock().push(HostCall::Create(draft.clone()));
        match self.create_status {
            Some(status) => Err(Self::status_error(status)),
            None => Ok(ReleaseId::new(self.release_id.clone())),
        }
    }

    async fn list_assets(&self, release: &ReleaseId) -> Result<Vec<Asset>, HostError> {
        self.calls
            .lock()
            .push(HostCall::ListAssets(release.to_string()));
        Ok(self.assets.clone())
    }

    async fn delete_asset(&self, asset: &AssetId) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::DeleteAsset(asset.to_string()));
        Ok(())
    }

    async fn upload_asset(
        &self,
        release: &ReleaseId,
        name: &str,
        content: Vec<u8>,
    ) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::Upload {
            release: release.to_string(),
            name: name.to_string(),
            bytes: content.len(),
        });
        match self.upload_status {
            Some(status) => Err(Self::status_error(status)),
            None => Ok(()),
        }
    }

    async fn delete_release(&self, release: &ReleaseId) -> Result<(), HostError> {
        self.calls
            .lock()
            .push(HostCall::DeleteRelease(release.to_string()));
        Ok(())
    }
}

/// A temporary build drop plus workspace, and a run configuration pointing at them.
pub struct Fixture {
    pub dir: TempDir,
    pub source: PathBuf,
    pub workspace: PathBuf,
}

impl Fixture {
    /// Build drop containing the restricted library and a guarded import of it.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("share").join("script_generator");
        write_file(&source.join("main.py"), "import sys\n");
        write_file(
            &source.join("generator").join("runner.py"),
            "try:\n    import genie_python\nexcept ImportError:\n    genie_python = None\n",
        );
        write_file(&source.join("genie_python").join("__init__.py"), "");
        write_file(&source.join("genie_python").join("genie.py"), "def cset():\n    pass\n");

        let workspace = dir.path().join("work").join("script_generator");
        Self {
            dir,
            source,
            workspace,
        }
    }

    pub fn settings(&self, api_url: &str) -> ReleaseSettings {
        ReleaseSettings {
            repository: "ISISComputingGroup/ScriptGenerator".to_string(),
            api_url: api_url.to_string(),
            uploads_url: api_url.to_string(),
            source_dir: Some(self.source.clone()),
            workspace_dir: self.workspace.clone(),
            smoke_test: NonEmpty {
                head: "Start the script generator".to_string(),
                tail: vec!["Generate a script".to_string()],
            },
            ..ReleaseSettings::default()
        }
    }

    pub fn config(&self, api_url: &str) -> RunConfig {
        RunConfig::new(
            ReleaseVersion::new("1.2.3").unwrap(),
            SecretString::from("s3cret".to_string()),
            DriveLetter::default(),
            self.settings(api_url),
        )
    }

    pub fn archive(&self) -> PathBuf {
        self.dir.path().join("work").join("script_generator.zip")
    }
}

pub fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
