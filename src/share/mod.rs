// ABOUTME: Network share mounting for the build drop.
// ABOUTME: ShareMounter trait plus the `net use` implementation.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::types::DriveLetter;

/// Errors from mounting a share.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("mount command exited with {code:?}: {output}")]
    Rejected { code: Option<i32>, output: String },

    #[error("failed to run mount command: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Maps a remote share onto a local drive.
#[async_trait]
pub trait ShareMounter: Send + Sync {
    async fn mount(&self, share: &str, drive: &DriveLetter) -> Result<(), MountError>;
}

/// Mounts with the Windows `net use` command.
#[derive(Debug, Default)]
pub struct NetUseMounter;

#[async_trait]
impl ShareMounter for NetUseMounter {
    async fn mount(&self, share: &str, drive: &DriveLetter) -> Result<(), MountError> {
        tracing::debug!("net use {} {}", drive, share);

        let output = Command::new("net")
            .arg("use")
            .arg(drive.to_string())
            .arg(share)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let mut text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr.trim());
        }

        Err(MountError::Rejected {
            code: output.status.code(),
            output: text,
        })
    }
}
