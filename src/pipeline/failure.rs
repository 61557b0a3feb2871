// ABOUTME: Conversions from collaborator errors into operator-facing step failures.
// ABOUTME: Adds likely causes and a remediation hint based on what went wrong.

use std::path::Path;

use crate::operator::OperatorError;
use crate::release_host::HostError;
use crate::step::StepFailed;
use crate::workspace::WorkspaceError;

pub(super) fn host_failure(attempted: String, err: HostError) -> StepFailed {
    let failure = StepFailed::new(attempted).cause(err.to_string());
    match err.status() {
        Some(401) => failure
            .cause("the token is invalid or has expired")
            .remedy("create a new token and rerun with --token"),
        Some(403) => failure
            .cause("the token lacks permission to write releases on this repository")
            .remedy("use a token with contents: write access to the repository"),
        Some(404) => failure
            .cause("the repository or release does not exist, or the token cannot see it")
            .remedy("check the repository setting and the release id"),
        Some(422) => failure
            .cause("a release for this tag may already exist, or GitHub rejected the request")
            .remedy("look at the repository's releases, remove stale drafts, then rerun"),
        Some(_) => failure.remedy("check https://www.githubstatus.com and rerun the step"),
        None => failure
            .cause("network, proxy or TLS problem")
            .remedy("check your connection and rerun the step"),
    }
}

pub(super) fn operator_failure(context: &str, err: OperatorError) -> StepFailed {
    StepFailed::new(format!("Could not read the operator's answer while {context}"))
        .cause(err.to_string())
        .remedy("run the release from an interactive terminal")
}

/// `hint` names the step that should have created a missing directory.
pub(super) fn workspace_failure(attempted: String, err: WorkspaceError, hint: &str) -> StepFailed {
    match err {
        WorkspaceError::Missing(path) => StepFailed::new(attempted)
            .cause(format!("{} does not exist", path.display()))
            .remedy(hint.to_string()),
        overlap @ WorkspaceError::Overlap { .. } => StepFailed::new(attempted)
            .cause(overlap.to_string())
            .remedy("set workspace_dir to a directory outside the build"),
        other => StepFailed::new(attempted).cause(other.to_string()),
    }
}

pub(super) fn missing_archive(archive: &Path) -> StepFailed {
    StepFailed::new(format!("Archive {} not found", archive.display()))
        .cause("the archive step was skipped or failed")
        .remedy("rerun and confirm the archive step before uploading")
}
