// ABOUTME: The release pipeline: an ordered list of operator-gated steps and the driver that runs it.
// ABOUTME: Threads the release id, archive path and smoke verdict between steps; halts on StepFailed.

mod failure;
mod steps;

use std::cell::Cell;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::operator::Operator;
use crate::release_host::ReleaseHost;
use crate::report::{RunReport, StepOutcome, Warning};
use crate::share::ShareMounter;
use crate::smoke::SmokeVerdict;
use crate::step::{StepFailed, run_step};
use crate::types::ReleaseId;

/// The steps of a release, in the order they are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseStep {
    MountShare,
    CopyArtifacts,
    StripRestrictedLibrary,
    Archive,
    CreateRelease,
    UploadAsset,
    SmokeTest,
    /// Conditional rollback of the remote release.
    DeleteRelease,
}

impl ReleaseStep {
    pub const ORDER: [ReleaseStep; 8] = [
        ReleaseStep::MountShare,
        ReleaseStep::CopyArtifacts,
        ReleaseStep::StripRestrictedLibrary,
        ReleaseStep::Archive,
        ReleaseStep::CreateRelease,
        ReleaseStep::UploadAsset,
        ReleaseStep::SmokeTest,
        ReleaseStep::DeleteRelease,
    ];

    /// Short name used in summaries and logs.
    pub fn name(self) -> &'static str {
        match self {
            ReleaseStep::MountShare => "mount share",
            ReleaseStep::CopyArtifacts => "copy artifacts",
            ReleaseStep::StripRestrictedLibrary => "strip restricted library",
            ReleaseStep::Archive => "archive",
            ReleaseStep::CreateRelease => "create release",
            ReleaseStep::UploadAsset => "upload asset",
            ReleaseStep::SmokeTest => "smoke test",
            ReleaseStep::DeleteRelease => "delete release",
        }
    }
}

/// What a completed step hands back to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Produced {
    Nothing,
    Archive(PathBuf),
    Created(ReleaseId),
    /// The step acted on this release, possibly one the operator typed in.
    UsedRelease(ReleaseId),
    Verdict(SmokeVerdict),
    Deleted(ReleaseId),
}

#[derive(Debug)]
struct StepOutput {
    produced: Produced,
    warnings: Vec<Warning>,
}

impl StepOutput {
    fn nothing() -> Self {
        Self::from(Produced::Nothing)
    }

    fn with_warning(mut self, warning: Warning) -> Self {
        self.warnings.push(warning);
        self
    }
}

impl From<Produced> for StepOutput {
    fn from(produced: Produced) -> Self {
        Self {
            produced,
            warnings: Vec::new(),
        }
    }
}

/// Values carried between steps. Any of them may be absent because the
/// operator skipped the step that produces it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunState {
    pub release_id: Option<ReleaseId>,
    pub archive: Option<PathBuf>,
    pub smoke: Option<SmokeVerdict>,
}

/// Runs [`ReleaseStep::ORDER`] once, asking the operator before each step.
pub struct Pipeline<'a, O: ?Sized, M: ?Sized, H: ?Sized> {
    config: &'a RunConfig,
    operator: &'a O,
    mounter: &'a M,
    host: &'a H,
    state: RunState,
    report: RunReport,
}

impl<'a, O, M, H> Pipeline<'a, O, M, H>
where
    O: Operator + ?Sized,
    M: ShareMounter + ?Sized,
    H: ReleaseHost + ?Sized,
{
    pub fn new(config: &'a RunConfig, operator: &'a O, mounter: &'a M, host: &'a H) -> Self {
        Self {
            config,
            operator,
            mounter,
            host,
            state: RunState::default(),
            report: RunReport::default(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Offer every step in order.
    ///
    /// The first `StepFailed` stops the run and is returned as is. Nothing
    /// already done is undone; the report says what happened.
    pub async fn run(&mut self) -> Result<(), StepFailed> {
        for step in ReleaseStep::ORDER {
            let description = self.describe(step);
            let started = Cell::new(false);
            let result = {
                let this = &*self;
                run_step(this.operator, &description, || {
                    started.set(true);
                    this.execute(step)
                })
                .await
            };

            match result {
                Ok(Some(output)) => {
                    self.apply(output);
                    self.report.record(step, StepOutcome::Completed);
                }
                Ok(None) => self.report.record(step, StepOutcome::Skipped),
                Err(failure) => {
                    // A failure before the operation started came from the prompt itself.
                    let outcome = if started.get() {
                        StepOutcome::Failed
                    } else {
                        StepOutcome::Unanswered
                    };
                    tracing::error!(step = step.name(), ?outcome, "halting release");
                    self.report.record(step, outcome);
                    return Err(failure);
                }
            }
        }
        Ok(())
    }

    /// The question put to the operator for `step`, given what is known so far.
    pub fn describe(&self, step: ReleaseStep) -> String {
        let config = self.config;
        let settings = config.settings();
        match step {
            ReleaseStep::MountShare => {
                format!("mount {} to drive {}", config.share_path(), config.drive())
            }
            ReleaseStep::CopyArtifacts => format!(
                "copy {} to {}",
                config.source_dir().display(),
                config.workspace_dir().display()
            ),
            ReleaseStep::StripRestrictedLibrary => format!(
                "remove {} from {} and check its imports are guarded",
                settings.restricted_library,
                config.workspace_dir().display()
            ),
            ReleaseStep::Archive => format!(
                "archive {} into {}",
                config.workspace_dir().display(),
                config.archive_path().display()
            ),
            ReleaseStep::CreateRelease => format!(
                "create draft release '{}' (tag {}) on {}",
                config.release_name(),
                config.tag_name(),
                settings.repository
            ),
            ReleaseStep::UploadAsset => format!(
                "upload {} to release {}",
                config.asset_name(),
                self.release_label()
            ),
            ReleaseStep::SmokeTest => "guided smoke test of the installed build".to_string(),
            ReleaseStep::DeleteRelease => match self.state.smoke {
                Some(ref verdict) if !verdict.passed() => format!(
                    "smoke test failed - delete release {} (rollback)",
                    self.release_label()
                ),
                _ => format!("delete release {} (rollback)", self.release_label()),
            },
        }
    }

    fn release_label(&self) -> String {
        match self.state.release_id {
            Some(ref id) => id.to_string(),
            None => "(id asked for when the step runs)".to_string(),
        }
    }

    async fn execute(&self, step: ReleaseStep) -> Result<StepOutput, StepFailed> {
        match step {
            ReleaseStep::MountShare => self.mount_share().await,
            ReleaseStep::CopyArtifacts => self.copy_artifacts(),
            ReleaseStep::StripRestrictedLibrary => self.strip_restricted_library(),
            ReleaseStep::Archive => self.archive(),
            ReleaseStep::CreateRelease => self.create_release().await,
            ReleaseStep::UploadAsset => self.upload_asset().await,
            ReleaseStep::SmokeTest => self.smoke_test(),
            ReleaseStep::DeleteRelease => self.delete_release().await,
        }
    }

    fn apply(&mut self, output: StepOutput) {
        for warning in output.warnings {
            self.report.warn(warning);
        }

        match output.produced {
            Produced::Nothing => {}
            Produced::Archive(path) => self.state.archive = Some(path),
            Produced::Created(id) => {
                self.report.set_live_release(Some(id.clone()));
                self.state.release_id = Some(id);
            }
            Produced::UsedRelease(id) => self.state.release_id = Some(id),
            Produced::Verdict(verdict) => self.state.smoke = Some(verdict),
            Produced::Deleted(id) => {
                if self.report.live_release() == Some(&id) {
                    self.report.set_live_release(None);
                }
                if self.state.release_id.as_ref() == Some(&id) {
                    self.state.release_id = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_starts_with_mount_and_ends_with_rollback() {
        assert_eq!(ReleaseStep::ORDER.first(), Some(&ReleaseStep::MountShare));
        assert_eq!(ReleaseStep::ORDER.last(), Some(&ReleaseStep::DeleteRelease));
    }

    #[test]
    fn create_comes_before_its_consumers() {
        let position = |step| ReleaseStep::ORDER.iter().position(|s| *s == step).unwrap();
        assert!(position(ReleaseStep::CreateRelease) < position(ReleaseStep::UploadAsset));
        assert!(position(ReleaseStep::CreateRelease) < position(ReleaseStep::DeleteRelease));
        assert!(position(ReleaseStep::Archive) < position(ReleaseStep::UploadAsset));
    }

    #[test]
    fn step_names_are_distinct() {
        let mut names: Vec<_> = ReleaseStep::ORDER.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ReleaseStep::ORDER.len());
    }
}
